//! User configuration.

mod life;
mod runtime;
mod trace;

pub use life::*;
pub use runtime::*;
pub use trace::*;

/// Configuration for every component of the sandbox.
#[derive(Debug, Default, Clone)]
pub struct Config {
    /// Array engine initialization.
    pub runtime: RuntimeConfig,
    /// Game of Life simulation and drawing.
    pub life: LifeConfig,
    /// Ray tracing.
    pub trace: TraceConfig,
}
