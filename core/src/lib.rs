//! Simulation and visualization sandbox built on interchangeable array
//! engines: a Game of Life simulator that counts neighbors by convolution and
//! a ray tracer that renders spheres.

#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all)]
#![deny(clippy::correctness)]

pub mod array;
pub mod colors;
pub mod config;
mod error;
pub mod life;
pub mod pixels;
pub mod runtime;
pub mod scene;
pub mod trace;

pub use error::{Error, ErrorKind, Result};

pub mod prelude {
    //! Types needed to build a runtime, a scene and the renderers in it.

    pub use crate::array::{DType, Device, HostArray, NumericArray, Scalar, Shape};
    pub use crate::config::{Config, LifeConfig, RuntimeConfig, TraceConfig};
    pub use crate::error::{Error, ErrorKind, Result};
    pub use crate::life::{CellChange, LifeSimulator};
    pub use crate::pixels::PixelBuffer;
    pub use crate::runtime::{ArrayRuntime, BackendGuard, BackendKind, CmpOp, Padding};
    pub use crate::scene::{
        Drawable, Intersectable, ObjectId, Ray, Scene, SceneView, SolidCamera, Sphere,
        Updatable, WorldObject,
    };
    pub use crate::trace::RayTracer;
}

#[cfg(test)]
mod tests;
