use crate::colors;
use crate::runtime::BackendKind;

/// Game of Life simulation and drawing.
#[derive(Debug, Clone)]
pub struct LifeConfig {
    /// Backend that stores and steps the grid, or `None` to use the active
    /// backend when the simulator is created.
    pub backend: Option<BackendKind>,
    /// Minimum scene time between generations, in seconds.
    pub update_interval: f64,
    /// Width of gridlines, in pixels.
    pub line_thickness: usize,
    /// Colors used to draw the board.
    pub palette: LifePalette,
}
impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            backend: None,
            update_interval: 0.01,
            line_thickness: 1,
            palette: LifePalette::default(),
        }
    }
}

/// Colors used to draw the Life board, as packed RGBA values.
#[allow(missing_docs)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LifePalette {
    pub background: u32,
    pub gridlines: u32,
    pub alive: u32,
}
impl Default for LifePalette {
    fn default() -> Self {
        Self {
            background: colors::LIFE_BACKGROUND,
            gridlines: colors::LIFE_GRIDLINES,
            alive: colors::LIFE_ALIVE,
        }
    }
}
