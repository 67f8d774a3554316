//! Conway's Game of Life on a fixed-size grid.
//!
//! Each generation counts the live cells in every 3x3 neighborhood (the cell
//! itself included) with a single convolution. A dead cell with a count of 3
//! is born; a live cell with a count of 3 or 4 (2 or 3 live neighbors)
//! survives. Everything outside the grid is dead.
//!
//! Every generation also records which cells changed. Drawing only repaints
//! those cells, so after the first frame the board is never fully redrawn.

use cgmath::{EuclideanSpace, Point3};
use log::{debug, trace};

use crate::array::{DType, NumericArray, Scalar};
use crate::config::{LifeConfig, LifePalette};
use crate::error::{Error, Result};
use crate::pixels::PixelBuffer;
use crate::runtime::{ArrayRuntime, BackendGuard, BackendKind, CmpOp, Padding};
use crate::scene::{check_position, Drawable, SceneView, Updatable, WorldObject};

#[cfg(test)]
mod tests;

/// Cell whose state changed in some generation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct CellChange {
    /// Row of the cell.
    pub row: usize,
    /// Column of the cell.
    pub col: usize,
    /// New state of the cell.
    pub alive: bool,
}

/// Game of Life simulator that draws itself into a pixel buffer.
#[derive(Debug, Clone)]
pub struct LifeSimulator {
    backend: BackendKind,
    /// Grid of `int32` values that are each 0 or 1.
    state: NumericArray,
    /// Changes since the last draw, in the order they happened.
    pending: Vec<CellChange>,
    generation: u64,

    update_interval: f64,
    /// Scene time of the last generation.
    last_update: f64,
    line_thickness: usize,
    palette: LifePalette,
    board_drawn: bool,

    position: Point3<f64>,
}

impl LifeSimulator {
    /// Constructs a simulator from a 2D grid in which every nonzero element
    /// is a live cell.
    ///
    /// The grid is copied onto the configured backend (or the active backend,
    /// if none is configured). The initial live cells are queued as pending
    /// changes so that the first draw shows the starting pattern.
    pub fn new(rt: &ArrayRuntime, start: &NumericArray, config: &LifeConfig) -> Result<Self> {
        let backend = config.backend.unwrap_or_else(|| rt.backend());
        start.shape().as_2d()?;

        rt.with_backend(backend, |rt| {
            let start = if start.backend() == backend {
                start.clone()
            } else {
                rt.from_host(&rt.to_host(start)?)?
            };
            // Normalize to exactly 0 or 1.
            let state = rt.cast(&rt.cast(&start, DType::Bool)?, DType::Int32)?;
            let pending = rt
                .argwhere(&state)?
                .into_iter()
                .map(|pos| CellChange {
                    row: pos[0],
                    col: pos[1],
                    alive: true,
                })
                .collect();

            debug!(
                "Created {} Life grid on backend '{}'",
                state.shape(),
                backend,
            );
            Ok(Self {
                backend,
                state,
                pending,
                generation: 0,

                update_interval: config.update_interval,
                last_update: 0.0,
                line_thickness: config.line_thickness,
                palette: config.palette,
                board_drawn: false,

                position: Point3::origin(),
            })
        })
    }
    /// Constructs a simulator from rows of cells, using the default
    /// configuration.
    pub fn from_rows(rt: &ArrayRuntime, rows: &[Vec<u8>]) -> Result<Self> {
        let host = crate::array::HostArray::from_rows(rows)?;
        let start = rt.from_host(&host)?;
        Self::new(rt, &start, &LifeConfig::default())
    }

    /// Returns the backend that holds the grid.
    pub fn backend(&self) -> BackendKind {
        self.backend
    }
    /// Returns the current grid.
    pub fn state(&self) -> &NumericArray {
        &self.state
    }
    /// Returns the number of generations simulated so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }
    /// Returns the number of live cells.
    pub fn population(&self, rt: &ArrayRuntime) -> Result<usize> {
        let _guard = self.enter(rt)?;
        rt.count_nonzero(&self.state)
    }
    /// Returns the changes that have not been drawn yet.
    pub fn pending_changes(&self) -> &[CellChange] {
        &self.pending
    }
    /// Removes and returns the changes that have not been drawn yet.
    pub fn take_changes(&mut self) -> Vec<CellChange> {
        std::mem::take(&mut self.pending)
    }

    /// Dtype used to count neighbors. The tensor engine only convolves
    /// floating-point arrays; counts never exceed 9, so `float16` is exact.
    fn count_dtype(&self) -> DType {
        match self.backend {
            BackendKind::Tensor => DType::Float16,
            _ => DType::Int16,
        }
    }

    /// Activates the backend and device that hold the grid.
    fn enter<'a>(&self, rt: &'a ArrayRuntime) -> Result<BackendGuard<'a>> {
        rt.enter_on(self.backend, self.state.device())
    }

    /// Simulates one generation and returns the number of cells that changed.
    ///
    /// This does not touch the draw timer; use [`LifeSimulator::step_at()`]
    /// to keep the next draw from simulating again right away.
    pub fn step(&mut self, rt: &ArrayRuntime) -> Result<usize> {
        let _guard = self.enter(rt)?;
        let count_dtype = self.count_dtype();

        let kernel = rt.ones(&[3, 3], count_dtype)?;
        let counts = rt.convolve2d(
            &rt.cast(&self.state, count_dtype)?,
            &kernel,
            Padding::Constant(Scalar::Int(0)),
        )?;
        let counts = rt.cast(&counts, DType::Int16)?;

        let alive = rt.cast(&self.state, DType::Bool)?;
        let born = rt.and(&rt.not(&alive)?, &rt.compare(&counts, CmpOp::Eq, 3)?)?;
        let survives = rt.and(
            &alive,
            &rt.and(
                &rt.compare(&counts, CmpOp::Ge, 3)?,
                &rt.compare(&counts, CmpOp::Le, 4)?,
            )?,
        )?;
        let next = rt.cast(&rt.or(&born, &survives)?, DType::Int32)?;

        // Individual element access is only cheap on the host.
        let changed = rt.argwhere(&rt.compare_arrays(&self.state, &next, CmpOp::Ne)?)?;
        let host = rt.to_host(&next)?;
        let count = changed.len();
        self.pending.extend(changed.into_iter().map(|pos| CellChange {
            alive: host.get(&pos).map_or(false, Scalar::is_nonzero),
            row: pos[0],
            col: pos[1],
        }));

        self.state = next;
        self.generation += 1;
        trace!("Life generation {}: {} cells changed", self.generation, count);
        Ok(count)
    }

    /// Simulates one generation at scene time `time` and restarts the draw
    /// timer from there.
    pub fn step_at(&mut self, rt: &ArrayRuntime, time: f64) -> Result<usize> {
        let count = self.step(rt)?;
        self.last_update = time;
        Ok(count)
    }

    /// Draws the board into `buffer`, first simulating a generation if
    /// `force_update` is set or if more than the update interval has passed
    /// in scene time since the last generation.
    ///
    /// The first call fills the buffer and draws the gridlines. Later calls
    /// only repaint cells that changed, so the buffer must keep its contents
    /// between calls.
    pub fn draw_with(
        &mut self,
        rt: &ArrayRuntime,
        buffer: &mut PixelBuffer,
        scene: &SceneView<'_>,
        force_update: bool,
    ) -> Result<()> {
        if force_update || scene.time() - self.last_update > self.update_interval {
            self.step_at(rt, scene.time())?;
        }

        let layout = self.layout(buffer)?;
        if !self.board_drawn {
            buffer.fill(self.palette.background);
            layout.draw_gridlines(buffer, self.palette.gridlines);
            self.board_drawn = true;
        }
        for change in self.pending.drain(..) {
            let color = if change.alive {
                self.palette.alive
            } else {
                self.palette.background
            };
            layout.fill_cell(buffer, change.row, change.col, color);
        }
        Ok(())
    }

    /// Forgets that the board was drawn, so the next draw repaints the
    /// background, the gridlines and every live cell.
    pub fn invalidate(&mut self, rt: &ArrayRuntime) -> Result<()> {
        let live = {
            let _guard = self.enter(rt)?;
            rt.argwhere(&self.state)?
        };
        self.pending = live
            .into_iter()
            .map(|pos| CellChange {
                row: pos[0],
                col: pos[1],
                alive: true,
            })
            .collect();
        self.board_drawn = false;
        Ok(())
    }

    fn layout(&self, buffer: &PixelBuffer) -> Result<BoardLayout> {
        let (rows, cols) = self.state.shape().as_2d()?;
        BoardLayout::new(buffer.width(), buffer.height(), rows, cols, self.line_thickness)
    }
}

impl Updatable for LifeSimulator {}

impl WorldObject for LifeSimulator {
    fn name(&self) -> &'static str {
        "life"
    }
    fn position(&self) -> Point3<f64> {
        self.position
    }
    fn set_position(&mut self, position: Point3<f64>) -> Result<()> {
        self.position = check_position(position)?;
        Ok(())
    }
    fn as_drawable_mut(&mut self) -> Option<&mut dyn Drawable> {
        Some(self)
    }
}

impl Drawable for LifeSimulator {
    fn draw(
        &mut self,
        rt: &ArrayRuntime,
        buffer: &mut PixelBuffer,
        scene: &SceneView<'_>,
    ) -> Result<()> {
        self.draw_with(rt, buffer, scene, false)
    }
}

/// Position of the board within a pixel buffer.
///
/// The board is a square-celled grid centered in the buffer, with a
/// `line_thickness` margin and gridlines of the same thickness between and
/// around the cells.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BoardLayout {
    rows: usize,
    cols: usize,
    line: usize,
    /// Side length of one cell, in pixels.
    pub cell_size: usize,
    /// Top-left pixel of the board as `(row, col)`.
    pub origin: (usize, usize),
    /// Size of the board including gridlines as `(height, width)`.
    pub size: (usize, usize),
}

impl BoardLayout {
    /// Computes the layout of a `rows` by `cols` grid in a `width` by
    /// `height` buffer.
    pub fn new(
        width: usize,
        height: usize,
        rows: usize,
        cols: usize,
        line: usize,
    ) -> Result<Self> {
        let too_small = Error::BufferTooSmall {
            width,
            height,
            rows,
            cols,
        };
        let longest = rows.max(cols);
        let cell_size = width
            .min(height)
            .checked_sub(2 * line)
            .and_then(|screen| screen.checked_sub(longest * line))
            .map(|free| free / longest)
            .unwrap_or(0);
        if cell_size == 0 {
            return Err(too_small);
        }
        let stride = cell_size + line;
        let size = (rows * stride + line, cols * stride + line);
        let origin = ((height - size.0) / 2, (width - size.1) / 2);
        Ok(Self {
            rows,
            cols,
            line,
            cell_size,
            origin,
            size,
        })
    }

    fn stride(&self) -> usize {
        self.cell_size + self.line
    }

    /// Returns the pixel rows and columns covered by a cell, excluding its
    /// gridlines.
    pub fn cell_rect(
        &self,
        row: usize,
        col: usize,
    ) -> (std::ops::Range<usize>, std::ops::Range<usize>) {
        let top = self.origin.0 + self.stride() * row + self.line;
        let left = self.origin.1 + self.stride() * col + self.line;
        (top..top + self.cell_size, left..left + self.cell_size)
    }

    fn fill_cell(&self, buffer: &mut PixelBuffer, row: usize, col: usize, color: u32) {
        let (rows, cols) = self.cell_rect(row, col);
        buffer.fill_rect(rows, cols, color);
    }

    fn draw_gridlines(&self, buffer: &mut PixelBuffer, color: u32) {
        let (top, left) = self.origin;
        let (height, width) = self.size;
        for r in 0..=self.rows {
            let y = top + self.stride() * r;
            buffer.fill_rect(y..y + self.line, left..left + width, color);
        }
        for c in 0..=self.cols {
            let x = left + self.stride() * c;
            buffer.fill_rect(top..top + height, x..x + self.line, color);
        }
    }
}
