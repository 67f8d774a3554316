//! Destination buffers for renderers.

use rayon::prelude::*;
use std::ops::{Index, IndexMut, Range};

/// Row-major grid of packed RGBA colors (see [`crate::colors`]).
///
/// Renderers only ever write into a pixel buffer; whatever a renderer wrote
/// stays there until something overwrites it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Box<[u32]>,
}

impl Index<[usize; 2]> for PixelBuffer {
    type Output = u32;

    #[inline]
    fn index(&self, [row, col]: [usize; 2]) -> &u32 {
        &self.data[self.flatten_idx(row, col)]
    }
}
impl IndexMut<[usize; 2]> for PixelBuffer {
    #[inline]
    fn index_mut(&mut self, [row, col]: [usize; 2]) -> &mut u32 {
        let idx = self.flatten_idx(row, col);
        &mut self.data[idx]
    }
}

impl PixelBuffer {
    /// Creates a buffer with every pixel set to `color`.
    pub fn new(width: usize, height: usize, color: u32) -> Self {
        Self {
            width,
            height,
            data: vec![color; width * height].into_boxed_slice(),
        }
    }

    /// Returns the number of columns.
    pub fn width(&self) -> usize {
        self.width
    }
    /// Returns the number of rows.
    pub fn height(&self) -> usize {
        self.height
    }
    /// Returns `(width, height)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[inline]
    fn flatten_idx(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.height && col < self.width,
            "Pixel ({}, {}) is out of bounds for {}x{} buffer",
            row,
            col,
            self.width,
            self.height,
        );
        row * self.width + col
    }

    /// Returns the color at `(row, col)`, or `None` if it is out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<u32> {
        if row < self.height && col < self.width {
            Some(self.data[row * self.width + col])
        } else {
            None
        }
    }
    /// Sets the color at `(row, col)`. Out-of-bounds writes are ignored.
    pub fn set(&mut self, row: usize, col: usize, color: u32) {
        if row < self.height && col < self.width {
            self.data[row * self.width + col] = color;
        }
    }

    /// Sets every pixel to `color`.
    pub fn fill(&mut self, color: u32) {
        self.data.iter_mut().for_each(|px| *px = color);
    }
    /// Sets every pixel in a rectangle to `color`. The rectangle is clipped to
    /// the buffer.
    pub fn fill_rect(&mut self, rows: Range<usize>, cols: Range<usize>, color: u32) {
        let rows = rows.start.min(self.height)..rows.end.min(self.height);
        let cols = cols.start.min(self.width)..cols.end.min(self.width);
        if cols.start >= cols.end {
            return;
        }
        for row in rows {
            let start = row * self.width;
            self.data[start + cols.start..start + cols.end]
                .iter_mut()
                .for_each(|px| *px = color);
        }
    }

    /// Returns every pixel in row-major order.
    pub fn as_slice(&self) -> &[u32] {
        &self.data
    }
    /// Returns a parallel iterator over mutable rows.
    pub fn par_rows_mut(&mut self) -> rayon::slice::ChunksMut<'_, u32> {
        self.data.par_chunks_mut(self.width.max(1))
    }

    /// Returns the pixels as RGBA bytes in row-major order, for image export.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.data
            .iter()
            .flat_map(|&px| crate::colors::unpack_rgba(px).to_vec())
            .collect()
    }
}
