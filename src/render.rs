//! Drawing a carved grid into a pixel buffer

use itertools::iproduct;

use crate::cell::{Direction, Grid, Point};
use crate::error::{self, Error, Result};

/// Bytes per pixel (B, G, R)
pub const BYTES_PER_PIXEL: usize = 3;

const WHITE: [u8; BYTES_PER_PIXEL] = [255, 255, 255];

/// Row-major BGR pixel buffer, black when created
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let bytes = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(BYTES_PER_PIXEL))
            .ok_or(Error::ImageTooLarge { width, height })?;
        Ok(Self {
            width,
            height,
            data: error::zeroed(bytes)?,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw BGR bytes, row 0 first
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Bytes of row `y`
    pub fn row(&self, y: usize) -> &[u8] {
        let stride = self.width * BYTES_PER_PIXEL;
        &self.data[y * stride..(y + 1) * stride]
    }

    fn offset(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| (y * self.width + x) * BYTES_PER_PIXEL)
    }

    /// Pixel at `(x, y)`, `None` outside the buffer
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; BYTES_PER_PIXEL]> {
        let i = self.offset(x, y)?;
        Some([self.data[i], self.data[i + 1], self.data[i + 2]])
    }

    /// Set a pixel; writes outside the buffer are skipped.
    pub fn set_pixel(&mut self, x: usize, y: usize, bgr: [u8; BYTES_PER_PIXEL]) {
        if let Some(i) = self.offset(x, y) {
            self.data[i..i + BYTES_PER_PIXEL].copy_from_slice(&bgr);
        }
    }

    /// Horizontal white line on row `y`, covering `x0..x1`
    fn hline(&mut self, x0: usize, x1: usize, y: usize) {
        for x in x0..x1 {
            self.set_pixel(x, y, WHITE);
        }
    }

    /// Vertical white line on column `x`, covering `y0..y1`
    fn vline(&mut self, x: usize, y0: usize, y1: usize) {
        for y in y0..y1 {
            self.set_pixel(x, y, WHITE);
        }
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Side length of one cell in pixels; any remainder is left as border.
pub fn cell_size(image_width: usize, cells: usize) -> usize {
    image_width / cells
}

/// Draw every closed wall of `grid` as a white line.
///
/// Each wall segment runs one pixel past the far corner of the cell, so
/// that adjoining segments meet.
pub fn rasterize(grid: &Grid, buffer: &mut PixelBuffer) {
    let size = cell_size(buffer.width(), grid.size());
    for (y, x) in iproduct!(0..grid.size(), 0..grid.size()) {
        let cell = grid.cell(Point::new(x, y));
        let nx = x * size;
        let ny = y * size;

        if !cell.is_open(Direction::Up) {
            buffer.hline(nx, nx + size + 1, ny);
        }
        if !cell.is_open(Direction::Right) {
            buffer.vline(nx + size, ny, ny + size + 1);
        }
        if !cell.is_open(Direction::Down) {
            buffer.hline(nx, nx + size + 1, ny + size);
        }
        if !cell.is_open(Direction::Left) {
            buffer.vline(nx, ny, ny + size + 1);
        }
    }
}

/// Allocate a `width` x `height` buffer and draw `grid` into it.
pub fn render(grid: &Grid, width: usize, height: usize) -> Result<PixelBuffer> {
    let mut buffer = PixelBuffer::new(width, height)?;
    rasterize(grid, &mut buffer);
    Ok(buffer)
}
