//! Sampling on a fixed-size grid.

use crate::buffer::PixelBuffer;
use crate::error::GridError;
use crate::grid::{wrap_offset, CellState};

use super::decision::decide;
use super::options::SampleOptions;

/// Downsample `buffer` with square cells of `cell_size` pixels.
///
/// Negative offsets wrap into `[0, cell_size)`; the output is
/// `floor((dim - start) / cell_size)` pixels along each axis, so partial cells
/// at the far edges are dropped. Each output pixel samples the centre of its
/// cell (clamped into the buffer). With no manual overrides every cell is a
/// default cell and goes through the color-exclusion test.
///
/// # Errors
///
/// - [`GridError::InvalidParameter`] if `cell_size < 1`
/// - [`GridError::EmptyResult`] if the output would have no columns or rows
///
/// # Example
///
/// ```
/// use pixel_grid::{transform_uniform, PixelBuffer, Rgba, SampleOptions};
///
/// // 2x1 art scaled 3x
/// let buffer = PixelBuffer::from_fn(6, 3, |x, _| {
///     if x < 3 { Rgba::opaque(255, 0, 0) } else { Rgba::opaque(0, 0, 255) }
/// });
/// let out = transform_uniform(&buffer, 3, 0, 0, &SampleOptions::default()).unwrap();
/// assert_eq!((out.width(), out.height()), (2, 1));
/// assert_eq!(out.pixel(1, 0), Rgba::opaque(0, 0, 255));
/// ```
pub fn transform_uniform(
    buffer: &PixelBuffer,
    cell_size: usize,
    offset_x: i64,
    offset_y: i64,
    options: &SampleOptions,
) -> Result<PixelBuffer, GridError> {
    if cell_size < 1 {
        return Err(GridError::InvalidParameter(format!(
            "cell size must be at least 1, got {}",
            cell_size
        )));
    }

    let start_x = wrap_offset(offset_x, cell_size);
    let start_y = wrap_offset(offset_y, cell_size);
    let out_width = buffer.width().saturating_sub(start_x) / cell_size;
    let out_height = buffer.height().saturating_sub(start_y) / cell_size;
    if out_width < 1 || out_height < 1 {
        return Err(GridError::EmptyResult {
            width: out_width,
            height: out_height,
        });
    }

    let half = cell_size / 2;
    Ok(PixelBuffer::from_fn(out_width, out_height, |px, py| {
        let source = buffer.pixel_clamped(
            start_x + px * cell_size + half,
            start_y + py * cell_size + half,
        );
        decide(source, CellState::Default, options).output()
    }))
}
