//! Sampling on an arbitrary (non-uniform) grid.

use crate::buffer::PixelBuffer;
use crate::error::GridError;
use crate::grid::{Cell, GridModel};

use super::decision::{decide, CellDecision};
use super::options::SampleOptions;

/// One cell as the custom sampler sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPreview {
    pub cell: Cell,
    /// Sample point, already clamped into the buffer.
    pub center: (usize, usize),
    pub decision: CellDecision,
}

/// Downsample `buffer` to one pixel per cell of `grid`.
///
/// The output is `num_cols x num_rows`. Cells in the grid's excluded set are
/// transparent, manually included cells keep their color, and default cells
/// are subject to the color-exclusion test; see [`decide`].
///
/// The grid is only read. A grid larger than the buffer samples clamped
/// edge pixels.
///
/// # Errors
///
/// - [`GridError::InvalidGrid`] if the grid fails [`GridModel::validate`]
/// - [`GridError::EmptyResult`] if `buffer` has no pixels
pub fn transform_custom(
    buffer: &PixelBuffer,
    grid: &GridModel,
    options: &SampleOptions,
) -> Result<PixelBuffer, GridError> {
    let previews = preview_custom(buffer, grid, options)?;
    let mut out = PixelBuffer::transparent(grid.num_cols(), grid.num_rows());
    for preview in previews {
        let (col, row) = preview.cell;
        out.set_pixel(col, row, preview.decision.output());
    }
    Ok(out)
}

/// Per-cell decisions of [`transform_custom`], row-major, with the sample
/// point of each cell. This is what an editor needs to mark kept and dropped
/// cells without producing the output image.
pub fn preview_custom(
    buffer: &PixelBuffer,
    grid: &GridModel,
    options: &SampleOptions,
) -> Result<Vec<CellPreview>, GridError> {
    grid.validate()?;
    if buffer.is_empty() {
        return Err(GridError::EmptyResult {
            width: buffer.width(),
            height: buffer.height(),
        });
    }

    let max_x = buffer.width() - 1;
    let max_y = buffer.height() - 1;
    let previews = grid
        .cells()
        .filter_map(|(col, row)| {
            let (cx, cy) = grid.cell_center(col, row)?;
            let center = (cx.min(max_x), cy.min(max_y));
            let source = buffer.pixel(center.0, center.1);
            Some(CellPreview {
                cell: (col, row),
                center,
                decision: decide(source, grid.cell_state(col, row), options),
            })
        })
        .collect();
    Ok(previews)
}
