//! Non-uniform grid described by cut-line positions.
//!
//! A [`GridModel`] is two strictly increasing line arrays plus two disjoint
//! sets of per-cell overrides. Column/row counts, cell bounds and cell centres
//! are always derived from the line arrays, never stored.

use std::collections::BTreeSet;

use super::selection::Rect;
use crate::error::GridError;

/// A `(col, row)` cell address.
pub type Cell = (usize, usize);

/// Pixel bounds of one cell; `x2`/`y2` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellBounds {
    pub x1: usize,
    pub y1: usize,
    pub x2: usize,
    pub y2: usize,
}

impl CellBounds {
    #[inline]
    pub fn width(&self) -> usize {
        self.x2 - self.x1
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.y2 - self.y1
    }

    /// Midpoint of the bounds, rounded down.
    #[inline]
    pub fn center(&self) -> (usize, usize) {
        ((self.x1 + self.x2) / 2, (self.y1 + self.y2) / 2)
    }
}

/// Manual override state of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellState {
    /// No override; automatic color exclusion applies.
    #[default]
    Default,
    /// Always transparent.
    Excluded,
    /// Always kept, even when its color matches an exclusion color.
    Included,
}

impl CellState {
    /// The toggle cycle: default -> excluded -> included -> default.
    #[inline]
    pub fn next(self) -> Self {
        match self {
            CellState::Default => CellState::Excluded,
            CellState::Excluded => CellState::Included,
            CellState::Included => CellState::Default,
        }
    }
}

/// Grid of cells defined by explicit vertical (`x_lines`) and horizontal
/// (`y_lines`) cut positions.
///
/// Invariants, upheld by every constructor and mutation:
/// - each line array has at least 2 entries, starts at 0 and is strictly
///   increasing
/// - override cells lie inside `[0, num_cols) x [0, num_rows)`
/// - the excluded and included sets are disjoint
///
/// Treat it as a value: clone it for an independent editing session.
///
/// # Example
///
/// ```
/// use pixel_grid::{CellState, GridModel};
///
/// let mut grid = GridModel::from_uniform(64, 32, 16, 0, 0).unwrap();
/// assert_eq!((grid.num_cols(), grid.num_rows()), (4, 2));
/// assert_eq!(grid.cell_center(1, 1), Some((24, 24)));
///
/// assert_eq!(grid.toggle_cell(0, 0), Some(CellState::Excluded));
/// assert!(grid.is_excluded(0, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridModel {
    x_lines: Vec<usize>,
    y_lines: Vec<usize>,
    excluded: BTreeSet<Cell>,
    included: BTreeSet<Cell>,
}

impl GridModel {
    /// Create a grid from explicit line positions with no overrides.
    pub fn new(x_lines: Vec<usize>, y_lines: Vec<usize>) -> Result<Self, GridError> {
        validate_lines(&x_lines, "x")?;
        validate_lines(&y_lines, "y")?;
        Ok(Self {
            x_lines,
            y_lines,
            excluded: BTreeSet::new(),
            included: BTreeSet::new(),
        })
    }

    /// Create a grid with overrides, e.g. when restoring a saved session.
    ///
    /// Fails with [`GridError::InvalidGrid`] if a line array is malformed, an
    /// override cell is out of range, or a cell is both excluded and included.
    pub fn from_parts<E, I>(
        x_lines: Vec<usize>,
        y_lines: Vec<usize>,
        excluded: E,
        included: I,
    ) -> Result<Self, GridError>
    where
        E: IntoIterator<Item = Cell>,
        I: IntoIterator<Item = Cell>,
    {
        let mut grid = Self::new(x_lines, y_lines)?;
        grid.excluded = excluded.into_iter().collect();
        grid.included = included.into_iter().collect();
        grid.validate()?;
        Ok(grid)
    }

    /// Lay out a uniform grid of `cell_size` over a `width x height` image.
    ///
    /// Negative offsets wrap into `[0, cell_size)`. Lines run from the start
    /// offset in steps of `cell_size`; the image edges are always added, so
    /// partial cells at either end are kept.
    pub fn from_uniform(
        width: usize,
        height: usize,
        cell_size: usize,
        offset_x: i64,
        offset_y: i64,
    ) -> Result<Self, GridError> {
        if cell_size < 1 {
            return Err(GridError::InvalidParameter(format!(
                "cell size must be at least 1, got {}",
                cell_size
            )));
        }
        let x_lines = uniform_lines(width, cell_size, wrap_offset(offset_x, cell_size));
        let y_lines = uniform_lines(height, cell_size, wrap_offset(offset_y, cell_size));
        Self::new(x_lines, y_lines)
    }

    /// Build a uniform grid from a rectangle drawn around one source pixel.
    ///
    /// The larger side of `rect` becomes the (square) cell size and the
    /// rectangle's top-left corner, taken modulo that size, the offset.
    pub fn from_pixel_definition(
        width: usize,
        height: usize,
        rect: Rect,
    ) -> Result<Self, GridError> {
        let (cell_size, offset_x, offset_y) = rect.pixel_definition();
        Self::from_uniform(width, height, cell_size, offset_x, offset_y)
    }

    /// Re-check every invariant.
    pub fn validate(&self) -> Result<(), GridError> {
        validate_lines(&self.x_lines, "x")?;
        validate_lines(&self.y_lines, "y")?;
        let (cols, rows) = (self.num_cols(), self.num_rows());
        if cols < 1 || rows < 1 {
            return Err(GridError::InvalidGrid(format!(
                "grid too small: {}x{}",
                cols, rows
            )));
        }
        let out_of_range = self
            .excluded
            .iter()
            .chain(&self.included)
            .find(|&&(col, row)| col >= cols || row >= rows);
        if let Some((col, row)) = out_of_range {
            return Err(GridError::InvalidGrid(format!(
                "cell ({}, {}) outside {}x{} grid",
                col, row, cols, rows
            )));
        }
        if let Some((col, row)) = self.excluded.intersection(&self.included).next() {
            return Err(GridError::InvalidGrid(format!(
                "cell ({}, {}) is both excluded and included",
                col, row
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn num_cols(&self) -> usize {
        self.x_lines.len().saturating_sub(1)
    }

    #[inline]
    pub fn num_rows(&self) -> usize {
        self.y_lines.len().saturating_sub(1)
    }

    #[inline]
    pub fn x_lines(&self) -> &[usize] {
        &self.x_lines
    }

    #[inline]
    pub fn y_lines(&self) -> &[usize] {
        &self.y_lines
    }

    /// Width and height covered by the grid (the last line on each axis).
    #[inline]
    pub fn extent(&self) -> (usize, usize) {
        (
            self.x_lines.last().copied().unwrap_or(0),
            self.y_lines.last().copied().unwrap_or(0),
        )
    }

    #[inline]
    pub fn contains_cell(&self, col: usize, row: usize) -> bool {
        col < self.num_cols() && row < self.num_rows()
    }

    /// Bounds of a cell, or `None` when it is outside the grid.
    pub fn cell_bounds(&self, col: usize, row: usize) -> Option<CellBounds> {
        if !self.contains_cell(col, row) {
            return None;
        }
        Some(CellBounds {
            x1: self.x_lines[col],
            y1: self.y_lines[row],
            x2: self.x_lines[col + 1],
            y2: self.y_lines[row + 1],
        })
    }

    /// Geometric centre of a cell, or `None` when it is outside the grid.
    #[inline]
    pub fn cell_center(&self, col: usize, row: usize) -> Option<(usize, usize)> {
        self.cell_bounds(col, row).map(|bounds| bounds.center())
    }

    /// The cell containing image point `(x, y)`, if any.
    pub fn cell_at(&self, x: usize, y: usize) -> Option<Cell> {
        Some((locate(&self.x_lines, x)?, locate(&self.y_lines, y)?))
    }

    /// Every cell address in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let cols = self.num_cols();
        (0..self.num_rows()).flat_map(move |row| (0..cols).map(move |col| (col, row)))
    }

    pub fn cell_state(&self, col: usize, row: usize) -> CellState {
        if self.excluded.contains(&(col, row)) {
            CellState::Excluded
        } else if self.included.contains(&(col, row)) {
            CellState::Included
        } else {
            CellState::Default
        }
    }

    #[inline]
    pub fn is_excluded(&self, col: usize, row: usize) -> bool {
        self.excluded.contains(&(col, row))
    }

    #[inline]
    pub fn is_included(&self, col: usize, row: usize) -> bool {
        self.included.contains(&(col, row))
    }

    pub fn excluded_cells(&self) -> &BTreeSet<Cell> {
        &self.excluded
    }

    pub fn included_cells(&self) -> &BTreeSet<Cell> {
        &self.included
    }

    /// Force a cell into `state`. Returns whether anything changed; cells
    /// outside the grid are ignored.
    pub fn set_cell_state(&mut self, col: usize, row: usize, state: CellState) -> bool {
        if !self.contains_cell(col, row) || self.cell_state(col, row) == state {
            return false;
        }
        let cell = (col, row);
        self.excluded.remove(&cell);
        self.included.remove(&cell);
        match state {
            CellState::Default => {}
            CellState::Excluded => {
                self.excluded.insert(cell);
            }
            CellState::Included => {
                self.included.insert(cell);
            }
        }
        true
    }

    /// Advance a cell through default -> excluded -> included -> default.
    ///
    /// Returns the new state, or `None` when the cell is outside the grid.
    pub fn toggle_cell(&mut self, col: usize, row: usize) -> Option<CellState> {
        if !self.contains_cell(col, row) {
            return None;
        }
        let next = self.cell_state(col, row).next();
        self.set_cell_state(col, row, next);
        Some(next)
    }

    /// Clear every manual exclusion.
    pub fn include_all(&mut self) {
        self.excluded.clear();
    }

    /// Exclude every cell and drop all manual inclusions.
    pub fn exclude_all(&mut self) {
        self.included.clear();
        self.excluded = self.cells().collect();
    }

    /// Swap excluded and non-excluded cells; manual inclusions are dropped.
    pub fn invert_exclusions(&mut self) {
        let inverted = self
            .cells()
            .filter(|cell| !self.excluded.contains(cell))
            .collect();
        self.excluded = inverted;
        self.included.clear();
    }

    /// Drag an interior vertical line to `position`.
    ///
    /// The position is clamped so both neighbouring columns stay at least
    /// `min_cell_size` wide. Returns the applied position, or `None` for an
    /// edge line, an unknown index, or neighbours too close to allow it.
    pub fn move_x_line(
        &mut self,
        index: usize,
        position: usize,
        min_cell_size: usize,
    ) -> Option<usize> {
        move_line(&mut self.x_lines, index, position, min_cell_size)
    }

    /// Drag an interior horizontal line; see [`move_x_line`](Self::move_x_line).
    pub fn move_y_line(
        &mut self,
        index: usize,
        position: usize,
        min_cell_size: usize,
    ) -> Option<usize> {
        move_line(&mut self.y_lines, index, position, min_cell_size)
    }

    pub(crate) fn excluded_mut(&mut self) -> &mut BTreeSet<Cell> {
        &mut self.excluded
    }

    pub(crate) fn included_mut(&mut self) -> &mut BTreeSet<Cell> {
        &mut self.included
    }
}

fn validate_lines(lines: &[usize], axis: &str) -> Result<(), GridError> {
    if lines.len() < 2 {
        return Err(GridError::InvalidGrid(format!(
            "{} lines need at least 2 entries, got {}",
            axis,
            lines.len()
        )));
    }
    if lines[0] != 0 {
        return Err(GridError::InvalidGrid(format!(
            "first {} line must be 0, got {}",
            axis, lines[0]
        )));
    }
    if let Some(pair) = lines.windows(2).find(|pair| pair[0] >= pair[1]) {
        return Err(GridError::InvalidGrid(format!(
            "{} lines must be strictly increasing ({} then {})",
            axis, pair[0], pair[1]
        )));
    }
    Ok(())
}

/// Negative offsets wrap into `[0, cell_size)`; non-negative ones are kept.
#[inline]
pub(crate) fn wrap_offset(offset: i64, cell_size: usize) -> usize {
    if offset >= 0 {
        offset as usize
    } else {
        offset.rem_euclid(cell_size as i64) as usize
    }
}

fn uniform_lines(dim: usize, cell_size: usize, start: usize) -> Vec<usize> {
    let mut lines: Vec<usize> = if start <= dim {
        (start..=dim).step_by(cell_size).collect()
    } else {
        Vec::new()
    };
    if lines.last().map_or(true, |&last| last < dim) {
        lines.push(dim);
    }
    if lines[0] > 0 {
        lines.insert(0, 0);
    }
    lines
}

fn locate(lines: &[usize], v: usize) -> Option<usize> {
    let last = *lines.last()?;
    if v < lines[0] || v >= last {
        return None;
    }
    Some(lines.partition_point(|&line| line <= v) - 1)
}

fn move_line(
    lines: &mut [usize],
    index: usize,
    position: usize,
    min_cell_size: usize,
) -> Option<usize> {
    if index == 0 || index + 1 >= lines.len() {
        return None;
    }
    let gap = min_cell_size.max(1);
    let lo = lines[index - 1] + gap;
    let hi = lines[index + 1].checked_sub(gap)?;
    if lo > hi {
        return None;
    }
    let position = position.clamp(lo, hi);
    lines[index] = position;
    Some(position)
}
