//! Rectangle and polygon cell selection.
//!
//! Membership is decided by a cell's *centre*: a cell belongs to a rectangle
//! or polygon iff its centre point does. The bulk operations on
//! [`GridModel`] return how many cells actually changed, so applying one
//! twice reports 0 the second time.

use std::collections::BTreeSet;

use super::model::{Cell, GridModel};

/// A point in image space. May lie outside the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    #[inline]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<(i64, i64)> for Point {
    #[inline]
    fn from((x, y): (i64, i64)) -> Self {
        Self::new(x, y)
    }
}

/// Axis-aligned rectangle with inclusive, normalised bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
}

impl Rect {
    /// Normalise two arbitrary corners into min/max bounds.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x1: a.x.min(b.x),
            y1: a.y.min(b.y),
            x2: a.x.max(b.x),
            y2: a.y.max(b.y),
        }
    }

    #[inline]
    pub fn width(&self) -> i64 {
        self.x2 - self.x1
    }

    #[inline]
    pub fn height(&self) -> i64 {
        self.y2 - self.y1
    }

    /// Inclusive containment on all four edges.
    #[inline]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        self.x1 <= x && x <= self.x2 && self.y1 <= y && y <= self.y2
    }

    /// Interpret the rectangle as one source pixel: `(cell_size, offset_x,
    /// offset_y)` with the cell size the larger side (at least 1) and the
    /// offsets the top-left corner wrapped into `[0, cell_size)`.
    pub fn pixel_definition(&self) -> (usize, i64, i64) {
        let cell_size = self.width().max(1).max(self.height().max(1)) as usize;
        let size = cell_size as i64;
        (cell_size, self.x1.rem_euclid(size), self.y1.rem_euclid(size))
    }
}

/// Even-odd ray-casting test.
///
/// Casts a horizontal ray from `(x, y)` and counts edge crossings; the point
/// is inside iff the count is odd. Polygons with fewer than 3 vertices
/// contain nothing. Self-intersecting polygons give deterministic even-odd
/// results.
pub fn point_in_polygon(x: f64, y: f64, polygon: &[Point]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = (polygon[i].x as f64, polygon[i].y as f64);
        let (xj, yj) = (polygon[j].x as f64, polygon[j].y as f64);
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// A polygon drawn point by point.
///
/// The contour only selects cells once it has at least 3 points *and* has
/// been explicitly closed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contour {
    points: Vec<Point>,
    closed: bool,
}

impl Contour {
    pub fn new() -> Self {
        Self::default()
    }

    /// An open contour over `points`.
    pub fn from_points<I: IntoIterator<Item = Point>>(points: I) -> Self {
        Self {
            points: points.into_iter().collect(),
            closed: false,
        }
    }

    /// Append a vertex. Adding to a closed contour starts a new one.
    pub fn push(&mut self, point: Point) {
        if self.closed {
            self.points.clear();
            self.closed = false;
        }
        self.points.push(point);
    }

    /// Editor click: closes the contour when `point` lands within `radius`
    /// of the first vertex (and there are at least 3), otherwise pushes it.
    /// Returns whether the contour closed.
    pub fn click(&mut self, point: Point, radius: f64) -> bool {
        if self.try_close_near(point, radius) {
            return true;
        }
        self.push(point);
        false
    }

    /// Close when `point` is within `radius` of the first vertex.
    pub fn try_close_near(&mut self, point: Point, radius: f64) -> bool {
        match self.points.first() {
            Some(&first) if !self.closed && self.points.len() >= 3 => {
                if first.distance(point) <= radius {
                    self.closed = true;
                }
                self.closed
            }
            _ => false,
        }
    }

    /// Finalise the contour. Has no effect with fewer than 3 points.
    pub fn close(&mut self) -> bool {
        if self.points.len() >= 3 {
            self.closed = true;
        }
        self.closed
    }

    /// Remove the last vertex; the contour re-opens.
    pub fn undo_last(&mut self) -> Option<Point> {
        let point = self.points.pop()?;
        self.closed = false;
        Some(point)
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.closed = false;
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The vertex list, only once the contour is closed.
    pub fn polygon(&self) -> Option<&[Point]> {
        (self.closed && self.points.len() >= 3).then_some(self.points.as_slice())
    }
}

impl GridModel {
    fn cells_where<F>(&self, mut keep: F) -> Vec<Cell>
    where
        F: FnMut(usize, usize) -> bool,
    {
        self.cells()
            .filter(|&(col, row)| {
                self.cell_center(col, row)
                    .is_some_and(|(cx, cy)| keep(cx, cy))
            })
            .collect()
    }

    /// Cells whose centre lies inside `rect` (edges inclusive), row-major.
    pub fn cells_in_rectangle(&self, rect: &Rect) -> Vec<Cell> {
        self.cells_where(|cx, cy| rect.contains(cx as i64, cy as i64))
    }

    /// Cells whose centre lies inside `polygon`, row-major. Empty for fewer
    /// than 3 vertices.
    pub fn cells_in_polygon(&self, polygon: &[Point]) -> Vec<Cell> {
        if polygon.len() < 3 {
            return Vec::new();
        }
        self.cells_where(|cx, cy| point_in_polygon(cx as f64, cy as f64, polygon))
    }

    /// Clear the manual exclusion of every cell in `rect`.
    pub fn include_in_rectangle(&mut self, rect: &Rect) -> usize {
        let cells = self.cells_in_rectangle(rect);
        self.unexclude(cells)
    }

    /// Exclude every cell in `rect`, dropping any manual inclusion.
    pub fn exclude_in_rectangle(&mut self, rect: &Rect) -> usize {
        let cells = self.cells_in_rectangle(rect);
        self.exclude(cells)
    }

    /// Clear the manual exclusion of every cell inside `polygon`.
    pub fn include_in_polygon(&mut self, polygon: &[Point]) -> usize {
        let cells = self.cells_in_polygon(polygon);
        self.unexclude(cells)
    }

    /// Exclude every cell whose centre is *not* inside `polygon`.
    pub fn exclude_outside_polygon(&mut self, polygon: &[Point]) -> usize {
        let inside: BTreeSet<Cell> = self.cells_in_polygon(polygon).into_iter().collect();
        let outside: Vec<Cell> = self.cells().filter(|cell| !inside.contains(cell)).collect();
        self.exclude(outside)
    }

    /// [`include_in_polygon`](Self::include_in_polygon) for a closed contour;
    /// 0 while the contour is open.
    pub fn include_in_contour(&mut self, contour: &Contour) -> usize {
        contour
            .polygon()
            .map_or(0, |polygon| self.include_in_polygon(polygon))
    }

    /// [`exclude_outside_polygon`](Self::exclude_outside_polygon) for a
    /// closed contour; 0 while the contour is open.
    pub fn exclude_outside_contour(&mut self, contour: &Contour) -> usize {
        contour
            .polygon()
            .map_or(0, |polygon| self.exclude_outside_polygon(polygon))
    }

    fn unexclude(&mut self, cells: Vec<Cell>) -> usize {
        let excluded = self.excluded_mut();
        cells.iter().filter(|cell| excluded.remove(*cell)).count()
    }

    fn exclude(&mut self, cells: Vec<Cell>) -> usize {
        let mut changed = 0;
        for cell in cells {
            if self.excluded_mut().insert(cell) {
                self.included_mut().remove(&cell);
                changed += 1;
            }
        }
        changed
    }
}
