//! Grid model and region selection.
//!
//! A grid is two sorted arrays of cut lines, one per axis, plus the manual
//! per-cell overrides an editor accumulates.

mod model;
pub mod selection;

pub use model::{Cell, CellBounds, CellState, GridModel};
pub(crate) use model::wrap_offset;
pub use selection::{point_in_polygon, Contour, Point, Rect};
