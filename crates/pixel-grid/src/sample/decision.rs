//! The per-cell keep/exclude rule.

use crate::color::{reduce_color, Rgba};
use crate::grid::CellState;

use super::options::SampleOptions;

/// What happens to one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellDecision {
    /// The cell is emitted with this color.
    Keep(Rgba),
    /// The cell is in the grid's excluded set.
    ManuallyExcluded,
    /// The quantized sample matched an exclusion color.
    ColorExcluded,
}

impl CellDecision {
    /// The output pixel: the kept color or fully transparent.
    #[inline]
    pub fn output(self) -> Rgba {
        match self {
            CellDecision::Keep(color) => color,
            CellDecision::ManuallyExcluded | CellDecision::ColorExcluded => Rgba::TRANSPARENT,
        }
    }

    #[inline]
    pub fn is_kept(self) -> bool {
        matches!(self, CellDecision::Keep(_))
    }
}

/// Decide the fate of a cell whose centre sample is `source`.
///
/// Manual flags win over color rules: excluded cells are dropped without
/// looking at the color, included cells are kept even when their color is on
/// the exclusion list. Only default cells go through the color test. A kept
/// cell carries the quantized RGB and the *unquantized* source alpha.
pub fn decide(source: Rgba, state: CellState, options: &SampleOptions) -> CellDecision {
    if state == CellState::Excluded {
        return CellDecision::ManuallyExcluded;
    }

    let rgb = reduce_color(source, options.bit_depth);
    if state == CellState::Default && options.exclusion.matches(rgb) {
        return CellDecision::ColorExcluded;
    }
    CellDecision::Keep(rgb.with_alpha(source.a))
}
