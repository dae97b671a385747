//! Cell samplers: turn an upscaled buffer back into one pixel per cell.
//!
//! Both samplers read the centre pixel of each cell, quantize it and then
//! apply the same [`decide`] rule, so a cell with a given override state and
//! source colour comes out identically whichever sampler produced it.

mod custom;
mod decision;
mod options;
mod uniform;

pub use custom::{preview_custom, transform_custom, CellPreview};
pub use decision::{decide, CellDecision};
pub use options::SampleOptions;
pub use uniform::transform_uniform;
