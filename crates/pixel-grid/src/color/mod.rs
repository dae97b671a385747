//! Color values, quantization and tolerance matching.
//!
//! - [`reduce_color`]: bit-depth reduction to bucket midpoints
//! - [`colors_similar`]: per-channel tolerance comparison
//! - [`ExclusionSpec`]: the background colors turned transparent by the samplers

mod error;
mod exclusion;
mod quantize;
mod rgb;

pub use error::ParseColorError;
pub use exclusion::{ExclusionSpec, DEFAULT_TOLERANCE, MAX_EXCLUDED_COLORS};
pub use quantize::{colors_similar, reduce_color, FULL_BIT_DEPTH};
pub use rgb::{Rgb, Rgba};
