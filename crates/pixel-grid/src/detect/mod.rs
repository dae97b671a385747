//! Grid-period detection from pixel uniformity statistics.

mod detector;
mod options;

pub use detector::{candidate_sizes, detect, detect_pixel_size, uniform_fraction, Detection};
pub use options::{DetectOptions, CANONICAL_SIZES};
