//! Uniform-block grid-period detection.
//!
//! An image upscaled by an integer factor `s` consists of `s x s` blocks of a
//! single color. Detection tries each candidate `s` that divides both
//! dimensions, samples blocks at a fixed stride, and accepts the first
//! candidate whose sampled blocks are uniform often enough.

use super::options::{DetectOptions, CANONICAL_SIZES};
use crate::buffer::PixelBuffer;

/// Outcome of a detection scan.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Accepted period, or `1` when no candidate qualified.
    pub size: usize,
    /// `(size, uniform fraction)` for every candidate evaluated, in the order
    /// tried. Ends with the accepted candidate when one was found.
    pub scores: Vec<(usize, f64)>,
}

impl Detection {
    /// True when a repeating block pattern was found.
    #[inline]
    pub fn found(&self) -> bool {
        self.size > 1
    }
}

/// Candidate periods for a `width x height` image, in the order they are tried.
///
/// Contains every `s` in `2..=max_check` dividing both dimensions: the
/// [`CANONICAL_SIZES`] first (in their fixed order), then the remaining
/// divisors in descending order.
///
/// # Example
/// ```
/// use pixel_grid::candidate_sizes;
///
/// // 96 and 36 (divisors 2, 3, 4, 6, 12) -> canonical order
/// assert_eq!(candidate_sizes(96, 36, 128), vec![12, 6, 4, 3, 2]);
/// // 7 is not canonical, so it comes after the canonical divisors
/// assert_eq!(candidate_sizes(14, 14, 128), vec![2, 14, 7]);
/// ```
pub fn candidate_sizes(width: usize, height: usize, max_check: usize) -> Vec<usize> {
    let upper = width.min(height).min(max_check);
    let divisors: Vec<usize> = (2..=upper)
        .rev()
        .filter(|&s| width % s == 0 && height % s == 0)
        .collect();

    let mut ordered: Vec<usize> = CANONICAL_SIZES
        .iter()
        .copied()
        .filter(|s| divisors.contains(s))
        .collect();
    ordered.extend(divisors.iter().filter(|s| !CANONICAL_SIZES.contains(s)));
    ordered
}

/// Fraction of sampled `size x size` blocks whose pixels all share the RGB
/// value of the block's top-left pixel.
///
/// Blocks are indexed row-major; indices `0, stride, 2*stride, ...` are
/// visited with `stride = max(1, total_blocks / max_samples)`. Alpha is not
/// compared. Returns `0.0` when no block fits.
pub fn uniform_fraction(buffer: &PixelBuffer, size: usize, max_samples: usize) -> f64 {
    if size == 0 {
        return 0.0;
    }
    let blocks_x = buffer.width() / size;
    let blocks_y = buffer.height() / size;
    let total_blocks = blocks_x * blocks_y;
    if total_blocks == 0 {
        return 0.0;
    }

    let stride = (total_blocks / max_samples.max(1)).max(1);
    let mut sampled = 0usize;
    let mut uniform = 0usize;

    for index in (0..total_blocks).step_by(stride) {
        let bx = (index % blocks_x) * size;
        let by = (index / blocks_x) * size;
        if block_is_uniform(buffer, bx, by, size) {
            uniform += 1;
        }
        sampled += 1;
    }

    uniform as f64 / sampled as f64
}

fn block_is_uniform(buffer: &PixelBuffer, bx: usize, by: usize, size: usize) -> bool {
    let first = &buffer.row(by)[bx * 4..bx * 4 + 3];
    (by..by + size).all(|y| {
        buffer.row(y)[bx * 4..(bx + size) * 4]
            .chunks_exact(4)
            .all(|px| &px[..3] == first)
    })
}

/// Scan `buffer` for a uniform grid period.
///
/// Never fails: images smaller than 2 pixels in either dimension, and images
/// where no candidate reaches `options.threshold`, yield `size == 1`.
pub fn detect(buffer: &PixelBuffer, options: &DetectOptions) -> Detection {
    let mut scores = Vec::new();
    if buffer.width() < 2 || buffer.height() < 2 {
        return Detection { size: 1, scores };
    }

    for size in candidate_sizes(buffer.width(), buffer.height(), options.max_check) {
        let fraction = uniform_fraction(buffer, size, options.max_samples);
        scores.push((size, fraction));
        if fraction >= options.threshold {
            return Detection { size, scores };
        }
    }

    Detection { size: 1, scores }
}

/// Detect the grid period with the default sample budget.
///
/// Returns `1` for "no repeating pattern found".
///
/// # Example
/// ```
/// use pixel_grid::{detect_pixel_size, PixelBuffer, Rgba};
///
/// // 2x2 checkerboard upscaled 16x
/// let buffer = PixelBuffer::from_fn(32, 32, |x, y| {
///     if (x / 16 + y / 16) % 2 == 0 { Rgba::opaque(255, 255, 255) } else { Rgba::opaque(0, 0, 0) }
/// });
/// assert_eq!(detect_pixel_size(&buffer, 128, 0.95), 16);
/// ```
pub fn detect_pixel_size(buffer: &PixelBuffer, max_check: usize, threshold: f64) -> usize {
    let options = DetectOptions::new()
        .max_check(max_check)
        .threshold(threshold);
    detect(buffer, &options).size
}
