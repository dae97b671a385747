//! Sampling options.

use crate::color::{ExclusionSpec, Rgb, FULL_BIT_DEPTH};

/// Quantization and background-exclusion settings shared by both samplers.
///
/// # Example
///
/// ```
/// use pixel_grid::{Rgb, SampleOptions};
///
/// let options = SampleOptions::new()
///     .bit_depth(5)
///     .exclude(Rgb::new(255, 0, 255))
///     .tolerance(4);
/// assert_eq!(options.bit_depth, 5);
/// assert_eq!(options.exclusion.tolerance(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleOptions {
    /// Bits per channel kept after quantization; 8 and above is lossless.
    ///
    /// Default: `8`
    pub bit_depth: u8,

    /// Colors that turn a default cell transparent.
    ///
    /// Default: empty, tolerance 10
    pub exclusion: ExclusionSpec,
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self {
            bit_depth: FULL_BIT_DEPTH,
            exclusion: ExclusionSpec::default(),
        }
    }
}

impl SampleOptions {
    /// Same as `SampleOptions::default()`.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn bit_depth(mut self, bits: u8) -> Self {
        self.bit_depth = bits;
        self
    }

    /// Add an exclusion color. Once both slots are taken further colors are
    /// ignored; build an [`ExclusionSpec`] with
    /// [`from_colors`](ExclusionSpec::from_colors) to get an error instead.
    #[inline]
    pub fn exclude(mut self, color: Rgb) -> Self {
        self.exclusion.push(color);
        self
    }

    #[inline]
    pub fn tolerance(mut self, tolerance: u8) -> Self {
        self.exclusion.set_tolerance(tolerance);
        self
    }

    #[inline]
    pub fn exclusion(mut self, exclusion: ExclusionSpec) -> Self {
        self.exclusion = exclusion;
        self
    }
}
