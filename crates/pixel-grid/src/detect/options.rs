//! Grid-period detection options.
//!
//! This module provides the [`DetectOptions`] struct for configuring
//! [`detect`](super::detect).

/// Canonical pixel-art scale factors, tried before any other divisor.
///
/// A candidate that appears here wins over a larger non-canonical divisor
/// that would otherwise qualify first.
pub const CANONICAL_SIZES: [usize; 13] = [64, 48, 32, 24, 16, 12, 10, 8, 6, 5, 4, 3, 2];

/// Configuration for grid-period detection.
///
/// # Defaults
///
/// - Max check: `128` (largest candidate period)
/// - Threshold: `0.95` (fraction of sampled blocks that must be uniform)
/// - Max samples: `100` (blocks sampled per candidate)
///
/// # Example
///
/// ```
/// use pixel_grid::DetectOptions;
///
/// let options = DetectOptions::new().threshold(0.9).max_check(64);
/// assert_eq!(options.max_check, 64);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DetectOptions {
    /// Largest block size considered.
    ///
    /// Default: `128`
    pub max_check: usize,

    /// Minimum uniform fraction (0..=1) a candidate needs to be accepted.
    ///
    /// Default: `0.95`
    pub threshold: f64,

    /// Number of blocks the sampling stride aims for.
    ///
    /// Default: `100`
    pub max_samples: usize,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            max_check: 128,
            threshold: 0.95,
            max_samples: 100,
        }
    }
}

impl DetectOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn max_check(mut self, max_check: usize) -> Self {
        self.max_check = max_check;
        self
    }

    #[inline]
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the sample budget. Values below 1 are treated as 1.
    #[inline]
    pub fn max_samples(mut self, max_samples: usize) -> Self {
        self.max_samples = max_samples.max(1);
        self
    }
}
