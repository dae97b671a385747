//! Unified error type for the pixel-grid crate.
//!
//! Every failure is synchronous, local and deterministic: nothing here is
//! transient, so callers never need to retry.

use std::fmt;

use crate::color::ParseColorError;

/// Error returned by grid construction and the cell samplers.
///
/// # Example
///
/// ```
/// use pixel_grid::{transform_uniform, GridError, PixelBuffer, SampleOptions};
///
/// let buffer = PixelBuffer::transparent(4, 4);
/// let err = transform_uniform(&buffer, 0, 0, 0, &SampleOptions::default()).unwrap_err();
/// assert!(matches!(err, GridError::InvalidParameter(_)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// A numeric parameter is out of range (e.g. a cell size below 1)
    InvalidParameter(String),
    /// Line arrays are malformed or describe a degenerate cell count
    InvalidGrid(String),
    /// The computed output would have zero width or height
    EmptyResult {
        /// Computed output width
        width: usize,
        /// Computed output height
        height: usize,
    },
    /// Raw pixel data does not match the stated dimensions
    BufferSize {
        /// `width * height * 4`
        expected: usize,
        /// Length actually supplied
        actual: usize,
    },
    /// More exclusion colors than there are slots
    TooManyExclusionColors {
        /// Number of available slots
        max: usize,
    },
    /// Invalid hex color string
    ParseColor(ParseColorError),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::InvalidParameter(msg) => write!(f, "invalid parameter: {}", msg),
            GridError::InvalidGrid(msg) => write!(f, "invalid grid: {}", msg),
            GridError::EmptyResult { width, height } => {
                write!(f, "result would be empty: {}x{}", width, height)
            }
            GridError::BufferSize { expected, actual } => {
                write!(
                    f,
                    "pixel data length mismatch: expected {} bytes, got {}",
                    expected, actual
                )
            }
            GridError::TooManyExclusionColors { max } => {
                write!(f, "at most {} exclusion colors are supported", max)
            }
            GridError::ParseColor(err) => write!(f, "invalid color: {}", err),
        }
    }
}

impl std::error::Error for GridError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GridError::ParseColor(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ParseColorError> for GridError {
    fn from(err: ParseColorError) -> Self {
        GridError::ParseColor(err)
    }
}
