//! Why a hex color string was rejected.

use std::fmt;

/// Returned by `"#rrggbb".parse::<Rgb>()` and the exclusion-color parsers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseColorError {
    /// Digit count after the optional `#` was neither 3 nor 6.
    WrongDigitCount { digits: usize },
    /// A character outside `0-9a-fA-F`, signs included.
    InvalidDigit(char),
}

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseColorError::WrongDigitCount { digits } => {
                write!(f, "expected 3 or 6 hex digits, got {}", digits)
            }
            ParseColorError::InvalidDigit(c) => write!(f, "invalid hex digit {:?}", c),
        }
    }
}

impl std::error::Error for ParseColorError {}
