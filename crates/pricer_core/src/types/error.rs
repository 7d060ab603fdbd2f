//! Foundation error type.
//!
//! `CoreError` covers the few ways foundation helpers can reject their
//! input: vectors of different lengths, unparsable conventions and invalid
//! schedule requests.

use thiserror::Error;

/// Errors from foundation-level operations.
///
/// # Examples
/// ```
/// use pricer_core::types::CoreError;
///
/// let err = CoreError::dimension_mismatch(3, 2);
/// assert_eq!(format!("{}", err), "Dimension mismatch: expected 3, got 2");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Two vectors that must have the same length do not.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// Unknown day count convention name.
    #[error("Unknown day count convention: {0}")]
    UnknownDayCount(String),

    /// General invalid input error.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CoreError {
    /// Create a dimension mismatch error.
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Check if this is a dimension mismatch.
    pub fn is_dimension_mismatch(&self) -> bool {
        matches!(self, Self::DimensionMismatch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_display() {
        let err = CoreError::dimension_mismatch(4, 3);
        let display = format!("{}", err);
        assert!(display.contains("expected 4"));
        assert!(display.contains("got 3"));
        assert!(err.is_dimension_mismatch());
    }

    #[test]
    fn test_unknown_day_count_display() {
        let err = CoreError::UnknownDayCount("ACT/999".to_string());
        assert_eq!(format!("{}", err), "Unknown day count convention: ACT/999");
        assert!(!err.is_dimension_mismatch());
    }

    #[test]
    fn test_invalid_input_display() {
        let err = CoreError::invalid_input("zero periods");
        assert_eq!(format!("{}", err), "Invalid input: zero periods");
    }

    #[test]
    fn test_error_trait_implementation() {
        let err = CoreError::dimension_mismatch(1, 2);
        let _: &dyn std::error::Error = &err;
    }
}
