//! Model-layer error types.
//!
//! Every variant describes malformed input detected at construction time.
//! Numerical conditions met while calibrating are never reported here.

use pricer_core::types::CoreError;
use thiserror::Error;

/// Errors raised while building grids, targets and weight tables.
///
/// # Examples
///
/// ```
/// use pricer_models::ModelError;
///
/// let err = ModelError::quote_out_of_grid(4, 3, 3, 5);
/// assert!(err.is_quote_out_of_grid());
/// assert!(format!("{}", err).contains("(4, 3)"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Time grid dimensions or bucket breaks are invalid.
    #[error("Invalid time grid: {0}")]
    InvalidTimeGrid(String),

    /// A market quote is negative or not finite.
    #[error("Invalid quote at (expiry {expiry}, tenor {tenor}): {value}")]
    InvalidQuote {
        /// 1-based expiry
        expiry: usize,
        /// 1-based tenor
        tenor: usize,
        /// Offending quote
        value: f64,
    },

    /// A quote lies outside the triangular grid.
    #[error(
        "Quote at (expiry, tenor) = ({expiry}, {tenor}) lies outside the grid \
         (max expiry {max_expiry}, max tenor {max_tenor})"
    )]
    QuoteOutOfGrid {
        /// 1-based expiry
        expiry: usize,
        /// 1-based tenor
        tenor: usize,
        /// Grid maximum expiry
        max_expiry: usize,
        /// Grid maximum tenor
        max_tenor: usize,
    },

    /// Weight table inputs are invalid.
    #[error("Invalid swaption weights: {0}")]
    InvalidWeights(String),

    /// Factor count is zero or a loading vector has the wrong length.
    #[error("Invalid factor count: expected {expected}, got {actual}")]
    InvalidFactorCount {
        /// Expected number of factors
        expected: usize,
        /// Actual number of factors
        actual: usize,
    },

    /// Two structures disagree about the grid shape.
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Wrapped foundation error.
    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

impl ModelError {
    /// Create an invalid time grid error.
    pub fn invalid_time_grid(message: impl Into<String>) -> Self {
        Self::InvalidTimeGrid(message.into())
    }

    /// Create an invalid quote error.
    pub fn invalid_quote(expiry: usize, tenor: usize, value: f64) -> Self {
        Self::InvalidQuote {
            expiry,
            tenor,
            value,
        }
    }

    /// Create a quote-out-of-grid error.
    pub fn quote_out_of_grid(
        expiry: usize,
        tenor: usize,
        max_expiry: usize,
        max_tenor: usize,
    ) -> Self {
        Self::QuoteOutOfGrid {
            expiry,
            tenor,
            max_expiry,
            max_tenor,
        }
    }

    /// Create an invalid weights error.
    pub fn invalid_weights(message: impl Into<String>) -> Self {
        Self::InvalidWeights(message.into())
    }

    /// Create an invalid factor count error.
    pub fn invalid_factor_count(expected: usize, actual: usize) -> Self {
        Self::InvalidFactorCount { expected, actual }
    }

    /// Create a shape mismatch error.
    pub fn shape_mismatch(message: impl Into<String>) -> Self {
        Self::ShapeMismatch(message.into())
    }

    /// Check if this is an invalid time grid error.
    pub fn is_invalid_time_grid(&self) -> bool {
        matches!(self, Self::InvalidTimeGrid(_))
    }

    /// Check if this is an invalid quote error.
    pub fn is_invalid_quote(&self) -> bool {
        matches!(self, Self::InvalidQuote { .. })
    }

    /// Check if this is a quote-out-of-grid error.
    pub fn is_quote_out_of_grid(&self) -> bool {
        matches!(self, Self::QuoteOutOfGrid { .. })
    }

    /// Check if this is an invalid weights error.
    pub fn is_invalid_weights(&self) -> bool {
        matches!(self, Self::InvalidWeights(_))
    }

    /// Check if this is an invalid factor count error.
    pub fn is_invalid_factor_count(&self) -> bool {
        matches!(self, Self::InvalidFactorCount { .. })
    }

    /// Check if this is a shape mismatch error.
    pub fn is_shape_mismatch(&self) -> bool {
        matches!(self, Self::ShapeMismatch(_))
    }
}
