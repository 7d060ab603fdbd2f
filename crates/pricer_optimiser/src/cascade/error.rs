//! Cascade error types.
//!
//! Only configuration problems are errors. Numerical conditions met during
//! the cascade (unreachable targets, no free variance) are reported as step
//! outcomes instead.

use pricer_models::ModelError;
use thiserror::Error;

/// Errors detected when setting up a cascade.
///
/// # Examples
///
/// ```
/// use pricer_optimiser::cascade::CascadeError;
///
/// let err = CascadeError::grid_mismatch("weights", (2, 4), (3, 4));
/// assert!(err.is_grid_mismatch());
/// assert!(format!("{}", err).contains("weights"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CascadeError {
    /// Scale bounds or switches are invalid.
    #[error("Invalid cascade parameters: {0}")]
    InvalidParameters(String),

    /// A collaborator was built for a different time grid.
    #[error(
        "Grid mismatch: {component} built for {actual:?} (max expiry, max tenor), \
         time grid is {expected:?}"
    )]
    GridMismatch {
        /// Mismatching collaborator
        component: &'static str,
        /// Time grid dimensions
        expected: (usize, usize),
        /// Collaborator dimensions
        actual: (usize, usize),
    },

    /// Wrapped model-layer error.
    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}

impl CascadeError {
    /// Create an invalid parameters error.
    pub fn invalid_parameters(message: impl Into<String>) -> Self {
        Self::InvalidParameters(message.into())
    }

    /// Create a grid mismatch error.
    pub fn grid_mismatch(
        component: &'static str,
        expected: (usize, usize),
        actual: (usize, usize),
    ) -> Self {
        Self::GridMismatch {
            component,
            expected,
            actual,
        }
    }

    /// Check if this is an invalid parameters error.
    pub fn is_invalid_parameters(&self) -> bool {
        matches!(self, Self::InvalidParameters(_))
    }

    /// Check if this is a grid mismatch error.
    pub fn is_grid_mismatch(&self) -> bool {
        matches!(self, Self::GridMismatch { .. })
    }
}
