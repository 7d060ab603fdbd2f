//! Core time and error types.
//!
//! This module provides:
//! - `time`: Day count conventions, the `YearFraction` seam and regular accrual schedules
//! - `error`: Structured error type for foundation-level operations
//!
//! # Re-exports
//!
//! For convenience, commonly used types are re-exported at this module level:
//! - [`DayCountConvention`], [`YearFraction`], [`accrual_fractions`] from `time`
//! - [`CoreError`] from `error`

pub mod error;
pub mod time;

pub use error::CoreError;
pub use time::{accrual_fractions, DayCountConvention, YearFraction};
