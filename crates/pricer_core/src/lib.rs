//! # pricer_core: Foundation Layer for Volatility Calibration
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core is the bottom layer of the workspace, providing:
//! - Small dense vector arithmetic for factor-loading vectors (`math::vector`)
//! - Day count conventions and accrual schedules (`types::time`)
//! - Error types: `CoreError` (`types::error`)
//! - The `Float` trait re-export used by generic numerical code (`traits`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other pricer_* crates, with minimal external dependencies:
//! - num-traits: Traits for generic numerical computation
//! - chrono: Date arithmetic
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use chrono::NaiveDate;
//! use pricer_core::math::vector::{dot, norm};
//! use pricer_core::types::{DayCountConvention, YearFraction};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let end = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
//! let tau = DayCountConvention::Act360.year_fraction(start, end);
//! assert!((tau - 0.5056).abs() < 1e-3);
//!
//! let loading: [f64; 3] = [0.12, -0.05, 0.01];
//! assert!((dot(&loading, &loading) - norm(&loading).powi(2)).abs() < 1e-15);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Enable serialisation for `DayCountConvention`

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod traits;
pub mod types;
