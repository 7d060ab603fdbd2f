//! # Pricer Models (L2: Volatility Grids and Calibration Inputs)
//!
//! Data structures consumed and produced by forward-rate volatility
//! calibration.
//!
//! This crate provides:
//! - [`volatility::TimeGrid`]: expiry/tenor discretisation with bucket lookups
//! - [`volatility::InterestRateVolatilities`]: the triangular grid of per-cell
//!   factor-loading vectors, stored in a flat arena
//! - [`calibration::CalibrationTargets`]: caplet and swaption implied vols
//! - [`calibration::SwaptionWeights`]: frozen swap-rate weights used to
//!   project the grid onto a single instrument
//! - [`calibration::fit_diagnostics`]: fit quality of a grid against its targets
//!
//! ## Grid Convention
//!
//! Expiries and tenors are 1-based integers. A caplet is an instrument with
//! tenor 1. Row `i` of the volatility grid (zero-based period) holds
//! `MaxTenor - i` cells and cell `(i, col)` is the loading of forward
//! `i + col` during period `i`.
//!
//! ```
//! use pricer_models::calibration::{CalibrationTargets, SwaptionWeights};
//! use pricer_models::volatility::{InterestRateVolatilities, TimeGrid};
//!
//! let grid = TimeGrid::uniform(2, 3).unwrap();
//! let vols = InterestRateVolatilities::from_cells(&grid, 2, |_, _| vec![0.15, 0.05]).unwrap();
//! let weights = SwaptionWeights::equal(&grid);
//! let targets = CalibrationTargets::new(&grid).with_caplet(1, 0.18).unwrap();
//!
//! assert_eq!(targets.caplet_count(), 1);
//! let model = vols.implied_volatility(&weights, 1, 1);
//! assert!((model - (0.15_f64.powi(2) + 0.05_f64.powi(2)).sqrt()).abs() < 1e-12);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Serialisation of report and diagnostics types
//! - `parallel`: Build swaption weight tables across expiries with rayon

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod calibration;
mod error;
pub mod volatility;

pub use error::ModelError;
