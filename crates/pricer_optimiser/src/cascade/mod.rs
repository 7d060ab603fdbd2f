//! Cascade calibration of forward-rate volatility grids.
//!
//! The cascade walks the triangular instrument grid expiry-major and
//! tenor-minor. For every quoted instrument it solves a quadratic for the
//! single scale factor that, applied to the not-yet-locked cells feeding the
//! instrument, reproduces the market variance, then locks those cells. Cells
//! locked by an earlier instrument are never rescaled, so caplets take
//! precedence over swaptions of the same expiry and short expiries over long
//! ones. Each scale is bounded to `[1/bound, bound]`.
//!
//! ## Architecture
//!
//! - `CascadeParameters`: scale bounds and instrument-class switches
//! - `CascadeAlgorithm`: the engine, borrowing the grid mutably for one run
//! - `CascadeReport`: per-step scales and solve outcomes
//! - `CascadeError`: configuration and shape errors detected up front

mod config;
mod engine;
mod error;
mod report;

pub use config::{
    CascadeParameters, CascadeParametersBuilder, DEFAULT_CAPLET_MAX_SCALE,
    DEFAULT_SWAPTION_MAX_SCALE,
};
pub use engine::{cascade, CascadeAlgorithm};
pub use error::CascadeError;
pub use report::{CascadeReport, CascadeStep, ScaleOutcome, ScaleSolution};
