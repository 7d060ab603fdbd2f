//! # pricer_optimiser
//!
//! Cascade calibration of multi-factor forward-rate volatility grids.
//!
//! This crate sits on top of Models (L2) in the architecture, solving the
//! inverse problem of rescaling an approximate volatility grid so that it
//! reprices caplet and swaption quotes one instrument at a time.
//!
//! ## Architecture Position
//!
//! Layer 2.5 in the **P**ricer layer of the A-I-P-S architecture.
//! Depends on `pricer_core` (L1) and `pricer_models` (L2).
//!
//! ## Modules
//!
//! - `cascade`: caplet-then-swaption cascade with bounded per-step scaling
//!
//! ## Example
//!
//! ```rust
//! use pricer_models::calibration::{CalibrationTargets, SwaptionWeights};
//! use pricer_models::volatility::{InterestRateVolatilities, TimeGrid};
//! use pricer_optimiser::cascade::{cascade, CascadeParameters};
//!
//! let grid = TimeGrid::uniform(1, 1).unwrap();
//! let mut vols = InterestRateVolatilities::from_cells(&grid, 1, |_, _| vec![0.20]).unwrap();
//! let targets = CalibrationTargets::new(&grid).with_caplet(1, 0.25).unwrap();
//! let weights = SwaptionWeights::equal(&grid);
//! let params = CascadeParameters::builder().caplet_max_scale(10.0).build();
//!
//! let report = cascade(&grid, &mut vols, &targets, &weights, params).unwrap();
//! assert_eq!(report.steps.len(), 1);
//! assert!((vols.cell(0, 0)[0] - 0.25).abs() < 1e-12);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod cascade;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cascade::*;
}
