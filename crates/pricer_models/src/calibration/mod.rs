//! Calibration inputs and fit diagnostics.
//!
//! This module provides the read-only collaborators of a volatility
//! calibration:
//! - [`CalibrationTargets`]: caplet and swaption implied volatilities
//! - [`SwaptionWeights`]: frozen swap-rate weights per instrument
//! - [`ImpliedVolTargets`] / [`InstrumentWeights`]: the lookup seams the
//!   calibration engine is written against
//! - [`CalibrationDiagnostics`] and [`fit_diagnostics`]: fit quality of a
//!   calibrated grid
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Calibration Flow                         │
//! │                                                             │
//! │  Quotes ──→ CalibrationTargets ─┐                           │
//! │                                 ├─→ Cascade ─→ Vol grid     │
//! │  Discounts → SwaptionWeights ───┘                  │        │
//! │                                                    ▼        │
//! │                                           fit_diagnostics   │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod lookup;
mod result;
mod targets;
mod weights;

pub use lookup::{ImpliedVolTargets, InstrumentKind, InstrumentWeights};
pub use result::{fit_diagnostics, CalibrationDiagnostics, InstrumentFit};
pub use targets::{normalise_quote, CalibrationTargets, Quote, PERCENT_QUOTE_THRESHOLD};
pub use weights::SwaptionWeights;
