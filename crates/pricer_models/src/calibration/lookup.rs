//! Lookup traits consumed by calibration engines.
//!
//! Engines read targets and weights only through these traits, so tests
//! can inject synthetic tables without building a full market.

use std::fmt;

/// Instrument class of a 1-based `(expiry, tenor)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum InstrumentKind {
    /// Single-period instrument (tenor 1).
    Caplet,
    /// Multi-period instrument (tenor > 1).
    Swaption,
}

impl InstrumentKind {
    /// Classifies an instrument by its tenor.
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_models::calibration::InstrumentKind;
    ///
    /// assert_eq!(InstrumentKind::from_tenor(1), InstrumentKind::Caplet);
    /// assert_eq!(InstrumentKind::from_tenor(5), InstrumentKind::Swaption);
    /// ```
    #[inline]
    pub fn from_tenor(tenor: usize) -> Self {
        if tenor <= 1 {
            InstrumentKind::Caplet
        } else {
            InstrumentKind::Swaption
        }
    }

    /// Lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            InstrumentKind::Caplet => "caplet",
            InstrumentKind::Swaption => "swaption",
        }
    }
}

impl fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Market implied volatilities keyed by 1-based `(expiry, tenor)`.
///
/// A value of `0.0` means no quote.
pub trait ImpliedVolTargets {
    /// Caplet implied volatility at `expiry`.
    fn caplet_implied_vol(&self, expiry: usize) -> f64;

    /// Swaption implied volatility at `(expiry, tenor)`.
    fn swaption_implied_vol(&self, expiry: usize, tenor: usize) -> f64;

    /// Implied volatility of either instrument class.
    fn implied_vol(&self, expiry: usize, tenor: usize) -> f64 {
        match InstrumentKind::from_tenor(tenor) {
            InstrumentKind::Caplet => self.caplet_implied_vol(expiry),
            InstrumentKind::Swaption => self.swaption_implied_vol(expiry, tenor),
        }
    }

    /// `(MaxExpiry, MaxTenor)` the table was built for, if known.
    fn dimensions(&self) -> Option<(usize, usize)> {
        None
    }
}

/// Frozen weights projecting per-forward loadings onto one instrument.
pub trait InstrumentWeights {
    /// Weight of sub-period `sub_index` (`1..=tenor`) of `(expiry, tenor)`.
    fn weight(&self, expiry: usize, tenor: usize, sub_index: usize) -> f64;

    /// `(MaxExpiry, MaxTenor)` the table was built for, if known.
    fn dimensions(&self) -> Option<(usize, usize)> {
        None
    }
}
