//! Caplet and swaption calibration targets.
//!
//! Quotes are stored in a triangular table shaped like the time grid: row
//! `expiry - 1`, column `tenor - 1`, with the caplet in column 0. A zero
//! entry means no quote.

use tracing::debug;

use super::lookup::{ImpliedVolTargets, InstrumentKind};
use crate::error::ModelError;
use crate::volatility::{TimeGrid, TriangularLayout};

/// Quotes above this level are read as percentages.
pub const PERCENT_QUOTE_THRESHOLD: f64 = 2.0;

/// One market quote.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quote {
    /// 1-based expiry
    pub expiry: usize,
    /// 1-based tenor (1 for caplets)
    pub tenor: usize,
    /// Implied volatility as a decimal
    pub vol: f64,
}

impl Quote {
    /// Instrument class of this quote.
    #[inline]
    pub fn kind(&self) -> InstrumentKind {
        InstrumentKind::from_tenor(self.tenor)
    }
}

/// Market implied volatilities for caplets (tenor 1) and swaptions.
///
/// # Examples
///
/// ```
/// use pricer_models::calibration::CalibrationTargets;
/// use pricer_models::volatility::TimeGrid;
///
/// let grid = TimeGrid::uniform(3, 5).unwrap();
/// let targets = CalibrationTargets::new(&grid)
///     .with_caplet(1, 0.22)
///     .unwrap()
///     .with_swaption(2, 3, 18.5) // percent quote
///     .unwrap();
///
/// assert_eq!(targets.caplet_implied_vol(1), 0.22);
/// assert!((targets.swaption_implied_vol(2, 3) - 0.185).abs() < 1e-15);
/// assert_eq!(targets.swaption_implied_vol(3, 2), 0.0);
/// assert_eq!(targets.swaption_implied_vol(9, 9), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationTargets {
    layout: TriangularLayout,
    max_expiry: usize,
    max_tenor: usize,
    vols: Vec<f64>,
}

impl CalibrationTargets {
    /// Empty target table for `grid`.
    pub fn new(grid: &TimeGrid) -> Self {
        let layout = grid.layout();
        let vols = vec![0.0; layout.len()];
        Self {
            layout,
            max_expiry: grid.max_expiry(),
            max_tenor: grid.max_tenor(),
            vols,
        }
    }

    /// Target table from caplet `(expiry, vol)` and swaption
    /// `(expiry, tenor, vol)` rows.
    ///
    /// # Errors
    ///
    /// Same conditions as [`CalibrationTargets::insert`].
    pub fn from_quotes(
        grid: &TimeGrid,
        caplets: &[(usize, f64)],
        swaptions: &[(usize, usize, f64)],
    ) -> Result<Self, ModelError> {
        let mut targets = Self::new(grid);
        for &(expiry, vol) in caplets {
            targets.insert(expiry, 1, vol)?;
        }
        for &(expiry, tenor, vol) in swaptions {
            targets.insert(expiry, tenor, vol)?;
        }
        Ok(targets)
    }

    /// Adds a caplet quote.
    ///
    /// # Errors
    ///
    /// Same conditions as [`CalibrationTargets::insert`].
    pub fn with_caplet(mut self, expiry: usize, vol: f64) -> Result<Self, ModelError> {
        self.insert(expiry, 1, vol)?;
        Ok(self)
    }

    /// Adds a swaption quote. A tenor-1 swaption is the caplet quote.
    ///
    /// # Errors
    ///
    /// Same conditions as [`CalibrationTargets::insert`].
    pub fn with_swaption(mut self, expiry: usize, tenor: usize, vol: f64) -> Result<Self, ModelError> {
        self.insert(expiry, tenor, vol)?;
        Ok(self)
    }

    /// Stores a quote, replacing any previous one.
    ///
    /// Quotes above [`PERCENT_QUOTE_THRESHOLD`] are divided by 100. A zero
    /// quote clears the entry.
    ///
    /// # Errors
    ///
    /// - [`ModelError::InvalidQuote`] if `vol` is negative or not finite
    /// - [`ModelError::QuoteOutOfGrid`] if `(expiry, tenor)` lies outside
    ///   the triangular grid
    pub fn insert(&mut self, expiry: usize, tenor: usize, vol: f64) -> Result<(), ModelError> {
        if !vol.is_finite() || vol < 0.0 {
            return Err(ModelError::invalid_quote(expiry, tenor, vol));
        }
        let index = self.slot(expiry, tenor).ok_or_else(|| {
            ModelError::quote_out_of_grid(expiry, tenor, self.max_expiry, self.max_tenor)
        })?;
        let normalised = normalise_quote(vol);
        if normalised != vol {
            debug!(expiry, tenor, quote = vol, normalised, "percent quote normalised");
        }
        self.vols[index] = normalised;
        Ok(())
    }

    #[inline]
    fn slot(&self, expiry: usize, tenor: usize) -> Option<usize> {
        if expiry == 0 || tenor == 0 {
            return None;
        }
        self.layout.index(expiry - 1, tenor - 1)
    }

    #[inline]
    fn get(&self, expiry: usize, tenor: usize) -> f64 {
        self.slot(expiry, tenor).map_or(0.0, |i| self.vols[i])
    }

    /// Caplet implied volatility at `expiry`, `0.0` when unquoted.
    #[inline]
    pub fn caplet_implied_vol(&self, expiry: usize) -> f64 {
        self.get(expiry, 1)
    }

    /// Swaption implied volatility at `(expiry, tenor)`, `0.0` when unquoted.
    #[inline]
    pub fn swaption_implied_vol(&self, expiry: usize, tenor: usize) -> f64 {
        self.get(expiry, tenor)
    }

    /// Grid maximum expiry.
    pub fn max_expiry(&self) -> usize {
        self.max_expiry
    }

    /// Grid maximum tenor.
    pub fn max_tenor(&self) -> usize {
        self.max_tenor
    }

    /// Every non-zero quote, expiry-major and tenor-minor.
    pub fn quotes(&self) -> impl Iterator<Item = Quote> + '_ {
        (0..self.layout.rows()).flat_map(move |row| {
            (0..self.layout.row_len(row)).filter_map(move |col| {
                let vol = self.get(row + 1, col + 1);
                (vol > 0.0).then_some(Quote {
                    expiry: row + 1,
                    tenor: col + 1,
                    vol,
                })
            })
        })
    }

    /// Number of caplet quotes.
    pub fn caplet_count(&self) -> usize {
        self.quotes()
            .filter(|q| q.kind() == InstrumentKind::Caplet)
            .count()
    }

    /// Number of swaption quotes.
    pub fn swaption_count(&self) -> usize {
        self.quotes()
            .filter(|q| q.kind() == InstrumentKind::Swaption)
            .count()
    }

    /// Returns `true` if no quote is stored.
    pub fn is_empty(&self) -> bool {
        self.vols.iter().all(|&v| v == 0.0)
    }
}

impl ImpliedVolTargets for CalibrationTargets {
    fn caplet_implied_vol(&self, expiry: usize) -> f64 {
        CalibrationTargets::caplet_implied_vol(self, expiry)
    }

    fn swaption_implied_vol(&self, expiry: usize, tenor: usize) -> f64 {
        CalibrationTargets::swaption_implied_vol(self, expiry, tenor)
    }

    fn dimensions(&self) -> Option<(usize, usize)> {
        Some((self.max_expiry, self.max_tenor))
    }
}

/// Reads quotes above [`PERCENT_QUOTE_THRESHOLD`] as percentages.
#[inline]
pub fn normalise_quote(vol: f64) -> f64 {
    if vol > PERCENT_QUOTE_THRESHOLD {
        vol / 100.0
    } else {
        vol
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn grid() -> TimeGrid {
        TimeGrid::uniform(3, 4).unwrap()
    }

    // ========================================
    // Construction Tests
    // ========================================

    #[test]
    fn test_empty_targets() {
        let targets = CalibrationTargets::new(&grid());
        assert!(targets.is_empty());
        assert_eq!(targets.caplet_count(), 0);
        assert_eq!(targets.swaption_count(), 0);
        assert_eq!(targets.caplet_implied_vol(1), 0.0);
    }

    #[test]
    fn test_from_quotes() {
        let targets =
            CalibrationTargets::from_quotes(&grid(), &[(1, 0.2), (2, 0.21)], &[(1, 4, 0.18)])
                .unwrap();
        assert_eq!(targets.caplet_count(), 2);
        assert_eq!(targets.swaption_count(), 1);
        assert_eq!(targets.swaption_implied_vol(1, 4), 0.18);
        assert_eq!(targets.max_expiry(), 3);
        assert_eq!(targets.max_tenor(), 4);
    }

    #[test]
    fn test_tenor_one_swaption_is_caplet() {
        let targets = CalibrationTargets::new(&grid())
            .with_swaption(2, 1, 0.3)
            .unwrap();
        assert_eq!(targets.caplet_implied_vol(2), 0.3);
        assert_eq!(targets.caplet_count(), 1);
    }

    #[test]
    fn test_zero_quote_clears_entry() {
        let mut targets = CalibrationTargets::new(&grid()).with_caplet(1, 0.2).unwrap();
        targets.insert(1, 1, 0.0).unwrap();
        assert!(targets.is_empty());
    }

    // ========================================
    // Normalisation Tests
    // ========================================

    #[test]
    fn test_percent_quotes_normalised() {
        let targets = CalibrationTargets::new(&grid())
            .with_caplet(1, 25.0)
            .unwrap()
            .with_caplet(2, 2.0)
            .unwrap();
        assert_relative_eq!(targets.caplet_implied_vol(1), 0.25, epsilon = 1e-15);
        // the threshold itself is kept as a decimal
        assert_eq!(targets.caplet_implied_vol(2), 2.0);
    }

    // ========================================
    // Validation Tests
    // ========================================

    #[test]
    fn test_invalid_quotes_rejected() {
        let g = grid();
        assert!(CalibrationTargets::new(&g)
            .with_caplet(1, -0.1)
            .unwrap_err()
            .is_invalid_quote());
        assert!(CalibrationTargets::new(&g)
            .with_caplet(1, f64::NAN)
            .unwrap_err()
            .is_invalid_quote());
        assert!(CalibrationTargets::new(&g)
            .with_swaption(1, 2, f64::INFINITY)
            .unwrap_err()
            .is_invalid_quote());
    }

    #[test]
    fn test_out_of_grid_quotes_rejected() {
        let g = grid();
        for (expiry, tenor) in [(0, 1), (4, 1), (3, 3), (1, 5), (2, 0)] {
            let err = CalibrationTargets::new(&g)
                .with_swaption(expiry, tenor, 0.2)
                .unwrap_err();
            assert!(err.is_quote_out_of_grid(), "({}, {})", expiry, tenor);
        }
    }

    #[test]
    fn test_out_of_grid_lookup_is_zero() {
        let targets = CalibrationTargets::new(&grid()).with_caplet(3, 0.2).unwrap();
        assert_eq!(targets.caplet_implied_vol(0), 0.0);
        assert_eq!(targets.caplet_implied_vol(4), 0.0);
        assert_eq!(targets.swaption_implied_vol(3, 3), 0.0);
    }

    // ========================================
    // Iteration Tests
    // ========================================

    #[test]
    fn test_quotes_in_calibration_order() {
        let targets = CalibrationTargets::from_quotes(
            &grid(),
            &[(2, 0.21), (1, 0.2)],
            &[(2, 3, 0.19), (1, 2, 0.18)],
        )
        .unwrap();
        let order: Vec<_> = targets.quotes().map(|q| (q.expiry, q.tenor)).collect();
        assert_eq!(order, vec![(1, 1), (1, 2), (2, 1), (2, 3)]);
    }

    #[test]
    fn test_trait_lookup_matches_inherent() {
        let targets = CalibrationTargets::new(&grid())
            .with_swaption(1, 3, 0.17)
            .unwrap();
        let lookup: &dyn ImpliedVolTargets = &targets;
        assert_eq!(lookup.implied_vol(1, 3), 0.17);
        assert_eq!(lookup.dimensions(), Some((3, 4)));
    }
}
