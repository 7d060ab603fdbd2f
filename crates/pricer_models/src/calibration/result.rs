//! Fit diagnostics of a calibrated volatility grid.
//!
//! Compares the grid's implied volatility with every quoted target and
//! summarises the absolute errors, split by instrument class.

use std::time::{Duration, Instant};

use super::lookup::{ImpliedVolTargets, InstrumentKind, InstrumentWeights};
use crate::error::ModelError;
use crate::volatility::{InterestRateVolatilities, TimeGrid};

/// Model-versus-market fit of one instrument.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InstrumentFit {
    /// 1-based expiry
    pub expiry: usize,
    /// 1-based tenor
    pub tenor: usize,
    /// Instrument class
    pub kind: InstrumentKind,
    /// Market implied volatility
    pub target: f64,
    /// Grid implied volatility
    pub model: f64,
}

impl InstrumentFit {
    /// Signed error `model - target`.
    #[inline]
    pub fn error(&self) -> f64 {
        self.model - self.target
    }
}

/// Calibration diagnostics.
///
/// Contains detailed information about the fit for analysis and
/// reporting.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalibrationDiagnostics {
    /// Root mean squared error over all instruments
    pub rmse: f64,
    /// Maximum absolute error
    pub max_error: f64,
    /// Mean absolute caplet error (0 without caplets)
    pub average_caplet_error: f64,
    /// Mean absolute swaption error (0 without swaptions)
    pub average_swaption_error: f64,
    /// Time spent computing the diagnostics
    pub duration: Duration,
    /// Individual fits per instrument
    pub fits: Vec<InstrumentFit>,
}

impl Default for CalibrationDiagnostics {
    fn default() -> Self {
        Self {
            rmse: 0.0,
            max_error: 0.0,
            average_caplet_error: 0.0,
            average_swaption_error: 0.0,
            duration: Duration::ZERO,
            fits: Vec::new(),
        }
    }
}

impl CalibrationDiagnostics {
    /// Diagnostics computed from individual instrument fits.
    pub fn from_fits(fits: Vec<InstrumentFit>) -> Self {
        Self::default().with_instrument_fits(fits)
    }

    /// Set individual instrument fits and recompute the summary.
    pub fn with_instrument_fits(mut self, fits: Vec<InstrumentFit>) -> Self {
        if !fits.is_empty() {
            let n = fits.len() as f64;
            self.rmse = (fits.iter().map(|f| f.error().powi(2)).sum::<f64>() / n).sqrt();
            self.max_error = fits.iter().map(|f| f.error().abs()).fold(0.0_f64, f64::max);
        }
        self.average_caplet_error = mean_abs_error(&fits, InstrumentKind::Caplet);
        self.average_swaption_error = mean_abs_error(&fits, InstrumentKind::Swaption);
        self.fits = fits;
        self
    }

    /// Set the duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Number of caplet fits.
    pub fn caplet_count(&self) -> usize {
        self.count(InstrumentKind::Caplet)
    }

    /// Number of swaption fits.
    pub fn swaption_count(&self) -> usize {
        self.count(InstrumentKind::Swaption)
    }

    fn count(&self, kind: InstrumentKind) -> usize {
        self.fits.iter().filter(|f| f.kind == kind).count()
    }

    /// Check if calibration quality is acceptable.
    ///
    /// # Arguments
    ///
    /// * `tolerance` - Maximum acceptable RMSE
    pub fn is_quality_acceptable(&self, tolerance: f64) -> bool {
        self.rmse <= tolerance
    }
}

fn mean_abs_error(fits: &[InstrumentFit], kind: InstrumentKind) -> f64 {
    let (sum, n) = fits
        .iter()
        .filter(|f| f.kind == kind)
        .fold((0.0, 0usize), |(sum, n), f| (sum + f.error().abs(), n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

/// Fit of `vols` against every quoted instrument of `grid`.
///
/// # Errors
///
/// Returns [`ModelError::ShapeMismatch`] if `vols` was not built for
/// `grid`.
///
/// # Examples
///
/// ```
/// use pricer_models::calibration::{fit_diagnostics, CalibrationTargets, SwaptionWeights};
/// use pricer_models::volatility::{InterestRateVolatilities, TimeGrid};
///
/// let grid = TimeGrid::uniform(1, 1).unwrap();
/// let vols = InterestRateVolatilities::from_cells(&grid, 1, |_, _| vec![0.2]).unwrap();
/// let targets = CalibrationTargets::new(&grid).with_caplet(1, 0.25).unwrap();
///
/// let diag = fit_diagnostics(&grid, &vols, &targets, &SwaptionWeights::equal(&grid)).unwrap();
/// assert!((diag.max_error - 0.05).abs() < 1e-12);
/// ```
pub fn fit_diagnostics<T, W>(
    grid: &TimeGrid,
    vols: &InterestRateVolatilities,
    targets: &T,
    weights: &W,
) -> Result<CalibrationDiagnostics, ModelError>
where
    T: ImpliedVolTargets + ?Sized,
    W: InstrumentWeights + ?Sized,
{
    if !vols.matches_grid(grid) {
        return Err(ModelError::shape_mismatch(format!(
            "volatility grid has {} rows and max tenor {}, time grid is {} x {}",
            vols.rows(),
            vols.max_tenor(),
            grid.max_expiry(),
            grid.max_tenor()
        )));
    }

    let start = Instant::now();
    let fits: Vec<InstrumentFit> = grid
        .instruments()
        .filter_map(|(expiry, tenor)| {
            let target = targets.implied_vol(expiry, tenor);
            (target > 0.0).then(|| InstrumentFit {
                expiry,
                tenor,
                kind: InstrumentKind::from_tenor(tenor),
                target,
                model: vols.implied_volatility(weights, expiry, tenor),
            })
        })
        .collect();

    Ok(CalibrationDiagnostics::from_fits(fits).with_duration(start.elapsed()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::{CalibrationTargets, SwaptionWeights};
    use approx::assert_relative_eq;

    fn fit(tenor: usize, target: f64, model: f64) -> InstrumentFit {
        InstrumentFit {
            expiry: 1,
            tenor,
            kind: InstrumentKind::from_tenor(tenor),
            target,
            model,
        }
    }

    // ========================================
    // Summary Tests
    // ========================================

    #[test]
    fn test_diagnostics_default() {
        let diag = CalibrationDiagnostics::default();
        assert_eq!(diag.rmse, 0.0);
        assert!(diag.fits.is_empty());
        assert!(diag.is_quality_acceptable(0.0));
    }

    #[test]
    fn test_diagnostics_from_fits() {
        let diag = CalibrationDiagnostics::from_fits(vec![
            fit(1, 0.20, 0.21),
            fit(1, 0.20, 0.17),
            fit(3, 0.15, 0.15),
        ]);
        assert_relative_eq!(diag.max_error, 0.03, epsilon = 1e-12);
        assert_relative_eq!(diag.average_caplet_error, 0.02, epsilon = 1e-12);
        assert_eq!(diag.average_swaption_error, 0.0);
        assert_relative_eq!(
            diag.rmse,
            ((0.0001 + 0.0009) / 3.0_f64).sqrt(),
            epsilon = 1e-12
        );
        assert_eq!(diag.caplet_count(), 2);
        assert_eq!(diag.swaption_count(), 1);
        assert!(!diag.is_quality_acceptable(0.01));
    }

    // ========================================
    // Grid Fit Tests
    // ========================================

    #[test]
    fn test_fit_diagnostics_skips_unquoted() {
        let grid = TimeGrid::uniform(2, 3).unwrap();
        let vols = InterestRateVolatilities::from_cells(&grid, 1, |_, _| vec![0.2]).unwrap();
        let targets = CalibrationTargets::new(&grid)
            .with_caplet(2, 0.2)
            .unwrap()
            .with_swaption(1, 3, 0.25)
            .unwrap();
        let weights = SwaptionWeights::equal(&grid);

        let diag = fit_diagnostics(&grid, &vols, &targets, &weights).unwrap();
        assert_eq!(diag.fits.len(), 2);
        assert_eq!((diag.fits[0].expiry, diag.fits[0].tenor), (1, 3));
        assert_relative_eq!(diag.fits[1].model, 0.2, epsilon = 1e-14);
        assert_relative_eq!(diag.average_swaption_error, 0.05, epsilon = 1e-12);
        assert_relative_eq!(diag.average_caplet_error, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_fit_diagnostics_shape_mismatch() {
        let grid = TimeGrid::uniform(2, 3).unwrap();
        let other = TimeGrid::uniform(2, 4).unwrap();
        let vols = InterestRateVolatilities::zeros(&other, 1).unwrap();
        let err = fit_diagnostics(
            &grid,
            &vols,
            &CalibrationTargets::new(&grid),
            &SwaptionWeights::equal(&grid),
        )
        .unwrap_err();
        assert!(err.is_shape_mismatch());
    }
}
