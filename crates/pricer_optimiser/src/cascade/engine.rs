//! Cascade calibration engine.
//!
//! This module provides `CascadeAlgorithm`, which rescales the cells of an
//! `InterestRateVolatilities` grid instrument by instrument until each
//! quoted caplet and swaption is repriced, within the scale bounds.

use std::time::Instant;

use pricer_core::math::vector::{axpy, dot, fill_zero, zeros};
use pricer_models::calibration::{
    CalibrationTargets, ImpliedVolTargets, InstrumentKind, InstrumentWeights, SwaptionWeights,
};
use pricer_models::volatility::{InterestRateVolatilities, TimeGrid, TriangularLayout};
use tracing::{debug, info, warn};

use super::config::CascadeParameters;
use super::error::CascadeError;
use super::report::{CascadeReport, CascadeStep, ScaleOutcome, ScaleSolution};

/// Cascade calibration engine.
///
/// Borrows the volatility grid mutably for its own lifetime. The lock state
/// (which cells a previous instrument already fixed) and the recorded scale
/// factors live in flat arenas shaped like the grid and are dropped with
/// the engine.
///
/// # Algorithm
///
/// For `expiry` in `1..=MaxExpiry` and `tenor` in `1..=MaxTenor - expiry + 1`:
/// 1. Look up the target (caplet for tenor 1, swaption otherwise); skip the
///    instrument if it is not positive
/// 2. [`find_scale`](Self::find_scale) solves for the scale of the free
///    cells that matches the target variance
/// 3. [`apply_scale`](Self::apply_scale) scales and locks the free cells
///
/// # Examples
///
/// ```
/// use pricer_models::calibration::{CalibrationTargets, SwaptionWeights};
/// use pricer_models::volatility::{InterestRateVolatilities, TimeGrid};
/// use pricer_optimiser::cascade::{CascadeAlgorithm, CascadeParameters};
///
/// let grid = TimeGrid::uniform(2, 2).unwrap();
/// let mut vols = InterestRateVolatilities::from_cells(&grid, 2, |_, _| vec![0.15, 0.05]).unwrap();
/// let targets = CalibrationTargets::new(&grid).with_caplet(1, 0.16).unwrap();
/// let weights = SwaptionWeights::equal(&grid);
///
/// let mut engine =
///     CascadeAlgorithm::new(&grid, &mut vols, &targets, &weights, CascadeParameters::default())
///         .unwrap();
/// let report = engine.apply_cascade();
///
/// assert!(engine.is_scaled(0, 0));
/// assert!(!engine.is_scaled(0, 1));
/// assert_eq!(report.steps.len(), 1);
/// ```
pub struct CascadeAlgorithm<'a, T = CalibrationTargets, W = SwaptionWeights>
where
    T: ImpliedVolTargets + ?Sized,
    W: InstrumentWeights + ?Sized,
{
    grid: &'a TimeGrid,
    vols: &'a mut InterestRateVolatilities,
    targets: &'a T,
    weights: &'a W,
    params: CascadeParameters,
    layout: TriangularLayout,
    is_scaled: Vec<bool>,
    scales: Vec<f64>,
}

impl<'a, T, W> CascadeAlgorithm<'a, T, W>
where
    T: ImpliedVolTargets + ?Sized,
    W: InstrumentWeights + ?Sized,
{
    /// Create a new engine.
    ///
    /// # Errors
    ///
    /// - [`CascadeError::InvalidParameters`] if a scale bound is invalid
    /// - [`CascadeError::GridMismatch`] if the volatilities, targets or
    ///   weights were built for a different time grid
    pub fn new(
        grid: &'a TimeGrid,
        vols: &'a mut InterestRateVolatilities,
        targets: &'a T,
        weights: &'a W,
        params: CascadeParameters,
    ) -> Result<Self, CascadeError> {
        params.validate()?;

        let expected = (grid.max_expiry(), grid.max_tenor());
        if !vols.matches_grid(grid) {
            return Err(CascadeError::grid_mismatch(
                "volatilities",
                expected,
                (vols.rows(), vols.max_tenor()),
            ));
        }
        if let Some(actual) = targets.dimensions().filter(|&d| d != expected) {
            return Err(CascadeError::grid_mismatch("targets", expected, actual));
        }
        if let Some(actual) = weights.dimensions().filter(|&d| d != expected) {
            return Err(CascadeError::grid_mismatch("weights", expected, actual));
        }

        let layout = grid.layout();
        let cells = layout.len();
        Ok(Self {
            grid,
            vols,
            targets,
            weights,
            params,
            layout,
            is_scaled: vec![false; cells],
            scales: vec![1.0; cells],
        })
    }

    /// Get the configuration.
    pub fn params(&self) -> &CascadeParameters {
        &self.params
    }

    /// Read access to the grid being calibrated.
    pub fn volatilities(&self) -> &InterestRateVolatilities {
        &*self.vols
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        match self.layout.index(row, col) {
            Some(index) => index,
            None => panic!("cell ({}, {}) outside the cascade grid", row, col),
        }
    }

    /// Returns `true` if cell `(row, col)` has been locked by an instrument.
    ///
    /// # Panics
    ///
    /// Panics if the cell lies outside the triangular grid.
    #[inline]
    pub fn is_scaled(&self, row: usize, col: usize) -> bool {
        self.is_scaled[self.index(row, col)]
    }

    /// Scale applied to cell `(row, col)`, `None` while it is free.
    ///
    /// # Panics
    ///
    /// Panics if the cell lies outside the triangular grid.
    pub fn scale_factor(&self, row: usize, col: usize) -> Option<f64> {
        let index = self.index(row, col);
        self.is_scaled[index].then(|| self.scales[index])
    }

    /// Number of locked cells.
    pub fn locked_count(&self) -> usize {
        self.is_scaled.iter().filter(|&&locked| locked).count()
    }

    fn target(&self, expiry: usize, tenor: usize, kind: InstrumentKind) -> f64 {
        if !self.params.is_enabled(kind) {
            return 0.0;
        }
        match kind {
            InstrumentKind::Caplet => self.targets.caplet_implied_vol(expiry),
            InstrumentKind::Swaption => self.targets.swaption_implied_vol(expiry, tenor),
        }
    }

    fn assert_instrument(&self, expiry: usize, tenor: usize) {
        assert!(
            self.grid.contains(expiry, tenor),
            "instrument ({}, {}) outside the time grid",
            expiry,
            tenor
        );
    }

    /// Run the cascade over every instrument of the grid.
    pub fn apply_cascade(&mut self) -> CascadeReport {
        let start = Instant::now();
        let grid = self.grid;
        let mut report = CascadeReport::default();

        for (expiry, tenor) in grid.instruments() {
            let kind = InstrumentKind::from_tenor(tenor);
            let target = self.target(expiry, tenor, kind);
            if !(target > 0.0) {
                report.skipped += 1;
                continue;
            }

            let bound = self.params.bound_for(kind);
            let solution = self.find_scale(expiry, tenor, bound, target);
            let cells_scaled = match solution.outcome {
                ScaleOutcome::Unusable => {
                    warn!(expiry, tenor, %kind, target, "non-finite variance, cells left unscaled");
                    report.skipped += 1;
                    0
                }
                _ => self.apply_scale(expiry, tenor, solution.scale),
            };
            if solution.clamped {
                report.clamped += 1;
                warn!(
                    expiry,
                    tenor,
                    %kind,
                    raw = ?solution.raw,
                    scale = solution.scale,
                    "scale clamped to bound"
                );
            }
            debug!(
                expiry,
                tenor,
                %kind,
                target,
                scale = solution.scale,
                outcome = ?solution.outcome,
                cells_scaled,
                "cascade step"
            );

            report.steps.push(CascadeStep {
                expiry,
                tenor,
                kind,
                target,
                scale: solution.scale,
                raw_scale: solution.raw,
                outcome: solution.outcome,
                clamped: solution.clamped,
                cells_scaled,
            });
        }

        report.duration = start.elapsed();
        info!(
            steps = report.steps.len(),
            skipped = report.skipped,
            clamped = report.clamped,
            degenerate = report.degenerate_steps().count(),
            cells_scaled = report.cells_scaled(),
            duration_us = report.duration.as_micros() as u64,
            "cascade complete"
        );
        report
    }

    /// Solve for the scale of the free cells of `(expiry, tenor)`.
    ///
    /// For each period `i <= expiry - 1` the weighted loadings of the
    /// instrument's cells are split into a locked and a free sum. The scale
    /// `s` solves
    ///
    /// ```text
    /// sum_i |locked_i + s * free_i|^2 = target^2 * expiry
    /// ```
    ///
    /// taking the larger root, or the vertex when there is no real root,
    /// and is clamped to `[1/bound, bound]`. Does not mutate anything.
    ///
    /// # Panics
    ///
    /// Panics if `(expiry, tenor)` lies outside the time grid.
    pub fn find_scale(&self, expiry: usize, tenor: usize, bound: f64, target: f64) -> ScaleSolution {
        self.assert_instrument(expiry, tenor);
        let exp = expiry - 1;
        let mut locked = zeros(self.vols.factors());
        let mut free = zeros(self.vols.factors());
        let (mut c0, mut c1, mut c2) = (0.0, 0.0, 0.0);

        for row in 0..=exp {
            fill_zero(&mut locked);
            fill_zero(&mut free);
            for j in 0..tenor {
                let col = j + exp - row;
                let w = self.weights.weight(expiry, tenor, j + 1);
                let sum = if self.is_scaled(row, col) {
                    &mut locked
                } else {
                    &mut free
                };
                axpy(w, self.vols.cell(row, col), sum);
            }
            c0 += dot(&locked, &locked);
            c1 += dot(&locked, &free);
            c2 += dot(&free, &free);
        }

        c1 *= 2.0;
        c0 -= target * target * expiry as f64;
        let solution = solve_quadratic(c0, c1, c2, bound);
        if solution.outcome == ScaleOutcome::Degenerate {
            warn!(
                expiry,
                tenor,
                c0,
                c1,
                c2,
                scale = solution.scale,
                "no free variance, scale set to bound"
            );
        }
        solution
    }

    /// Scale and lock every free cell of `(expiry, tenor)`.
    ///
    /// Locked cells keep the scale of the instrument that locked them.
    /// Returns the number of cells scaled.
    ///
    /// # Panics
    ///
    /// Panics if `(expiry, tenor)` lies outside the time grid.
    pub fn apply_scale(&mut self, expiry: usize, tenor: usize, scale: f64) -> usize {
        self.assert_instrument(expiry, tenor);
        let exp = expiry - 1;
        let mut scaled = 0;
        for row in 0..=exp {
            for j in 0..tenor {
                let col = j + exp - row;
                let index = self.index(row, col);
                if !self.is_scaled[index] {
                    self.is_scaled[index] = true;
                    self.scales[index] = scale;
                    self.vols.scale(row, col, scale);
                    scaled += 1;
                }
            }
        }
        scaled
    }
}

/// Larger root of `c2 s^2 + c1 s + c0 = 0`, vertex fallback, clamped.
fn solve_quadratic(c0: f64, c1: f64, c2: f64, bound: f64) -> ScaleSolution {
    if !(c0.is_finite() && c1.is_finite() && c2.is_finite()) {
        return ScaleSolution {
            scale: 1.0,
            raw: None,
            outcome: ScaleOutcome::Unusable,
            clamped: false,
        };
    }

    let raw = if c2 > 0.0 {
        let disc = c1 * c1 - 4.0 * c2 * c0;
        if disc >= 0.0 {
            Some(((-c1 + disc.sqrt()) / (2.0 * c2), ScaleOutcome::Root))
        } else {
            Some((-c1 / (2.0 * c2), ScaleOutcome::Vertex))
        }
    } else {
        None
    };

    match raw {
        Some((s, outcome)) if s.is_finite() => {
            let scale = if s > bound {
                bound
            } else if s < 1.0 / bound {
                1.0 / bound
            } else {
                s
            };
            ScaleSolution {
                scale,
                raw: Some(s),
                outcome,
                clamped: scale != s,
            }
        }
        // target above the locked variance: push up as far as allowed
        _ => ScaleSolution {
            scale: if c0 < 0.0 { bound } else { 1.0 / bound },
            raw: None,
            outcome: ScaleOutcome::Degenerate,
            clamped: true,
        },
    }
}

/// Run a full cascade in one call.
///
/// # Errors
///
/// Same conditions as [`CascadeAlgorithm::new`].
pub fn cascade<T, W>(
    grid: &TimeGrid,
    vols: &mut InterestRateVolatilities,
    targets: &T,
    weights: &W,
    params: CascadeParameters,
) -> Result<CascadeReport, CascadeError>
where
    T: ImpliedVolTargets + ?Sized,
    W: InstrumentWeights + ?Sized,
{
    let mut engine = CascadeAlgorithm::new(grid, vols, targets, weights, params)?;
    Ok(engine.apply_cascade())
}
