//! Cascade step results.

use std::time::Duration;

use pricer_models::calibration::InstrumentKind;

/// How a scale factor was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ScaleOutcome {
    /// Larger root of the variance-matching quadratic.
    Root,
    /// No real root: vertex of the parabola (closest variance).
    Vertex,
    /// No usable free variance: the scale is the bound in the direction
    /// of the target.
    Degenerate,
    /// Non-finite inputs: the cells are left unscaled.
    Unusable,
}

/// Result of solving for one instrument's scale factor.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ScaleSolution {
    /// Scale to apply, within `[1/bound, bound]`.
    pub scale: f64,
    /// Unclamped solution, `None` when the quadratic has no usable solution.
    pub raw: Option<f64>,
    /// How the scale was obtained.
    pub outcome: ScaleOutcome,
    /// Whether `scale` differs from the raw solution because of the bound.
    pub clamped: bool,
}

/// One calibrated instrument.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CascadeStep {
    /// 1-based expiry
    pub expiry: usize,
    /// 1-based tenor
    pub tenor: usize,
    /// Instrument class
    pub kind: InstrumentKind,
    /// Market implied volatility
    pub target: f64,
    /// Scale applied to the free cells
    pub scale: f64,
    /// Unclamped solution
    pub raw_scale: Option<f64>,
    /// How the scale was obtained
    pub outcome: ScaleOutcome,
    /// Whether the bound was hit
    pub clamped: bool,
    /// Number of cells locked by this step
    pub cells_scaled: usize,
}

/// Summary of a full cascade run.
///
/// Instruments without a quote, or whose class is disabled, are counted in
/// `skipped` and have no step. Steps with [`ScaleOutcome::Unusable`] are
/// recorded and also counted in `skipped`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CascadeReport {
    /// Processed instruments in cascade order
    pub steps: Vec<CascadeStep>,
    /// Instruments that scaled nothing
    pub skipped: usize,
    /// Steps whose scale hit the bound
    pub clamped: usize,
    /// Wall-clock time of the cascade
    pub duration: Duration,
}

impl CascadeReport {
    /// Steps whose scale hit the bound.
    pub fn clamped_steps(&self) -> impl Iterator<Item = &CascadeStep> {
        self.steps.iter().filter(|s| s.clamped)
    }

    /// Steps without usable free variance.
    pub fn degenerate_steps(&self) -> impl Iterator<Item = &CascadeStep> {
        self.steps
            .iter()
            .filter(|s| matches!(s.outcome, ScaleOutcome::Degenerate | ScaleOutcome::Unusable))
    }

    /// Step for `(expiry, tenor)`, if it was processed.
    pub fn step(&self, expiry: usize, tenor: usize) -> Option<&CascadeStep> {
        self.steps
            .iter()
            .find(|s| s.expiry == expiry && s.tenor == tenor)
    }

    /// Total number of cells locked by the run.
    pub fn cells_scaled(&self) -> usize {
        self.steps.iter().map(|s| s.cells_scaled).sum()
    }
}
