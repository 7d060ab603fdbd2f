//! Calibration input files
//!
//! An input file describes the time grid, the initial factor loadings per
//! bucket, the market quotes and optionally the discount curve used for the
//! swaption weights. TOML and JSON are accepted, chosen by file extension:
//!
//! ```toml
//! # [expiry bucket][tenor bucket][factor]
//! loadings = [
//!     [[0.15, 0.05], [0.14, 0.05], [0.13, 0.04]],
//!     [[0.15, 0.05], [0.14, 0.05], [0.13, 0.04]],
//! ]
//! caplets = [{ expiry = 1, vol = 0.16 }]
//! swaptions = [{ expiry = 2, tenor = 2, vol = 16.5 }]
//!
//! [grid]
//! expiry_breaks = [0, 1, 2]
//! tenor_breaks = [0, 1, 2, 3]
//!
//! [weights]
//! discounts = [1.0, 0.985, 0.97, 0.955]
//! shift = 0.0
//! schedule = { start = "2024-01-15", months = 6, day_count = "ACT/360" }
//! ```

use std::path::Path;

use chrono::NaiveDate;
use pricer_core::types::{accrual_fractions, DayCountConvention};
use pricer_models::calibration::{CalibrationTargets, Quote, SwaptionWeights};
use pricer_models::volatility::{InterestRateVolatilities, TimeGrid};
use serde::Deserialize;
use tracing::debug;

use crate::error::{CliError, Result};

/// Time grid definition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum GridInput {
    /// Explicit bucket break points
    Breaks {
        expiry_breaks: Vec<usize>,
        tenor_breaks: Vec<usize>,
    },
    /// Standard buckets truncated to the grid size
    Standard { max_expiry: usize, max_tenor: usize },
}

impl GridInput {
    /// Build the time grid.
    pub fn build(&self) -> Result<TimeGrid> {
        let grid = match self {
            GridInput::Breaks {
                expiry_breaks,
                tenor_breaks,
            } => TimeGrid::new(expiry_breaks.clone(), tenor_breaks.clone())?,
            GridInput::Standard {
                max_expiry,
                max_tenor,
            } => TimeGrid::standard(*max_expiry, *max_tenor)?,
        };
        Ok(grid)
    }
}

/// Caplet quote row.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CapletInput {
    /// 1-based expiry
    pub expiry: usize,
    /// Implied volatility, decimal or percent
    pub vol: f64,
}

/// Regular accrual schedule.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScheduleInput {
    /// Start of the first period
    pub start: NaiveDate,
    /// Length of each period in months
    pub months: u32,
    /// Day count of the accrual fractions
    #[serde(default)]
    pub day_count: DayCountConvention,
}

/// Discount curve for frozen swap-rate weights.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeightsInput {
    /// `P(0, t_k)` for `k = 0..=MaxTenor`
    pub discounts: Vec<f64>,
    /// Explicit accrual fractions, one per period
    #[serde(default)]
    pub accruals: Option<Vec<f64>>,
    /// Schedule the accruals are computed from when not given
    #[serde(default)]
    pub schedule: Option<ScheduleInput>,
    /// Rate displacement
    #[serde(default)]
    pub shift: f64,
}

impl WeightsInput {
    fn accruals(&self, periods: usize) -> Result<Vec<f64>> {
        match (&self.accruals, &self.schedule) {
            (Some(accruals), _) => Ok(accruals.clone()),
            (None, Some(schedule)) => {
                let fractions =
                    accrual_fractions(schedule.start, schedule.months, periods, &schedule.day_count)?;
                debug!(
                    periods,
                    day_count = %schedule.day_count,
                    "accruals computed from schedule"
                );
                Ok(fractions)
            }
            (None, None) => Err(CliError::input(
                "weights need either accruals or a schedule",
            )),
        }
    }
}

/// Parsed calibration input file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CalibrationInput {
    /// Time grid
    pub grid: GridInput,
    /// Expected number of factors, checked against the loadings
    #[serde(default)]
    pub factors: Option<usize>,
    /// Initial loadings per `[expiry bucket][tenor bucket]`
    pub loadings: Vec<Vec<Vec<f64>>>,
    /// Caplet quotes
    #[serde(default)]
    pub caplets: Vec<CapletInput>,
    /// Swaption quotes
    #[serde(default)]
    pub swaptions: Vec<Quote>,
    /// Discount curve, equal weights when absent
    #[serde(default)]
    pub weights: Option<WeightsInput>,
}

/// Everything the cascade needs, built from an input file.
#[derive(Debug, Clone)]
pub struct CalibrationProblem {
    /// Time grid
    pub grid: TimeGrid,
    /// Initial volatility grid
    pub vols: InterestRateVolatilities,
    /// Market quotes
    pub targets: CalibrationTargets,
    /// Swaption weights
    pub weights: SwaptionWeights,
}

impl CalibrationInput {
    /// Load an input file, TOML or JSON by extension.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CliError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            Some("toml") => Self::from_toml(&content),
            other => Err(CliError::InvalidArgument(format!(
                "unsupported input extension {:?}, expected .toml or .json",
                other.unwrap_or("")
            ))),
        }
    }

    /// Parse TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| CliError::input(format!("invalid TOML input: {}", e)))
    }

    /// Parse JSON text.
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Validate and assemble the calibration problem.
    pub fn build(&self) -> Result<CalibrationProblem> {
        let grid = self.grid.build()?;
        let vols = InterestRateVolatilities::from_bucket_loadings(&grid, &self.loadings)?;
        if let Some(expected) = self.factors {
            if expected != vols.factors() {
                return Err(pricer_models::ModelError::invalid_factor_count(
                    expected,
                    vols.factors(),
                )
                .into());
            }
        }

        let caplets: Vec<(usize, f64)> = self.caplets.iter().map(|c| (c.expiry, c.vol)).collect();
        let swaptions: Vec<(usize, usize, f64)> = self
            .swaptions
            .iter()
            .map(|q| (q.expiry, q.tenor, q.vol))
            .collect();
        let targets = CalibrationTargets::from_quotes(&grid, &caplets, &swaptions)?;

        let weights = match &self.weights {
            Some(input) => {
                let accruals = input.accruals(grid.max_tenor())?;
                SwaptionWeights::from_discount_factors(
                    &grid,
                    &input.discounts,
                    &accruals,
                    input.shift,
                )?
            }
            None => SwaptionWeights::equal(&grid),
        };

        debug!(
            max_expiry = grid.max_expiry(),
            max_tenor = grid.max_tenor(),
            factors = vols.factors(),
            caplets = targets.caplet_count(),
            swaptions = targets.swaption_count(),
            "calibration input loaded"
        );

        Ok(CalibrationProblem {
            grid,
            vols,
            targets,
            weights,
        })
    }
}
