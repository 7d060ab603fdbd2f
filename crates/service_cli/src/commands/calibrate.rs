//! Calibrate command implementation
//!
//! Loads a calibration input file, runs the cascade with the configured
//! bounds and reports the calibrated volatility sizes, the cascade steps
//! and the fit against the quotes.

use std::fmt::Write as _;
use std::path::Path;

use pricer_models::calibration::{fit_diagnostics, CalibrationDiagnostics};
use pricer_optimiser::cascade::{cascade, CascadeReport};
use serde::Serialize;
use tracing::info;

use crate::config::{CliConfig, OutputFormat};
use crate::input::CalibrationInput;
use crate::Result;

/// Everything the calibrate command reports.
#[derive(Debug, Clone, Serialize)]
pub struct CalibrationOutput {
    /// Volatility size per `[period][forward offset]`
    pub volatilities: Vec<Vec<f64>>,
    /// Cascade steps
    pub report: CascadeReport,
    /// Fit of the calibrated grid
    pub diagnostics: CalibrationDiagnostics,
}

/// Run the calibrate command
pub fn run(input: &Path, output: Option<&Path>, config: &CliConfig) -> Result<()> {
    info!("Starting calibration...");
    info!("  Input: {}", input.display());
    info!(
        "  Bounds: caplet {}, swaption {}",
        config.cascade.caplet_max_scale, config.cascade.swaption_max_scale
    );

    let result = calibrate(&CalibrationInput::from_file(input)?, config)?;
    let rendered = render(&result, config.output_format)?;

    match output {
        Some(path) => {
            std::fs::write(path, rendered)?;
            info!("Calibrated grid written to: {}", path.display());
        }
        None => print!("{}", rendered),
    }

    info!(
        rmse = result.diagnostics.rmse,
        max_error = result.diagnostics.max_error,
        "Calibration complete"
    );
    Ok(())
}

/// Build the problem from `input` and run the cascade on it.
pub fn calibrate(input: &CalibrationInput, config: &CliConfig) -> Result<CalibrationOutput> {
    let mut problem = input.build()?;
    let report = cascade(
        &problem.grid,
        &mut problem.vols,
        &problem.targets,
        &problem.weights,
        config.cascade,
    )?;
    let diagnostics = fit_diagnostics(
        &problem.grid,
        &problem.vols,
        &problem.targets,
        &problem.weights,
    )?;

    Ok(CalibrationOutput {
        volatilities: problem.vols.norm_surface(),
        report,
        diagnostics,
    })
}

/// Render the output in the requested format.
pub fn render(output: &CalibrationOutput, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut text = serde_json::to_string_pretty(output)?;
            text.push('\n');
            Ok(text)
        }
        OutputFormat::Table => Ok(render_table(output)),
    }
}

fn render_table(output: &CalibrationOutput) -> String {
    let mut out = String::new();
    let diag = &output.diagnostics;
    let report = &output.report;

    // write! into a String cannot fail
    let _ = writeln!(out, "Volatility sizes (row = period, column = forward offset)");
    for (row, sizes) in output.volatilities.iter().enumerate() {
        let cells: Vec<String> = sizes.iter().map(|v| format!("{:8.5}", v)).collect();
        let _ = writeln!(out, "{:>4} {}", row + 1, cells.join(" "));
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:>6} {:>6} {:>9} {:>9} {:>9} {:>9} {:>10}",
        "expiry", "tenor", "kind", "target", "model", "scale", "outcome"
    );
    for fit in &diag.fits {
        let step = report.step(fit.expiry, fit.tenor);
        let scale = step.map_or_else(|| "-".to_string(), |s| format!("{:.5}", s.scale));
        let outcome = step.map_or_else(
            || "skipped".to_string(),
            |s| {
                let mut outcome = format!("{:?}", s.outcome).to_lowercase();
                if s.clamped {
                    outcome.push('*');
                }
                outcome
            },
        );
        let _ = writeln!(
            out,
            "{:>6} {:>6} {:>9} {:>9.5} {:>9.5} {:>9} {:>10}",
            fit.expiry, fit.tenor, fit.kind, fit.target, fit.model, scale, outcome
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "steps {}  skipped {}  clamped {}  cells {}",
        report.steps.len(),
        report.skipped,
        report.clamped,
        report.cells_scaled()
    );
    let _ = writeln!(
        out,
        "RMSE {:.6}  max error {:.6}  caplet error {:.6}  swaption error {:.6}",
        diag.rmse, diag.max_error, diag.average_caplet_error, diag.average_swaption_error
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_optimiser::cascade::CascadeParameters;

    fn single_caplet() -> CalibrationInput {
        CalibrationInput::from_toml(
            r#"
            loadings = [[[0.2]]]
            caplets = [{ expiry = 1, vol = 25.0 }]

            [grid]
            max_expiry = 1
            max_tenor = 1
            "#,
        )
        .unwrap()
    }

    fn wide_bounds() -> CliConfig {
        CliConfig {
            cascade: CascadeParameters::builder().caplet_max_scale(10.0).build(),
            ..CliConfig::default()
        }
    }

    #[test]
    fn test_calibrate_reaches_quote() {
        let output = calibrate(&single_caplet(), &wide_bounds()).unwrap();
        assert_relative_eq!(output.volatilities[0][0], 0.25, max_relative = 1e-12);
        assert_eq!(output.report.steps.len(), 1);
        assert!(output.diagnostics.max_error < 1e-12);
    }

    #[test]
    fn test_default_bounds_clamp() {
        let output = calibrate(&single_caplet(), &CliConfig::default()).unwrap();
        assert_relative_eq!(output.volatilities[0][0], 0.24, max_relative = 1e-12);
        assert_eq!(output.report.clamped, 1);
        assert_relative_eq!(output.diagnostics.max_error, 0.01, max_relative = 1e-9);
    }

    #[test]
    fn test_render_json() {
        let output = calibrate(&single_caplet(), &wide_bounds()).unwrap();
        let text = render(&output, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["report"]["steps"][0]["kind"], "caplet");
        assert_eq!(value["report"]["steps"][0]["outcome"], "root");
        assert!(value["diagnostics"]["rmse"].as_f64().unwrap() < 1e-12);
    }

    #[test]
    fn test_render_table() {
        let output = calibrate(&single_caplet(), &CliConfig::default()).unwrap();
        let text = render(&output, OutputFormat::Table).unwrap();
        assert!(text.contains("0.24000"));
        assert!(text.contains("root*"));
        assert!(text.contains("clamped 1"));
    }
}
