//! Cascade CLI - Command Line Volatility Calibration
//!
//! This is the operational entry point for cascade calibration of
//! forward-rate volatility grids.
//!
//! # Commands
//!
//! - `cascade calibrate --input <file>` - Calibrate a grid to caplet and swaption quotes
//! - `cascade check` - Validate and print the effective configuration
//!
//! # Architecture
//!
//! As part of the **S**ervice layer in the A-I-P-S architecture, this crate
//! orchestrates the pricer layers to provide a command-line interface.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;
mod input;

pub use error::{CliError, Result};

use config::{build_config, CliOverrides, OutputFormat};

/// Cascade volatility calibration CLI
#[derive(Parser)]
#[command(name = "cascade")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "cascade.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calibrate a volatility grid to caplet and swaption quotes
    Calibrate {
        /// Path to calibration input file (TOML/JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file, stdout when absent
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (json, table)
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },

    /// Check configuration
    Check,
}

fn init_tracing(default_level: &str) {
    // RUST_LOG wins over the configured level
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let format = match &cli.command {
        Commands::Calibrate { format, .. } => *format,
        Commands::Check => None,
    };
    let overrides = CliOverrides {
        verbose: cli.verbose,
        output_format: format,
    };
    let config = build_config(&cli.config, &overrides)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;

    init_tracing(config.log_level.as_filter_str());
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    match cli.command {
        Commands::Calibrate { input, output, .. } => {
            commands::calibrate::run(&input, output.as_deref(), &config)
                .with_context(|| format!("calibrating {}", input.display()))?
        }
        Commands::Check => commands::check::run(&cli.config, &config)?,
    }
    Ok(())
}
