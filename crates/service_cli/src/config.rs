//! CLI configuration management
//!
//! Settings are layered: built-in defaults, then the TOML configuration
//! file, then `CASCADE_*` environment variables, then command line flags.
//! The merged configuration is validated once at the end.

use std::path::Path;
use std::str::FromStr;

use pricer_optimiser::cascade::CascadeParameters;
use serde::{Deserialize, Serialize};

use crate::error::{CliError, Result};

/// Environment variable overriding the log level.
pub const ENV_LOG_LEVEL: &str = "CASCADE_LOG_LEVEL";
/// Environment variable overriding the caplet scale bound.
pub const ENV_CAPLET_MAX_SCALE: &str = "CASCADE_CAPLET_MAX_SCALE";
/// Environment variable overriding the swaption scale bound.
pub const ENV_SWAPTION_MAX_SCALE: &str = "CASCADE_SWAPTION_MAX_SCALE";

/// Log levels supported by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(CliError::config(format!(
                "invalid log level '{}', expected one of: trace, debug, info, warn, error",
                s
            ))),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// How results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    #[default]
    Table,
}

impl FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "table" => Ok(OutputFormat::Table),
            _ => Err(CliError::InvalidArgument(format!(
                "unknown output format '{}', supported: json, table",
                s
            ))),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Table => write!(f, "table"),
        }
    }
}

/// CLI configuration structure
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Log level
    pub log_level: LogLevel,
    /// Output format of the calibrate command
    pub output_format: OutputFormat,
    /// Cascade settings
    pub cascade: CascadeParameters,
}

/// Command line overrides
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    /// Raise the log level to debug
    pub verbose: bool,
    /// Output format override
    pub output_format: Option<OutputFormat>,
}

impl CliConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| CliError::config(format!("failed to parse TOML: {}", e)))
    }

    /// Apply overrides from an environment lookup.
    ///
    /// Only variables that are set change the configuration.
    pub fn merge_with_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = LogLevel::from_str(&level)?;
        }
        if let Some(bound) = lookup(ENV_CAPLET_MAX_SCALE) {
            self.cascade.caplet_max_scale = parse_bound(ENV_CAPLET_MAX_SCALE, &bound)?;
        }
        if let Some(bound) = lookup(ENV_SWAPTION_MAX_SCALE) {
            self.cascade.swaption_max_scale = parse_bound(ENV_SWAPTION_MAX_SCALE, &bound)?;
        }
        Ok(())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliOverrides) {
        if cli.verbose {
            self.log_level = LogLevel::Debug;
        }
        if let Some(format) = cli.output_format {
            self.output_format = format;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.cascade
            .validate()
            .map_err(|e| CliError::config(e.to_string()))
    }
}

fn parse_bound(name: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::config(format!("{} is not a number: '{}'", name, value)))
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file (skipped when it does not exist)
/// 4. Default values
pub fn build_config(path: &Path, cli: &CliOverrides) -> Result<CliConfig> {
    build_config_with_env(path, cli, |name| std::env::var(name).ok())
}

/// [`build_config`] with an explicit environment lookup.
pub fn build_config_with_env<F>(path: &Path, cli: &CliOverrides, env: F) -> Result<CliConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = if path.exists() {
        CliConfig::from_file(path)?
    } else {
        CliConfig::default()
    };

    config.merge_with_env(env)?;
    config.merge_with_cli(cli);
    config.validate()?;
    Ok(config)
}
