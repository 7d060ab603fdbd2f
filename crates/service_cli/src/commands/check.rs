//! Check command implementation
//!
//! Prints the effective configuration after defaults, file, environment
//! and command line have been merged.

use std::path::Path;

use tracing::info;

use crate::config::CliConfig;
use crate::error::CliError;
use crate::Result;

/// Run the check command
pub fn run(config_path: &Path, config: &CliConfig) -> Result<()> {
    info!("Checking configuration...");
    if config_path.exists() {
        info!("  Config file: {}", config_path.display());
    } else {
        info!("  Config file: {} (not found, using defaults)", config_path.display());
    }

    print!("{}", effective_settings(config)?);
    info!("Configuration OK");
    Ok(())
}

/// Effective settings as TOML.
pub fn effective_settings(config: &CliConfig) -> Result<String> {
    config.validate()?;
    toml::to_string_pretty(config)
        .map_err(|e| CliError::config(format!("failed to render configuration: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_settings_round_trip() {
        let text = effective_settings(&CliConfig::default()).unwrap();
        assert!(text.contains("log_level = \"info\""));
        assert!(text.contains("[cascade]"));
        assert_eq!(CliConfig::from_toml(&text).unwrap(), CliConfig::default());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = CliConfig::default();
        config.cascade.swaption_max_scale = 1.0;
        assert!(matches!(effective_settings(&config).unwrap_err(), CliError::Config(_)));
    }
}
