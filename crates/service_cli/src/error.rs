//! CLI error types

use thiserror::Error;

/// Errors raised by the command line front end.
#[derive(Debug, Error)]
pub enum CliError {
    /// Input or configuration file does not exist
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Bad command line argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Calibration input could not be parsed or is inconsistent
    #[error("Input error: {0}")]
    Input(String),

    /// Error from the volatility grid layer
    #[error(transparent)]
    Model(#[from] pricer_models::ModelError),

    /// Error from the cascade layer
    #[error(transparent)]
    Cascade(#[from] pricer_optimiser::cascade::CascadeError),

    /// Error from the foundation layer
    #[error(transparent)]
    Core(#[from] pricer_core::types::CoreError),

    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an input error.
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input(message.into())
    }
}

/// Result type of the CLI commands.
pub type Result<T> = std::result::Result<T, CliError>;
