//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Input line is not a valid message
    #[error("Invalid message on line {line}: {message}")]
    InvalidInput { line: usize, message: String },

    /// `--operation` override not recognized
    #[error("Invalid --operation override: {0}")]
    InvalidOperation(#[from] contracts::ContractError),

    /// Route stopped before all messages were processed
    #[error("Route '{route}' failed: {source}")]
    Route {
        route: String,
        #[source]
        source: producer::ProducerError,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn invalid_input(line: usize, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            line,
            message: message.into(),
        }
    }

    pub fn route(route: impl Into<String>, source: producer::ProducerError) -> Self {
        Self::Route {
            route: route.into(),
            source,
        }
    }
}
