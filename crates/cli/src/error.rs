//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[allow(dead_code)]
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Configuration parsing error
    #[error("Failed to parse configuration: {message}")]
    ConfigParse { message: String },

    /// Configuration validation error
    #[error("Configuration validation failed: {message}")]
    ConfigValidation { message: String },

    /// Readings log loading error
    #[error("Failed to load readings from {path}: {message}")]
    ReadingsLoad { path: String, message: String },

    /// Report line decoding error
    #[error("Failed to decode report line {line}: {message}")]
    ReportDecode { line: usize, message: String },

    /// Stream execution error
    #[error("Stream execution failed: {message}")]
    StreamExecution { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error wrapper
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

#[allow(dead_code)]
impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
        }
    }

    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    pub fn readings_load(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ReadingsLoad {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn report_decode(line: usize, message: impl Into<String>) -> Self {
        Self::ReportDecode {
            line,
            message: message.into(),
        }
    }

    pub fn stream_execution(message: impl Into<String>) -> Self {
        Self::StreamExecution {
            message: message.into(),
        }
    }
}

/// Result type alias for CLI operations
#[allow(dead_code)]
pub type Result<T> = std::result::Result<T, CliError>;
