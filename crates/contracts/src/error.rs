//! Layered error definitions
//!
//! Categorized by source: config / storage / codec / channel

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Storage Errors =====
    /// Row store query/connection error
    ///
    /// Fatal for the traversal that hit it; retry policy belongs to the host,
    /// which may rebuild the engine with a resumed cursor.
    #[error("storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // ===== Codec Errors =====
    /// Raw bridge report parse error
    #[error("report parse error: {message}")]
    ReportParse { message: String },

    /// Measurement field decode error
    #[error("field decode error for '{field}': {message}")]
    FieldDecode { field: String, message: String },

    // ===== General Errors =====
    /// Packet emission channel closed while a traversal was still running
    #[error("packet channel closed")]
    ChannelClosed,

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create storage error without an underlying cause
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            source: None,
        }
    }

    /// Create report parse error
    pub fn report_parse(message: impl Into<String>) -> Self {
        Self::ReportParse {
            message: message.into(),
        }
    }

    /// Create field decode error
    pub fn field_decode(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FieldDecode {
            field: field.into(),
            message: message.into(),
        }
    }
}
