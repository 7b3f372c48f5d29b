//! Configuration errors. Always fatal at startup, before any record is
//! processed.

use super::error_code::{self, LinkErrorCode};

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    #[error("config parse error in {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("config validation failed for {field}: {message}")]
    ValidationFailed { field: String, message: String },
}

impl LinkErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        error_code::CONFIG_ERROR
    }
}
