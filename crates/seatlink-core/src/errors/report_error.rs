//! Report output errors.

use super::error_code::{self, LinkErrorCode};

/// Errors while writing the validation report or result exports.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to write {path}: {message}")]
    WriteFailed { path: String, message: String },
}

impl LinkErrorCode for ReportError {
    fn error_code(&self) -> &'static str {
        error_code::REPORT_ERROR
    }
}
