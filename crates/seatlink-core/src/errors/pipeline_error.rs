//! Pipeline errors and non-fatal error collection.

use super::error_code::LinkErrorCode;
use super::{ConfigError, RegistryError, ReportError, StorageError};

/// Errors that can occur while running a resolution batch.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("report error: {0}")]
    Report(#[from] ReportError),
}

impl LinkErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Registry(e) => e.error_code(),
            Self::Storage(e) => e.error_code(),
            Self::Report(e) => e.error_code(),
        }
    }
}

/// Result of a batch stage that accumulates non-fatal errors.
/// Lets a run return partial output even when some inputs fail, which the
/// batch contract requires: one bad row must never abort the whole import.
#[derive(Debug, Default)]
pub struct BatchResult<T: Default = ()> {
    /// The successful result data.
    pub data: T,
    /// Non-fatal errors collected during the stage.
    pub errors: Vec<PipelineError>,
}

impl<T: Default> BatchResult<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: PipelineError) {
        self.errors.push(error);
    }

    /// Returns true if there are no non-fatal errors.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}
