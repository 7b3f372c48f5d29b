//! Error handling for seatlink.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.
//!
//! Per-record outcomes (UNMATCHED, AMBIGUOUS) are data, not errors, and
//! never appear here; see `types::MatchOutcome`.

pub mod config_error;
pub mod error_code;
pub mod pipeline_error;
pub mod registry_error;
pub mod report_error;
pub mod storage_error;

pub use config_error::ConfigError;
pub use error_code::LinkErrorCode;
pub use pipeline_error::{BatchResult, PipelineError};
pub use registry_error::RegistryError;
pub use report_error::ReportError;
pub use storage_error::StorageError;
