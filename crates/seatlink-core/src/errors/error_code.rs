//! Stable error codes for log and report correlation.

/// Every error enum carries a structured code string so log lines, report
/// findings, and exit paths can be correlated without parsing messages.
pub trait LinkErrorCode {
    /// Returns the stable code string (e.g., "CONFIG_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted log string: `[ERROR_CODE] message`.
    fn log_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

// Error code constants.
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const REGISTRY_ERROR: &str = "REGISTRY_ERROR";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const REPORT_ERROR: &str = "REPORT_ERROR";
pub const INTEGRITY_ERROR: &str = "REGISTRY_INTEGRITY_ERROR";
