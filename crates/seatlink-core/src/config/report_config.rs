//! Report and audit-sampling knobs.

use serde::{Deserialize, Serialize};

/// Controls for the validation report.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReportConfig {
    /// Accepted matches below this confidence land in the audit sample.
    /// Default: 0.90.
    pub low_confidence_threshold: Option<f64>,
    /// Maximum audit sample entries in the report. Default: 25.
    pub audit_sample_size: Option<usize>,
}

impl ReportConfig {
    pub fn effective_low_confidence_threshold(&self) -> f64 {
        self.low_confidence_threshold.unwrap_or(0.90)
    }

    pub fn effective_audit_sample_size(&self) -> usize {
        self.audit_sample_size.unwrap_or(25)
    }
}
