//! Runtime behavior knobs.

use serde::{Deserialize, Serialize};

/// Execution controls for a batch run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Resolve state partitions in parallel. Default: true.
    pub parallel: Option<bool>,
    /// Hard cap on the candidate set handed to the scoring tiers.
    /// Default: 200.
    pub candidate_cap: Option<usize>,
}

impl RuntimeConfig {
    pub fn effective_parallel(&self) -> bool {
        self.parallel.unwrap_or(true)
    }

    pub fn effective_candidate_cap(&self) -> usize {
        self.candidate_cap.unwrap_or(200)
    }
}
