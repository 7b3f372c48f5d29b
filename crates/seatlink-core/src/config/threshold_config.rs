//! Matcher tier thresholds.

use serde::{Deserialize, Serialize};

/// Per-tier accept thresholds and tie handling. All scores live in [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Fuzzy-name accept threshold. Default: 0.85.
    pub fuzzy_accept: Option<f64>,
    /// Required lead of the best fuzzy candidate over the runner-up.
    /// Default: 0.04. Zero disables the margin rule.
    pub fuzzy_margin: Option<f64>,
    /// Token-set accept threshold. Default: 0.80.
    pub token_set_accept: Option<f64>,
    /// Embedding cosine floor. Default: 0.70.
    pub embedding_floor: Option<f64>,
    /// Phonetic blended accept threshold. Default: 0.75.
    pub phonetic_accept: Option<f64>,
    /// Scores within this distance of the best are a tie. Default: 0.02.
    pub tie_epsilon: Option<f64>,
    /// Confidence recorded when address evidence alone resolves a generic
    /// name with no prior tier score. Default: 0.90.
    pub disambiguation_confidence: Option<f64>,
}

impl ThresholdConfig {
    pub fn effective_fuzzy_accept(&self) -> f64 {
        self.fuzzy_accept.unwrap_or(0.85)
    }

    pub fn effective_fuzzy_margin(&self) -> f64 {
        self.fuzzy_margin.unwrap_or(0.04)
    }

    pub fn effective_token_set_accept(&self) -> f64 {
        self.token_set_accept.unwrap_or(0.80)
    }

    pub fn effective_embedding_floor(&self) -> f64 {
        self.embedding_floor.unwrap_or(0.70)
    }

    pub fn effective_phonetic_accept(&self) -> f64 {
        self.phonetic_accept.unwrap_or(0.75)
    }

    pub fn effective_tie_epsilon(&self) -> f64 {
        self.tie_epsilon.unwrap_or(0.02)
    }

    pub fn effective_disambiguation_confidence(&self) -> f64 {
        self.disambiguation_confidence.unwrap_or(0.90)
    }

    /// Resolve every threshold once, for the hot path.
    pub fn effective(&self) -> EffectiveThresholds {
        EffectiveThresholds {
            fuzzy_accept: self.effective_fuzzy_accept(),
            fuzzy_margin: self.effective_fuzzy_margin(),
            token_set_accept: self.effective_token_set_accept(),
            embedding_floor: self.effective_embedding_floor(),
            phonetic_accept: self.effective_phonetic_accept(),
            tie_epsilon: self.effective_tie_epsilon(),
            disambiguation_confidence: self.effective_disambiguation_confidence(),
        }
    }
}

/// Fully resolved thresholds, computed once per run so the per-record path
/// never consults `Option` defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveThresholds {
    pub fuzzy_accept: f64,
    pub fuzzy_margin: f64,
    pub token_set_accept: f64,
    pub embedding_floor: f64,
    pub phonetic_accept: f64,
    pub tie_epsilon: f64,
    pub disambiguation_confidence: f64,
}
