//! Match outcomes, methods, and per-tier provenance.

use serde::{Deserialize, Serialize};

use super::master::CollegeId;

/// Which matcher tier produced an accepted link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchMethod {
    ExactKey,
    FuzzyName,
    TokenSet,
    Embedding,
    Phonetic,
    AddressDisambiguated,
}

impl MatchMethod {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ExactKey => "EXACT_KEY",
            Self::FuzzyName => "FUZZY_NAME",
            Self::TokenSet => "TOKEN_SET",
            Self::Embedding => "EMBEDDING",
            Self::Phonetic => "PHONETIC",
            Self::AddressDisambiguated => "ADDRESS_DISAMBIGUATED",
        }
    }

    pub fn parse(value: &str) -> Option<MatchMethod> {
        match value.trim().to_ascii_uppercase().as_str() {
            "EXACT_KEY" => Some(Self::ExactKey),
            "FUZZY_NAME" => Some(Self::FuzzyName),
            "TOKEN_SET" => Some(Self::TokenSet),
            "EMBEDDING" => Some(Self::Embedding),
            "PHONETIC" => Some(Self::Phonetic),
            "ADDRESS_DISAMBIGUATED" => Some(Self::AddressDisambiguated),
            _ => None,
        }
    }
}

impl std::fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Final status of a record after the cascade and disambiguation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    Matched,
    Unmatched,
    Ambiguous,
}

impl MatchStatus {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Matched => "MATCHED",
            Self::Unmatched => "UNMATCHED",
            Self::Ambiguous => "AMBIGUOUS",
        }
    }

    pub fn parse(value: &str) -> Option<MatchStatus> {
        match value.trim().to_ascii_uppercase().as_str() {
            "MATCHED" => Some(Self::Matched),
            "UNMATCHED" => Some(Self::Unmatched),
            "AMBIGUOUS" => Some(Self::Ambiguous),
            _ => None,
        }
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// How a single tier concluded for one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TierVerdict {
    Accepted,
    BelowThreshold,
    MarginTooNarrow,
    Tied,
    NoSignal,
    Skipped,
}

impl TierVerdict {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Accepted => "ACCEPTED",
            Self::BelowThreshold => "BELOW_THRESHOLD",
            Self::MarginTooNarrow => "MARGIN_TOO_NARROW",
            Self::Tied => "TIED",
            Self::NoSignal => "NO_SIGNAL",
            Self::Skipped => "SKIPPED",
        }
    }
}

/// Provenance for one tier attempt, kept on the result so UNMATCHED and
/// AMBIGUOUS rows are reviewable without re-running the matcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierAttempt {
    pub method: MatchMethod,
    pub best_score: Option<f64>,
    pub verdict: TierVerdict,
}

impl TierAttempt {
    pub fn new(method: MatchMethod, best_score: Option<f64>, verdict: TierVerdict) -> Self {
        Self {
            method,
            best_score,
            verdict,
        }
    }
}

/// Outcome of the cascade for one record, propagated as data through every
/// stage. Never an error: no-match and ambiguity are expected results.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    Matched {
        college_id: CollegeId,
        confidence: f64,
        method: MatchMethod,
    },
    Unmatched,
    /// Two or more candidates could not be separated. Ids are ordered
    /// lexicographically; the first is the deterministic tie-break leader.
    Ambiguous { candidates: Vec<CollegeId> },
}

impl MatchOutcome {
    pub fn status(&self) -> MatchStatus {
        match self {
            Self::Matched { .. } => MatchStatus::Matched,
            Self::Unmatched => MatchStatus::Unmatched,
            Self::Ambiguous { .. } => MatchStatus::Ambiguous,
        }
    }
}

/// The one row the engine writes per seat record.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub seat_record_id: i64,
    pub college_id: Option<CollegeId>,
    pub confidence: f64,
    pub method: Option<MatchMethod>,
    pub state_normalized: String,
    pub status: MatchStatus,
    /// Ambiguous survivors in lexicographic order; empty unless AMBIGUOUS.
    pub candidates: Vec<CollegeId>,
    pub trace: Vec<TierAttempt>,
}

impl MatchResult {
    /// Assemble the result row from a cascade outcome.
    pub fn from_outcome(
        seat_record_id: i64,
        state_normalized: String,
        outcome: MatchOutcome,
        trace: Vec<TierAttempt>,
    ) -> Self {
        match outcome {
            MatchOutcome::Matched {
                college_id,
                confidence,
                method,
            } => Self {
                seat_record_id,
                college_id: Some(college_id),
                confidence,
                method: Some(method),
                state_normalized,
                status: MatchStatus::Matched,
                candidates: Vec::new(),
                trace,
            },
            MatchOutcome::Unmatched => Self {
                seat_record_id,
                college_id: None,
                confidence: 0.0,
                method: None,
                state_normalized,
                status: MatchStatus::Unmatched,
                candidates: Vec::new(),
                trace,
            },
            MatchOutcome::Ambiguous { candidates } => Self {
                seat_record_id,
                college_id: None,
                confidence: 0.0,
                method: None,
                state_normalized,
                status: MatchStatus::Ambiguous,
                candidates,
                trace,
            },
        }
    }

    /// Deterministic representative of an AMBIGUOUS result, for review
    /// ordering only. Never promoted to a match.
    pub fn tiebreak_leader(&self) -> Option<&CollegeId> {
        match self.status {
            MatchStatus::Ambiguous => self.candidates.first(),
            _ => None,
        }
    }
}
