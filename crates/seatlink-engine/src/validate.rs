//! Post-run integrity validation of accepted matches.
//!
//! Defense in depth for the filter's invariants: every check here should
//! be structurally impossible to fail, so any finding is a hard defect in
//! the registry or in this engine, surfaced prominently and blocking that
//! record's promotion without aborting the batch.

use std::collections::{BTreeMap, BTreeSet};

use seatlink_core::errors::error_code::INTEGRITY_ERROR;
use seatlink_core::types::{CollegeId, MatchResult, MatchStatus};

use crate::registry::RegistryIndex;

/// One defect found after the batch resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum IntegrityFinding {
    /// An accepted match references an id absent from the registry.
    MissingCollege {
        seat_record_id: i64,
        college_id: CollegeId,
    },
    /// An accepted match crosses canonical states.
    StateMismatch {
        seat_record_id: i64,
        college_id: CollegeId,
        record_state: String,
        college_state: String,
    },
    /// One college linked from records of more than one canonical state.
    CrossStateLinks {
        college_id: CollegeId,
        states: Vec<String>,
    },
    /// The registry carries the same composite key under several ids.
    DuplicateCompositeKey {
        key: String,
        colleges: Vec<CollegeId>,
    },
    /// Same-state colleges share one normalized name across different
    /// addresses; name evidence alone can never separate them.
    NamesakeColleges {
        state: String,
        name: String,
        colleges: Vec<CollegeId>,
    },
}

impl std::fmt::Display for IntegrityFinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingCollege { seat_record_id, college_id } => write!(
                f,
                "record {seat_record_id} accepted against unknown college {college_id}"
            ),
            Self::StateMismatch {
                seat_record_id,
                college_id,
                record_state,
                college_state,
            } => write!(
                f,
                "record {seat_record_id} in {record_state} accepted against {college_id} \
                 in {college_state}"
            ),
            Self::CrossStateLinks { college_id, states } => write!(
                f,
                "college {college_id} linked from {} states ({})",
                states.len(),
                states.join(", ")
            ),
            Self::DuplicateCompositeKey { key, colleges } => {
                let ids: Vec<&str> = colleges.iter().map(CollegeId::as_str).collect();
                write!(f, "composite key \"{key}\" shared by {}", ids.join(", "))
            }
            Self::NamesakeColleges { state, name, colleges } => {
                let ids: Vec<&str> = colleges.iter().map(CollegeId::as_str).collect();
                write!(
                    f,
                    "name \"{name}\" in {state} shared by {} at different addresses",
                    ids.join(", ")
                )
            }
        }
    }
}

/// Findings plus the records they block from promotion.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ValidationSummary {
    pub findings: Vec<IntegrityFinding>,
    /// Seat record ids whose results must not be promoted, sorted.
    pub demoted: Vec<i64>,
}

impl ValidationSummary {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Checks every accepted match against the registry.
///
/// Referential existence and state equality block the offending record;
/// cross-state link sets, duplicate registry keys, and same-state namesake
/// groups are reported for registry repair without demoting anything
/// further (a cross-state set always contains a state mismatch that was
/// already demoted).
pub fn validate_batch(results: &[MatchResult], index: &RegistryIndex) -> ValidationSummary {
    let mut findings = Vec::new();
    let mut demoted = BTreeSet::new();
    let mut links: BTreeMap<CollegeId, BTreeSet<String>> = BTreeMap::new();

    for result in results {
        if result.status != MatchStatus::Matched {
            continue;
        }
        let Some(college_id) = &result.college_id else {
            continue;
        };
        let Some(college_state) = index.college_state(college_id) else {
            findings.push(IntegrityFinding::MissingCollege {
                seat_record_id: result.seat_record_id,
                college_id: college_id.clone(),
            });
            demoted.insert(result.seat_record_id);
            continue;
        };
        links
            .entry(college_id.clone())
            .or_default()
            .insert(result.state_normalized.clone());
        if college_state != result.state_normalized {
            findings.push(IntegrityFinding::StateMismatch {
                seat_record_id: result.seat_record_id,
                college_id: college_id.clone(),
                record_state: result.state_normalized.clone(),
                college_state: college_state.to_string(),
            });
            demoted.insert(result.seat_record_id);
        }
    }

    for (college_id, states) in links {
        if states.len() > 1 {
            findings.push(IntegrityFinding::CrossStateLinks {
                college_id,
                states: states.into_iter().collect(),
            });
        }
    }

    for (key, colleges) in index.duplicate_keys() {
        findings.push(IntegrityFinding::DuplicateCompositeKey {
            key: key.to_string(),
            colleges: colleges.to_vec(),
        });
    }

    let mut namesakes: BTreeMap<(String, String), Vec<CollegeId>> = BTreeMap::new();
    for college in index.iter() {
        let name = index.normalized_name(&college.id);
        if name.is_empty() {
            continue;
        }
        let Some(state) = index.college_state(&college.id) else {
            continue;
        };
        namesakes
            .entry((state.to_string(), name.to_string()))
            .or_default()
            .push(college.id.clone());
    }
    for ((state, name), colleges) in namesakes {
        if colleges.len() < 2 {
            continue;
        }
        let keys: BTreeSet<Option<&str>> = colleges
            .iter()
            .filter_map(|id| index.college(id))
            .map(|college| college.composite_key.as_deref())
            .collect();
        // A single shared key is the duplicate-key case reported above.
        if keys.len() > 1 {
            findings.push(IntegrityFinding::NamesakeColleges { state, name, colleges });
        }
    }

    for finding in &findings {
        tracing::warn!("[{INTEGRITY_ERROR}] {finding}");
    }

    ValidationSummary {
        findings,
        demoted: demoted.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use seatlink_core::config::LinkConfig;
    use seatlink_core::types::{MasterCollege, MatchMethod, MatchOutcome, Stream};

    use super::*;

    fn index() -> RegistryIndex {
        RegistryIndex::build(
            vec![
                MasterCollege::new(
                    "KL-01",
                    "GOVT MEDICAL COLLEGE",
                    "KOZHIKODE",
                    "KERALA",
                    Stream::Medical,
                ),
                MasterCollege::new(
                    "OD-01",
                    "SCB MEDICAL COLLEGE",
                    "CUTTACK",
                    "ODISHA",
                    Stream::Medical,
                ),
            ],
            Vec::new(),
            Vec::new(),
            &LinkConfig::default(),
        )
        .unwrap()
    }

    fn accepted(record_id: i64, college: &str, state: &str) -> MatchResult {
        MatchResult::from_outcome(
            record_id,
            state.to_string(),
            MatchOutcome::Matched {
                college_id: CollegeId::new(college),
                confidence: 1.0,
                method: MatchMethod::ExactKey,
            },
            Vec::new(),
        )
    }

    #[test]
    fn clean_batch_has_no_findings() {
        let idx = index();
        let results = vec![accepted(1, "KL-01", "KERALA"), accepted(2, "OD-01", "ODISHA")];
        let summary = validate_batch(&results, &idx);
        assert!(summary.is_clean());
        assert!(summary.demoted.is_empty());
    }

    #[test]
    fn unknown_college_is_found_and_demoted() {
        let idx = index();
        let results = vec![accepted(1, "XX-99", "KERALA")];
        let summary = validate_batch(&results, &idx);
        assert_eq!(summary.demoted, vec![1]);
        assert!(matches!(
            summary.findings[0],
            IntegrityFinding::MissingCollege { seat_record_id: 1, .. }
        ));
    }

    #[test]
    fn state_mismatch_is_found_and_demoted() {
        let idx = index();
        // A result claiming a Kerala record matched an Odisha college.
        let results = vec![accepted(7, "OD-01", "KERALA")];
        let summary = validate_batch(&results, &idx);
        assert_eq!(summary.demoted, vec![7]);
        assert!(matches!(
            summary.findings[0],
            IntegrityFinding::StateMismatch { ref college_state, .. }
                if college_state == "ODISHA"
        ));
    }

    #[test]
    fn cross_state_links_reported_once_per_college() {
        let idx = index();
        let results = vec![
            accepted(1, "KL-01", "KERALA"),
            accepted(2, "KL-01", "ODISHA"),
        ];
        let summary = validate_batch(&results, &idx);
        // Record 2 carries the mismatch; the college-level conflict is
        // reported separately for registry repair.
        assert_eq!(summary.demoted, vec![2]);
        assert!(summary.findings.iter().any(|finding| matches!(
            finding,
            IntegrityFinding::CrossStateLinks { states, .. } if states.len() == 2
        )));
    }

    #[test]
    fn duplicate_registry_keys_surface_as_findings() {
        let idx = RegistryIndex::build(
            vec![
                MasterCollege::new("A1", "AREA HOSPITAL", "ADONI", "ANDHRA PRADESH", Stream::Medical),
                MasterCollege::new("A2", "AREA HOSPITAL", "ADONI", "ANDHRA PRADESH", Stream::Medical),
            ],
            Vec::new(),
            Vec::new(),
            &LinkConfig::default(),
        )
        .unwrap();
        let summary = validate_batch(&[], &idx);
        // Identical addresses are one defect, the shared key; the group is
        // not reported a second time as namesakes.
        assert_eq!(summary.findings.len(), 1);
        assert!(matches!(
            summary.findings[0],
            IntegrityFinding::DuplicateCompositeKey { ref colleges, .. }
                if colleges.len() == 2
        ));
        assert!(summary.demoted.is_empty());
    }

    #[test]
    fn same_name_same_state_different_addresses_flagged_as_namesakes() {
        let idx = RegistryIndex::build(
            vec![
                MasterCollege::new(
                    "A1",
                    "AREA HOSPITAL",
                    "SRI KALAHASTHI",
                    "ANDHRA PRADESH",
                    Stream::Medical,
                ),
                MasterCollege::new(
                    "A2",
                    "AREA HOSPITAL",
                    "VICTORIAPET, ADONI",
                    "ANDHRA PRADESH",
                    Stream::Medical,
                ),
                MasterCollege::new(
                    "A3",
                    "SVIMS",
                    "TIRUPATI",
                    "ANDHRA PRADESH",
                    Stream::Medical,
                ),
            ],
            Vec::new(),
            Vec::new(),
            &LinkConfig::default(),
        )
        .unwrap();
        let summary = validate_batch(&[], &idx);
        assert_eq!(summary.findings.len(), 1);
        assert!(matches!(
            summary.findings[0],
            IntegrityFinding::NamesakeColleges { ref state, ref name, ref colleges }
                if state == "ANDHRA PRADESH"
                    && name == "AREA HOSPITAL"
                    && colleges.len() == 2
        ));
        assert!(summary.demoted.is_empty());
    }

    #[test]
    fn unmatched_rows_are_ignored() {
        let idx = index();
        let results = vec![MatchResult::from_outcome(
            9,
            "KERALA".to_string(),
            MatchOutcome::Unmatched,
            Vec::new(),
        )];
        assert!(validate_batch(&results, &idx).is_clean());
    }
}
