//! Aggregate statistics over one batch run.

use std::collections::BTreeMap;

use seatlink_core::types::{CollegeId, MatchMethod, MatchResult, MatchStatus};

/// Counters for one canonical state.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StateBreakdown {
    pub total: u64,
    pub matched: u64,
    pub unmatched: u64,
    pub ambiguous: u64,
}

impl StateBreakdown {
    pub fn match_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.matched as f64 / self.total as f64
        }
    }
}

/// An accepted match under the audit threshold, sampled for human review.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEntry {
    pub seat_record_id: i64,
    pub college_id: CollegeId,
    pub confidence: f64,
    pub method: MatchMethod,
}

/// Batch totals, built per partition and merged in canonical state order,
/// so the same input always produces the same numbers and the same audit
/// sample.
#[derive(Debug, Clone)]
pub struct BatchStats {
    pub total: u64,
    pub matched: u64,
    pub unmatched: u64,
    pub ambiguous: u64,
    /// Records whose name normalized to empty; a subset of `unmatched`.
    pub unmatchable: u64,
    pub by_method: BTreeMap<&'static str, u64>,
    pub by_state: BTreeMap<String, StateBreakdown>,
    /// First N accepts under the threshold, in (state, input) order.
    pub low_confidence: Vec<AuditEntry>,
    low_confidence_threshold: f64,
    audit_sample_size: usize,
}

impl BatchStats {
    pub fn new(low_confidence_threshold: f64, audit_sample_size: usize) -> Self {
        Self {
            total: 0,
            matched: 0,
            unmatched: 0,
            ambiguous: 0,
            unmatchable: 0,
            by_method: BTreeMap::new(),
            by_state: BTreeMap::new(),
            low_confidence: Vec::new(),
            low_confidence_threshold,
            audit_sample_size,
        }
    }

    pub fn record(&mut self, result: &MatchResult) {
        self.total += 1;
        let breakdown = self
            .by_state
            .entry(result.state_normalized.clone())
            .or_default();
        breakdown.total += 1;
        match result.status {
            MatchStatus::Matched => {
                self.matched += 1;
                breakdown.matched += 1;
                if let Some(method) = result.method {
                    *self.by_method.entry(method.name()).or_insert(0) += 1;
                }
                if result.confidence < self.low_confidence_threshold
                    && self.low_confidence.len() < self.audit_sample_size
                {
                    if let (Some(college_id), Some(method)) =
                        (&result.college_id, result.method)
                    {
                        self.low_confidence.push(AuditEntry {
                            seat_record_id: result.seat_record_id,
                            college_id: college_id.clone(),
                            confidence: result.confidence,
                            method,
                        });
                    }
                }
            }
            MatchStatus::Unmatched => {
                self.unmatched += 1;
                breakdown.unmatched += 1;
            }
            MatchStatus::Ambiguous => {
                self.ambiguous += 1;
                breakdown.ambiguous += 1;
            }
        }
    }

    /// Marks the most recently recorded result as unmatchable input.
    pub fn note_unmatchable(&mut self) {
        self.unmatchable += 1;
    }

    /// Folds a partition's counters into the batch totals. Callers merge
    /// partitions in canonical state order to keep the audit sample
    /// deterministic.
    pub fn merge(&mut self, other: BatchStats) {
        self.total += other.total;
        self.matched += other.matched;
        self.unmatched += other.unmatched;
        self.ambiguous += other.ambiguous;
        self.unmatchable += other.unmatchable;
        for (method, count) in other.by_method {
            *self.by_method.entry(method).or_insert(0) += count;
        }
        for (state, breakdown) in other.by_state {
            let entry = self.by_state.entry(state).or_default();
            entry.total += breakdown.total;
            entry.matched += breakdown.matched;
            entry.unmatched += breakdown.unmatched;
            entry.ambiguous += breakdown.ambiguous;
        }
        self.low_confidence.extend(other.low_confidence);
        self.low_confidence.truncate(self.audit_sample_size);
    }

    pub fn match_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.matched as f64 / self.total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use seatlink_core::types::MatchOutcome;

    use super::*;

    fn matched(id: i64, state: &str, confidence: f64) -> MatchResult {
        MatchResult::from_outcome(
            id,
            state.to_string(),
            MatchOutcome::Matched {
                college_id: CollegeId::new(format!("C{id}")),
                confidence,
                method: MatchMethod::FuzzyName,
            },
            Vec::new(),
        )
    }

    fn unmatched(id: i64, state: &str) -> MatchResult {
        MatchResult::from_outcome(id, state.to_string(), MatchOutcome::Unmatched, Vec::new())
    }

    #[test]
    fn counts_split_by_status_and_state() {
        let mut stats = BatchStats::new(0.90, 25);
        stats.record(&matched(1, "KERALA", 0.95));
        stats.record(&matched(2, "KERALA", 0.99));
        stats.record(&unmatched(3, "KERALA"));
        stats.record(&matched(4, "ODISHA", 0.97));
        assert_eq!(stats.total, 4);
        assert_eq!(stats.matched, 3);
        assert_eq!(stats.unmatched, 1);
        assert_eq!(stats.by_state["KERALA"].total, 3);
        assert_eq!(stats.by_state["KERALA"].unmatched, 1);
        assert!((stats.by_state["ODISHA"].match_rate() - 1.0).abs() < 1e-9);
        assert_eq!(stats.by_method["FUZZY_NAME"], 3);
    }

    #[test]
    fn audit_sample_keeps_low_confidence_accepts_up_to_cap() {
        let mut stats = BatchStats::new(0.90, 2);
        stats.record(&matched(1, "KERALA", 0.86));
        stats.record(&matched(2, "KERALA", 0.87));
        stats.record(&matched(3, "KERALA", 0.88));
        stats.record(&matched(4, "KERALA", 0.95));
        assert_eq!(stats.low_confidence.len(), 2);
        assert_eq!(stats.low_confidence[0].seat_record_id, 1);
        assert_eq!(stats.low_confidence[1].seat_record_id, 2);
    }

    #[test]
    fn merge_sums_partitions_in_order() {
        let mut left = BatchStats::new(0.90, 25);
        left.record(&matched(1, "KERALA", 0.86));
        left.record(&unmatched(2, "KERALA"));

        let mut right = BatchStats::new(0.90, 25);
        right.record(&matched(3, "ODISHA", 0.87));
        right.record(&matched(4, "ODISHA", 0.99));

        left.merge(right);
        assert_eq!(left.total, 4);
        assert_eq!(left.matched, 3);
        assert_eq!(left.by_state.len(), 2);
        assert_eq!(left.low_confidence.len(), 2);
        assert!((left.match_rate() - 0.75).abs() < 1e-9);
    }
}
