//! The tier cascade: fold over an ordered tier list until one accepts,
//! routing ties and generic names through address disambiguation.

use seatlink_core::config::EffectiveThresholds;
use seatlink_core::types::{
    CollegeId, MasterCollege, MatchMethod, MatchOutcome, TierAttempt, TierVerdict,
};

use crate::context::RecordContext;
use crate::disambiguate::{self, GenericRules};
use crate::registry::{EmbeddingStore, RegistryIndex};
use crate::tiers::{self, MatchTier, TierInput, TierOutcome};

/// Resolves one record against its candidate set.
///
/// Tiers run in list order and the first accept wins; every attempt lands
/// in the trace so an UNMATCHED or AMBIGUOUS row is reviewable without a
/// re-run. A tie inside any tier goes to the disambiguator instead of
/// being resolved by pick order.
pub struct CascadeMatcher {
    tiers: Vec<Box<dyn MatchTier>>,
    generic: GenericRules,
    thresholds: EffectiveThresholds,
}

impl CascadeMatcher {
    pub fn new(generic: GenericRules, thresholds: EffectiveThresholds) -> Self {
        Self::with_tiers(tiers::default_tiers(), generic, thresholds)
    }

    /// Custom tier order, for tests and tuning runs.
    pub fn with_tiers(
        tiers: Vec<Box<dyn MatchTier>>,
        generic: GenericRules,
        thresholds: EffectiveThresholds,
    ) -> Self {
        Self { tiers, generic, thresholds }
    }

    pub fn resolve(
        &self,
        ctx: &RecordContext<'_>,
        candidates: &[&MasterCollege],
        index: &RegistryIndex,
        embeddings: &EmbeddingStore,
    ) -> (MatchOutcome, Vec<TierAttempt>) {
        let mut trace = Vec::with_capacity(self.tiers.len() + 1);
        if candidates.is_empty() {
            return (MatchOutcome::Unmatched, trace);
        }

        // Generic-name pre-check: a name like "AREA HOSPITAL" shared by
        // several candidates must not reach the fuzzy tiers, where the
        // highest-scoring namesake would win on noise. Location evidence
        // decides instead.
        if let Some(pattern) = self.generic.match_pattern(&ctx.name) {
            let namesakes: Vec<&MasterCollege> = candidates
                .iter()
                .copied()
                .filter(|college| {
                    self.generic.match_pattern(index.normalized_name(&college.id))
                        == Some(pattern)
                })
                .collect();
            if namesakes.len() > 1 {
                tracing::debug!(
                    record = ctx.record.id,
                    pattern,
                    namesakes = namesakes.len(),
                    "generic name; routing to address disambiguation"
                );
                let outcome = self.disambiguate(ctx, &namesakes, None, &mut trace);
                return (outcome, trace);
            }
        }

        for tier in &self.tiers {
            let input = TierInput {
                ctx,
                candidates,
                index,
                embeddings,
                thresholds: &self.thresholds,
            };
            match tier.evaluate(&input) {
                TierOutcome::Accept { college_id, score } => {
                    trace.push(TierAttempt::new(
                        tier.method(),
                        Some(score),
                        TierVerdict::Accepted,
                    ));
                    return (
                        MatchOutcome::Matched {
                            college_id,
                            confidence: score,
                            method: tier.method(),
                        },
                        trace,
                    );
                }
                TierOutcome::Tie { candidates: tied, score } => {
                    trace.push(TierAttempt::new(tier.method(), Some(score), TierVerdict::Tied));
                    let tied_colleges: Vec<&MasterCollege> = candidates
                        .iter()
                        .copied()
                        .filter(|college| tied.contains(&college.id))
                        .collect();
                    let outcome =
                        self.disambiguate(ctx, &tied_colleges, Some(score), &mut trace);
                    return (outcome, trace);
                }
                TierOutcome::Reject { best_score, verdict } => {
                    trace.push(TierAttempt::new(tier.method(), best_score, verdict));
                }
                TierOutcome::Skip => {
                    trace.push(TierAttempt::new(tier.method(), None, TierVerdict::Skipped));
                }
            }
        }
        (MatchOutcome::Unmatched, trace)
    }

    /// Address disambiguation over a pool the name could not separate.
    ///
    /// Exactly one survivor is a match; anything else stays ambiguous over
    /// the full pool. `pre_score` is the tying tier's score when the pool
    /// came from a tie; the configured disambiguation confidence stands in
    /// for it on the generic pre-check path, which never scored.
    fn disambiguate(
        &self,
        ctx: &RecordContext<'_>,
        pool: &[&MasterCollege],
        pre_score: Option<f64>,
        trace: &mut Vec<TierAttempt>,
    ) -> MatchOutcome {
        let survivors = disambiguate::by_address(&self.generic, ctx, pool);
        match survivors.as_slice() {
            [winner] => {
                let confidence =
                    pre_score.unwrap_or(self.thresholds.disambiguation_confidence);
                trace.push(TierAttempt::new(
                    MatchMethod::AddressDisambiguated,
                    Some(confidence),
                    TierVerdict::Accepted,
                ));
                MatchOutcome::Matched {
                    college_id: winner.id.clone(),
                    confidence,
                    method: MatchMethod::AddressDisambiguated,
                }
            }
            [] => {
                trace.push(TierAttempt::new(
                    MatchMethod::AddressDisambiguated,
                    None,
                    TierVerdict::NoSignal,
                ));
                MatchOutcome::Ambiguous { candidates: sorted_ids(pool) }
            }
            _ => {
                trace.push(TierAttempt::new(
                    MatchMethod::AddressDisambiguated,
                    pre_score,
                    TierVerdict::Tied,
                ));
                MatchOutcome::Ambiguous { candidates: sorted_ids(&survivors) }
            }
        }
    }
}

fn sorted_ids(colleges: &[&MasterCollege]) -> Vec<CollegeId> {
    let mut ids: Vec<CollegeId> = colleges.iter().map(|college| college.id.clone()).collect();
    ids.sort();
    ids
}

#[cfg(test)]
mod tests {
    use seatlink_core::config::LinkConfig;
    use seatlink_core::types::{MatchStatus, SeatRecord, Stream};

    use crate::test_support::TierFixture;

    use super::*;

    #[test]
    fn generic_name_with_location_evidence_disambiguates() {
        let fixture = TierFixture::new(vec![
            ("AP-01", "AREA HOSPITAL", "SRI KALAHASTHI", "ANDHRA PRADESH", Stream::Medical),
            ("AP-02", "AREA HOSPITAL", "VICTORIAPET, ADONI", "ANDHRA PRADESH", Stream::Medical),
        ]);
        let record = SeatRecord::new(
            1,
            "AREA HOSPITAL NEAR YSR STATUE VICTORIAPET ADONI",
            "NEAR YSR STATUE VICTORIAPET ADONI",
            "ANDHRA PRADESH",
            "MBBS",
        );
        let (outcome, trace) = fixture.resolve(&LinkConfig::default(), &record);
        match outcome {
            MatchOutcome::Matched { college_id, confidence, method } => {
                assert_eq!(college_id.as_str(), "AP-02");
                assert_eq!(method, MatchMethod::AddressDisambiguated);
                assert!((confidence - 0.90).abs() < 1e-9);
            }
            other => panic!("expected matched, got {other:?}"),
        }
        // The pre-check ran before any name tier: one trace entry.
        assert_eq!(trace.len(), 1);
        assert_eq!(trace[0].method, MatchMethod::AddressDisambiguated);
    }

    #[test]
    fn generic_name_without_evidence_stays_ambiguous() {
        let fixture = TierFixture::new(vec![
            ("AP-01", "AREA HOSPITAL", "SRI KALAHASTHI", "ANDHRA PRADESH", Stream::Medical),
            ("AP-02", "AREA HOSPITAL", "VICTORIAPET, ADONI", "ANDHRA PRADESH", Stream::Medical),
        ]);
        let record = SeatRecord::new(2, "AREA HOSPITAL", "", "ANDHRA PRADESH", "MBBS");
        let (outcome, _) = fixture.resolve(&LinkConfig::default(), &record);
        match outcome {
            MatchOutcome::Ambiguous { candidates } => {
                assert_eq!(candidates.len(), 2);
                assert_eq!(candidates[0].as_str(), "AP-01");
            }
            other => panic!("expected ambiguous, got {other:?}"),
        }
    }

    #[test]
    fn single_generic_candidate_flows_through_normal_tiers() {
        let fixture = TierFixture::new(vec![
            ("AP-01", "GOVERNMENT MEDICAL COLLEGE", "ANANTAPUR", "ANDHRA PRADESH", Stream::Medical),
            ("AP-02", "SVIMS", "TIRUPATI", "ANDHRA PRADESH", Stream::Medical),
        ]);
        let record = SeatRecord::new(
            3,
            "GOVERNMENT MEDICAL COLLEGE",
            "ANDHRA PRADESH",
            "ANDHRA PRADESH",
            "MBBS",
        );
        let (outcome, _) = fixture.resolve(&LinkConfig::default(), &record);
        match outcome {
            MatchOutcome::Matched { college_id, confidence, method } => {
                assert_eq!(college_id.as_str(), "AP-01");
                assert!(confidence >= 0.85);
                assert!(matches!(method, MatchMethod::ExactKey | MatchMethod::FuzzyName));
            }
            other => panic!("expected matched, got {other:?}"),
        }
    }

    #[test]
    fn near_threshold_tie_is_reported_ambiguous() {
        // Two lookalike names the fuzzy tier cannot separate inside the
        // tie epsilon, and no address evidence to break it.
        let fixture = TierFixture::new(vec![
            ("TG-01", "MAHATMA GANDHI MEMORIAL HOSPITAL WARANGAL", "WARANGAL", "TELANGANA", Stream::Medical),
            ("TG-02", "MAHATMA GANDHI MEMORIAL HOSPITAL WARANGUL", "WARANGUL", "TELANGANA", Stream::Medical),
        ]);
        let record = SeatRecord::new(
            4,
            "MAHATMA GANDHI MEMORIAL HOSPITAL WARANGAL",
            "",
            "TELANGANA",
            "MBBS",
        );
        let (outcome, trace) = fixture.resolve(&LinkConfig::default(), &record);
        // EXACT_KEY separates them when keys differ; with an empty record
        // address both keys miss and the fuzzy tie path must engage.
        match outcome {
            MatchOutcome::Ambiguous { candidates } => {
                assert_eq!(candidates.len(), 2);
            }
            MatchOutcome::Matched { method, .. } => {
                panic!("tie must not auto-accept via {method:?}");
            }
            MatchOutcome::Unmatched => panic!("tie must surface as ambiguous"),
        }
        assert!(trace
            .iter()
            .any(|attempt| attempt.verdict == TierVerdict::Tied));
    }

    #[test]
    fn empty_candidates_short_circuit_unmatched() {
        let fixture = TierFixture::new(vec![(
            "KL-01",
            "GOVT MEDICAL COLLEGE",
            "KOZHIKODE",
            "KERALA",
            Stream::Medical,
        )]);
        let record = SeatRecord::new(5, "ANY NAME", "ANY", "KERALA", "MBBS");
        let config = LinkConfig::default();
        let rules = config.courses.resolve();
        let ctx = crate::context::RecordContext::build(&record, &fixture.index, &rules);
        let matcher = CascadeMatcher::new(
            GenericRules::from_config(&config.generic),
            config.matching.effective(),
        );
        let (outcome, trace) =
            matcher.resolve(&ctx, &[], &fixture.index, &fixture.embeddings);
        assert_eq!(outcome.status(), MatchStatus::Unmatched);
        assert!(trace.is_empty());
    }
}
