//! Tier 1: exact composite-key equality.

use seatlink_core::types::MatchMethod;

use super::{judge_scores, MatchTier, TierInput, TierOutcome};

/// Composite-key equality against the candidate set.
///
/// The key folds the address in, so two same-name colleges in one state
/// still carry distinct keys. More than one key holder means the registry
/// itself holds duplicates; every holder scores 1.0 and the record
/// surfaces as a tie instead of landing on an arbitrary one.
pub struct ExactKeyTier;

impl MatchTier for ExactKeyTier {
    fn method(&self) -> MatchMethod {
        MatchMethod::ExactKey
    }

    fn evaluate(&self, input: &TierInput<'_>) -> TierOutcome {
        let Some(key) = input.ctx.composite_key.as_deref() else {
            return TierOutcome::Skip;
        };
        let scores: Vec<_> = input
            .candidates
            .iter()
            .filter(|college| college.composite_key.as_deref() == Some(key))
            .map(|college| (college.id.clone(), 1.0))
            .collect();
        judge_scores(scores, 1.0, 0.0, input.thresholds.tie_epsilon)
    }
}
