//! Tier 3: order-insensitive token overlap.

use seatlink_core::types::MatchMethod;

use crate::similarity;

use super::{judge_scores, MatchTier, TierInput, TierOutcome};

/// Overlap ratio over name token sets, for reordered and partial names
/// ("MEDICAL COLLEGE TRIVANDRUM" vs "TRIVANDRUM MEDICAL COLLEGE") that
/// depress a positional ratio. Subset names score 1.0 here, so several
/// same-prefix candidates collapse into a tie rather than a pick.
pub struct TokenSetTier;

impl MatchTier for TokenSetTier {
    fn method(&self) -> MatchMethod {
        MatchMethod::TokenSet
    }

    fn evaluate(&self, input: &TierInput<'_>) -> TierOutcome {
        if input.ctx.name_tokens.is_empty() {
            return TierOutcome::Skip;
        }
        let scores: Vec<_> = input
            .candidates
            .iter()
            .filter_map(|college| {
                let tokens = input.index.name_tokens(&college.id)?;
                Some((
                    college.id.clone(),
                    similarity::token_overlap(&input.ctx.name_tokens, tokens),
                ))
            })
            .collect();
        judge_scores(
            scores,
            input.thresholds.token_set_accept,
            input.thresholds.fuzzy_margin,
            input.thresholds.tie_epsilon,
        )
    }
}
