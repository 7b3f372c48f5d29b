//! Matching tiers and the shared score adjudication rules.

use seatlink_core::config::EffectiveThresholds;
use seatlink_core::types::{CollegeId, MasterCollege, MatchMethod, TierVerdict};

use crate::context::RecordContext;
use crate::registry::{EmbeddingStore, RegistryIndex};

mod embedding;
mod exact;
mod fuzzy;
mod phonetic;
mod token_set;

pub use embedding::EmbeddingTier;
pub use exact::ExactKeyTier;
pub use fuzzy::FuzzyNameTier;
pub use phonetic::PhoneticTier;
pub use token_set::TokenSetTier;

/// Everything a tier may consult when scoring one record against its
/// candidate set.
pub struct TierInput<'a> {
    pub ctx: &'a RecordContext<'a>,
    pub candidates: &'a [&'a MasterCollege],
    pub index: &'a RegistryIndex,
    pub embeddings: &'a EmbeddingStore,
    pub thresholds: &'a EffectiveThresholds,
}

/// What one tier concluded about one record.
#[derive(Debug, Clone, PartialEq)]
pub enum TierOutcome {
    /// A single candidate cleared the tier's bar with enough margin.
    Accept { college_id: CollegeId, score: f64 },
    /// Two or more candidates are within epsilon of an acceptable best
    /// score. Ordered best first, then by id.
    Tie { candidates: Vec<CollegeId>, score: f64 },
    /// The tier ran and declined; the cascade moves on.
    Reject { best_score: Option<f64>, verdict: TierVerdict },
    /// The tier had nothing to work with (missing vectors, no phonetic
    /// agreement) and did not score at all.
    Skip,
}

/// One rung of the cascade. Tiers are cheap-first and independent; the
/// cascade stops at the first `Accept` or `Tie`.
pub trait MatchTier: Send + Sync {
    fn method(&self) -> MatchMethod;

    fn evaluate(&self, input: &TierInput<'_>) -> TierOutcome;
}

/// The production cascade, cheapest tier first.
pub fn default_tiers() -> Vec<Box<dyn MatchTier>> {
    vec![
        Box::new(ExactKeyTier),
        Box::new(FuzzyNameTier),
        Box::new(TokenSetTier),
        Box::new(EmbeddingTier),
        Box::new(PhoneticTier),
    ]
}

/// Turns a tier's raw candidate scores into a verdict.
///
/// Scores are ranked by score descending, id ascending, so equal inputs
/// always produce the same outcome. The rules, in order:
///
/// 1. near-acceptable tie: best is within `epsilon` of `accept` and the
///    runner-up is within `epsilon` of best. Surfaced as a tie rather
///    than a pick; a coin flip here is how wrong capacity numbers happen.
/// 2. best below `accept`: reject.
/// 3. runner-up closer than `margin`: reject. Distinguishes "confident"
///    from "barely ahead of a lookalike".
/// 4. otherwise accept the best candidate.
pub fn judge_scores(
    mut scores: Vec<(CollegeId, f64)>,
    accept: f64,
    margin: f64,
    epsilon: f64,
) -> TierOutcome {
    if scores.is_empty() {
        return TierOutcome::Reject { best_score: None, verdict: TierVerdict::NoSignal };
    }
    scores.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    let best = scores[0].1;

    if best >= accept - epsilon {
        let tied: Vec<CollegeId> = scores
            .iter()
            .take_while(|(_, score)| best - score <= epsilon)
            .map(|(id, _)| id.clone())
            .collect();
        if tied.len() > 1 {
            return TierOutcome::Tie { candidates: tied, score: best };
        }
    }

    if best < accept {
        return TierOutcome::Reject {
            best_score: Some(best),
            verdict: TierVerdict::BelowThreshold,
        };
    }
    if let Some((_, second)) = scores.get(1) {
        if best - second < margin {
            return TierOutcome::Reject {
                best_score: Some(best),
                verdict: TierVerdict::MarginTooNarrow,
            };
        }
    }
    TierOutcome::Accept { college_id: scores[0].0.clone(), score: best }
}
