//! Tier 4: cosine similarity over precomputed name embeddings.

use seatlink_core::types::MatchMethod;

use crate::similarity;

use super::{judge_scores, MatchTier, TierInput, TierOutcome};

/// Semantic fallback for names that share meaning but few characters.
/// Vectors are computed offline and loaded with the registry; the tier
/// skips whenever the record or every candidate lacks one.
pub struct EmbeddingTier;

impl MatchTier for EmbeddingTier {
    fn method(&self) -> MatchMethod {
        MatchMethod::Embedding
    }

    fn evaluate(&self, input: &TierInput<'_>) -> TierOutcome {
        let Some(record_vector) = input.embeddings.record_vector(input.ctx.record.id) else {
            return TierOutcome::Skip;
        };
        let scores: Vec<_> = input
            .candidates
            .iter()
            .filter_map(|college| {
                let college_vector = input.embeddings.college_vector(&college.id)?;
                let score = similarity::cosine(record_vector, college_vector)?;
                Some((college.id.clone(), score))
            })
            .collect();
        if scores.is_empty() {
            return TierOutcome::Skip;
        }
        judge_scores(
            scores,
            input.thresholds.embedding_floor,
            0.0,
            input.thresholds.tie_epsilon,
        )
    }
}
