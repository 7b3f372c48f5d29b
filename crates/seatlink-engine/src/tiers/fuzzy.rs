//! Tier 2: string-similarity ratio on normalized names.

use seatlink_core::types::MatchMethod;
use strsim::jaro_winkler;

use super::{judge_scores, MatchTier, TierInput, TierOutcome};

/// Jaro-Winkler ratio between the record's normalized name and each
/// candidate's. Accepts only a clear winner: best at or over
/// `fuzzy_accept` and ahead of the runner-up by at least `fuzzy_margin`.
pub struct FuzzyNameTier;

impl MatchTier for FuzzyNameTier {
    fn method(&self) -> MatchMethod {
        MatchMethod::FuzzyName
    }

    fn evaluate(&self, input: &TierInput<'_>) -> TierOutcome {
        let scores: Vec<_> = input
            .candidates
            .iter()
            .map(|college| {
                let name = input.index.normalized_name(&college.id);
                (college.id.clone(), jaro_winkler(&input.ctx.name, name))
            })
            .collect();
        judge_scores(
            scores,
            input.thresholds.fuzzy_accept,
            input.thresholds.fuzzy_margin,
            input.thresholds.tie_epsilon,
        )
    }
}

#[cfg(test)]
mod tests {
    use seatlink_core::types::{SeatRecord, Stream, TierVerdict};

    use crate::test_support::TierFixture;

    use super::*;

    #[test]
    fn misspelled_name_clears_threshold() {
        let fixture = TierFixture::new(vec![
            ("C1", "KURNOOL MEDICAL COLLEGE", "KURNOOL", "ANDHRA PRADESH", Stream::Medical),
            ("C2", "GUNTUR MEDICAL COLLEGE", "GUNTUR", "ANDHRA PRADESH", Stream::Medical),
        ]);
        let record =
            SeatRecord::new(1, "KURNOOL MEDICAL COLEGE", "KURNOOL", "ANDHRA PRADESH", "MBBS");
        match fixture.evaluate(&FuzzyNameTier, &record) {
            TierOutcome::Accept { college_id, score } => {
                assert_eq!(college_id.as_str(), "C1");
                assert!(score >= 0.85, "score {score}");
            }
            other => panic!("expected accept, got {other:?}"),
        }
    }

    #[test]
    fn unrelated_name_falls_below_threshold() {
        let fixture = TierFixture::new(vec![(
            "C1",
            "KURNOOL MEDICAL COLLEGE",
            "KURNOOL",
            "ANDHRA PRADESH",
            Stream::Medical,
        )]);
        let record = SeatRecord::new(2, "ZZQ XV W", "NOWHERE", "ANDHRA PRADESH", "MBBS");
        match fixture.evaluate(&FuzzyNameTier, &record) {
            TierOutcome::Reject { verdict: TierVerdict::BelowThreshold, best_score } => {
                assert!(best_score.unwrap() < 0.85);
            }
            other => panic!("expected below-threshold reject, got {other:?}"),
        }
    }

    #[test]
    fn lookalike_runner_up_blocks_acceptance() {
        // Names that differ by one trailing token score close together;
        // the margin rule refuses to pick between them.
        let fixture = TierFixture::new(vec![
            ("C1", "GOVERNMENT MEDICAL COLLEGE NIZAMABAD", "NIZAMABAD", "TELANGANA", Stream::Medical),
            ("C2", "GOVERNMENT MEDICAL COLLEGE NALGONDA", "NALGONDA", "TELANGANA", Stream::Medical),
        ]);
        let record = SeatRecord::new(
            3,
            "GOVERNMENT MEDICAL COLLEGE NIZAMBAD",
            "NIZAMABAD",
            "TELANGANA",
            "MBBS",
        );
        match fixture.evaluate(&FuzzyNameTier, &record) {
            TierOutcome::Accept { college_id, .. } => {
                // If the typo still separates clearly, the right one wins.
                assert_eq!(college_id.as_str(), "C1");
            }
            TierOutcome::Reject { verdict, .. } => {
                assert_eq!(verdict, TierVerdict::MarginTooNarrow);
            }
            TierOutcome::Tie { candidates, .. } => {
                assert_eq!(candidates[0].as_str(), "C1");
            }
            TierOutcome::Skip => panic!("fuzzy tier never skips"),
        }
    }
}
