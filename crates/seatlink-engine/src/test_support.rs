//! Small registry fixtures shared by tier and cascade tests.

use seatlink_core::config::LinkConfig;
use seatlink_core::types::{MasterCollege, MatchOutcome, SeatRecord, Stream, TierAttempt};

use crate::cascade::CascadeMatcher;
use crate::context::RecordContext;
use crate::disambiguate::GenericRules;
use crate::registry::{EmbeddingStore, RegistryIndex};
use crate::tiers::{MatchTier, TierInput, TierOutcome};

/// A registry index plus everything needed to run one tier or the whole
/// cascade against it. Candidates are always the full fixture registry;
/// filter behavior has its own tests.
pub(crate) struct TierFixture {
    pub index: RegistryIndex,
    pub embeddings: EmbeddingStore,
    pub config: LinkConfig,
}

impl TierFixture {
    /// `(id, name, address, state, stream)` rows.
    pub fn new(colleges: Vec<(&str, &str, &str, &str, Stream)>) -> Self {
        let colleges = colleges
            .into_iter()
            .map(|(id, name, address, state, stream)| {
                MasterCollege::new(id, name, address, state, stream)
            })
            .collect();
        let config = LinkConfig::default();
        let index = RegistryIndex::build(colleges, Vec::new(), Vec::new(), &config).unwrap();
        Self { index, embeddings: EmbeddingStore::default(), config }
    }

    pub fn evaluate(&self, tier: &dyn MatchTier, record: &SeatRecord) -> TierOutcome {
        let rules = self.config.courses.resolve();
        let ctx = RecordContext::build(record, &self.index, &rules);
        let candidates: Vec<&MasterCollege> = self.index.iter().collect();
        let thresholds = self.config.matching.effective();
        tier.evaluate(&TierInput {
            ctx: &ctx,
            candidates: &candidates,
            index: &self.index,
            embeddings: &self.embeddings,
            thresholds: &thresholds,
        })
    }

    pub fn resolve(
        &self,
        config: &LinkConfig,
        record: &SeatRecord,
    ) -> (MatchOutcome, Vec<TierAttempt>) {
        let rules = config.courses.resolve();
        let ctx = RecordContext::build(record, &self.index, &rules);
        let candidates: Vec<&MasterCollege> = self.index.iter().collect();
        let matcher = CascadeMatcher::new(
            GenericRules::from_config(&config.generic),
            config.matching.effective(),
        );
        matcher.resolve(&ctx, &candidates, &self.index, &self.embeddings)
    }
}
