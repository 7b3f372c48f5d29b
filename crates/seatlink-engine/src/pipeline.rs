//! Batch pipeline: partition records by canonical state and resolve the
//! partitions independently.

use std::collections::BTreeMap;

use rayon::prelude::*;
use seatlink_core::config::{CourseRules, LinkConfig};
use seatlink_core::types::{MatchOutcome, MatchResult, SeatRecord};

use crate::cascade::CascadeMatcher;
use crate::context::RecordContext;
use crate::disambiguate::GenericRules;
use crate::filter::CandidateFilter;
use crate::registry::{EmbeddingStore, RegistryIndex};
use crate::stats::BatchStats;

/// Everything one batch run produces: the result rows and the aggregate
/// counters the report renders.
#[derive(Debug)]
pub struct RunOutput {
    pub results: Vec<MatchResult>,
    pub stats: BatchStats,
}

/// Resolves batches against a registry built once and shared read-only.
///
/// State isolation makes the state partition the parallelism unit: no
/// record is ever compared across partitions, so workers share nothing
/// mutable. Each partition fills its own buffers, and partitions merge in
/// canonical state order with input order kept inside a partition, which
/// makes two runs over the same input byte-identical regardless of the
/// `parallel` flag.
pub struct BatchRunner<'r> {
    index: &'r RegistryIndex,
    embeddings: &'r EmbeddingStore,
    config: &'r LinkConfig,
    matcher: CascadeMatcher,
    filter: CandidateFilter,
    course_rules: CourseRules,
}

impl<'r> BatchRunner<'r> {
    pub fn new(
        index: &'r RegistryIndex,
        embeddings: &'r EmbeddingStore,
        config: &'r LinkConfig,
    ) -> Self {
        Self {
            matcher: CascadeMatcher::new(
                GenericRules::from_config(&config.generic),
                config.matching.effective(),
            ),
            filter: CandidateFilter::new(config.runtime.effective_candidate_cap()),
            course_rules: config.courses.resolve(),
            index,
            embeddings,
            config,
        }
    }

    /// Resolve a whole batch. Results come back grouped by canonical
    /// state, input order preserved within each state.
    pub fn run(&self, records: &[SeatRecord]) -> RunOutput {
        let partitions = self.partition(records);
        tracing::info!(
            records = records.len(),
            partitions = partitions.len(),
            parallel = self.config.runtime.effective_parallel(),
            "resolving batch"
        );

        let resolved: Vec<(BatchStats, Vec<MatchResult>)> =
            if self.config.runtime.effective_parallel() {
                partitions
                    .par_iter()
                    .map(|(_, partition)| self.resolve_partition(partition))
                    .collect()
            } else {
                partitions
                    .iter()
                    .map(|(_, partition)| self.resolve_partition(partition))
                    .collect()
            };

        let mut stats = self.new_stats();
        let mut results = Vec::with_capacity(records.len());
        for (partition_stats, partition_results) in resolved {
            stats.merge(partition_stats);
            results.extend(partition_results);
        }
        tracing::info!(
            matched = stats.matched,
            unmatched = stats.unmatched,
            ambiguous = stats.ambiguous,
            match_rate = format!("{:.4}", stats.match_rate()),
            "batch resolved"
        );
        RunOutput { results, stats }
    }

    /// Groups records by canonical state. BTreeMap iteration fixes the
    /// partition order; pushing in input order fixes the order within.
    fn partition<'a>(
        &self,
        records: &'a [SeatRecord],
    ) -> Vec<(String, Vec<&'a SeatRecord>)> {
        let mut by_state: BTreeMap<String, Vec<&SeatRecord>> = BTreeMap::new();
        for record in records {
            let state = self.index.states().resolve(&record.raw_state);
            by_state.entry(state).or_default().push(record);
        }
        by_state.into_iter().collect()
    }

    fn resolve_partition(&self, records: &[&SeatRecord]) -> (BatchStats, Vec<MatchResult>) {
        let mut stats = self.new_stats();
        let mut results = Vec::with_capacity(records.len());
        for record in records {
            let (result, unmatchable) = self.resolve_record(record);
            stats.record(&result);
            if unmatchable {
                stats.note_unmatchable();
            }
            results.push(result);
        }
        (stats, results)
    }

    fn resolve_record(&self, record: &SeatRecord) -> (MatchResult, bool) {
        let ctx = RecordContext::build(record, self.index, &self.course_rules);
        if ctx.is_unmatchable() {
            tracing::debug!(record = record.id, "name normalized to empty; unmatchable");
            let result = MatchResult::from_outcome(
                record.id,
                ctx.state,
                MatchOutcome::Unmatched,
                Vec::new(),
            );
            return (result, true);
        }
        let candidates = self.filter.candidates(&ctx, self.index);
        let (outcome, trace) =
            self.matcher
                .resolve(&ctx, &candidates, self.index, self.embeddings);
        if let MatchOutcome::Ambiguous { candidates } = &outcome {
            if let Some(leader) = candidates.first() {
                tracing::info!(
                    record = record.id,
                    leader = %leader,
                    tied = candidates.len(),
                    "ambiguous; tie-break leader recorded for review ordering only"
                );
            }
        }
        let result = MatchResult::from_outcome(record.id, ctx.state, outcome, trace);
        (result, false)
    }

    fn new_stats(&self) -> BatchStats {
        BatchStats::new(
            self.config.report.effective_low_confidence_threshold(),
            self.config.report.effective_audit_sample_size(),
        )
    }
}
