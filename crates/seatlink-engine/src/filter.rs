//! Hierarchical candidate filter: state, then stream, then course.

use seatlink_core::normalize;
use seatlink_core::types::{CollegeId, MasterCollege};

use crate::context::RecordContext;
use crate::registry::RegistryIndex;

/// Narrows the registry to the colleges a record may legally match.
///
/// Stages run in strict order, each consuming only the previous stage's
/// output, so the candidate count never increases. Stage one failing means
/// an immediate empty set; there is no cross-state or all-India fallback,
/// which is the single most load-bearing false-match guard in the system.
#[derive(Debug, Clone)]
pub struct CandidateFilter {
    candidate_cap: usize,
}

impl CandidateFilter {
    pub fn new(candidate_cap: usize) -> Self {
        Self { candidate_cap }
    }

    /// Candidate colleges for a record, in college-id order.
    pub fn candidates<'i>(
        &self,
        ctx: &RecordContext<'_>,
        index: &'i RegistryIndex,
    ) -> Vec<&'i MasterCollege> {
        // Stage 1: same canonical state only.
        let state_ids = index.colleges_in_state(&ctx.state);
        if state_ids.is_empty() {
            tracing::debug!(
                record = ctx.record.id,
                state = %ctx.state,
                "no registry college in state; fast fail"
            );
            return Vec::new();
        }

        // Stage 2: streams the course is eligible for. Per-stream id lists
        // are sorted and a college has exactly one stream, so chaining them
        // in stream order then sorting keeps the output deterministic.
        let mut ids: Vec<&CollegeId> = ctx
            .eligible_streams
            .iter()
            .flat_map(|stream| index.colleges_in_state_stream(&ctx.state, *stream))
            .collect();
        ids.sort();
        ids.dedup();

        // Stage 3: course catalogue, when loaded. A college with no
        // catalogue rows is unknown, not ruled out.
        if index.has_offerings() && !ctx.record.raw_course.trim().is_empty() {
            let course = normalize::canonicalize(&ctx.record.raw_course);
            ids.retain(|id| match index.offerings(id) {
                Some(offered) => offered.contains(&course),
                None => true,
            });
        }

        // Cap stage: deterministic truncation, never silent.
        if ids.len() > self.candidate_cap {
            tracing::warn!(
                record = ctx.record.id,
                state = %ctx.state,
                candidates = ids.len(),
                cap = self.candidate_cap,
                "candidate set over cap; truncating at sorted id order"
            );
            ids.truncate(self.candidate_cap);
        }

        ids.into_iter().filter_map(|id| index.college(id)).collect()
    }
}
