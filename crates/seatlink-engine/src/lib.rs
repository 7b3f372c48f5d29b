//! Resolution engine: registry index, hierarchical candidate filter,
//! cascading match tiers, generic-name disambiguation, and the parallel
//! batch pipeline with validation and reporting.
//!
//! The flow per record: [`context::RecordContext`] normalizes the raw
//! fields once, [`filter::CandidateFilter`] narrows the registry to a
//! handful of same-state same-stream colleges, and
//! [`cascade::CascadeMatcher`] folds over the tier list until one accepts.
//! Nothing in the hot path mutates shared state; the registry index is
//! built once and only read afterwards.

pub mod cascade;
pub mod context;
pub mod disambiguate;
pub mod filter;
pub mod pipeline;
pub mod registry;
pub mod report;
pub mod similarity;
pub mod stats;
pub mod tiers;
pub mod validate;

#[cfg(test)]
mod test_support;

pub use cascade::CascadeMatcher;
pub use context::RecordContext;
pub use disambiguate::GenericRules;
pub use filter::CandidateFilter;
pub use pipeline::{BatchRunner, RunOutput};
pub use registry::{EmbeddingStore, RegistryIndex};
pub use report::{render_report, RunMeta};
pub use stats::BatchStats;
pub use validate::{validate_batch, IntegrityFinding, ValidationSummary};
