//! Diploma and stream-overlap rules.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

use crate::normalize;
use crate::types::Stream;

/// Which streams a course may legitimately appear under.
///
/// Ordinary courses map to exactly one stream. Diploma courses are the
/// awkward case: some are DNB-only, some run under both MEDICAL and DNB
/// colleges, and an unlisted diploma is treated as overlapping rather than
/// guessed into one stream.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CourseRuleConfig {
    /// Diploma courses offered under DNB colleges only.
    pub dnb_only: Vec<String>,
    /// Diploma courses offered under both MEDICAL and DNB colleges.
    pub overlapping: Vec<String>,
}

impl CourseRuleConfig {
    /// Resolve the rule lists once for the per-record path.
    pub fn resolve(&self) -> CourseRules {
        CourseRules {
            dnb_only: canonical_set(&self.dnb_only),
            overlapping: canonical_set(&self.overlapping),
        }
    }
}

fn canonical_set(courses: &[String]) -> BTreeSet<String> {
    courses
        .iter()
        .map(|c| normalize::canonicalize(c))
        .filter(|c| !c.is_empty())
        .collect()
}

/// Resolved course rules, canonicalized once per run.
#[derive(Debug, Clone, Default)]
pub struct CourseRules {
    dnb_only: BTreeSet<String>,
    overlapping: BTreeSet<String>,
}

impl CourseRules {
    /// Streams eligible for the given raw course name.
    pub fn eligible_streams(&self, raw_course: &str) -> SmallVec<[Stream; 3]> {
        let course = normalize::canonicalize(raw_course);
        if self.dnb_only.contains(&course) {
            return smallvec![Stream::Dnb];
        }
        if self.overlapping.contains(&course) {
            return smallvec![Stream::Medical, Stream::Dnb];
        }
        // Unlisted diploma courses widen to both rather than guessing one.
        if course.contains("DIPLOMA") {
            return smallvec![Stream::Medical, Stream::Dnb];
        }
        smallvec![Stream::infer_from_course(raw_course)]
    }
}
