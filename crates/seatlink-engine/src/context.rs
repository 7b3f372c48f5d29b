//! Per-record normalized view, built once before filtering and matching.

use std::collections::BTreeSet;

use seatlink_core::config::CourseRules;
use seatlink_core::normalize;
use seatlink_core::types::{CourseLevel, SeatRecord, Stream};
use smallvec::{smallvec, SmallVec};

use crate::registry::RegistryIndex;

/// One seat record with every derived form the filter and tiers need,
/// computed exactly once.
#[derive(Debug)]
pub struct RecordContext<'a> {
    pub record: &'a SeatRecord,
    /// Canonical state token, resolved through the shared alias table.
    pub state: String,
    /// Canonicalized college name. Empty means the record is unmatchable.
    pub name: String,
    pub name_tokens: BTreeSet<String>,
    /// Canonicalized address text.
    pub address: String,
    /// `None` for unmatchable records; the exact tier skips those.
    pub composite_key: Option<String>,
    /// Streams the record's course may legitimately appear under.
    pub eligible_streams: SmallVec<[Stream; 3]>,
}

impl<'a> RecordContext<'a> {
    pub fn build(
        record: &'a SeatRecord,
        index: &RegistryIndex,
        course_rules: &CourseRules,
    ) -> Self {
        let state = index.states().resolve(&record.raw_state);
        let name = normalize::canonicalize(&record.raw_college_name);
        let name_tokens = normalize::tokens(&record.raw_college_name);
        let address = normalize::canonicalize(&record.raw_address);
        let composite_key =
            normalize::build_composite_key(&record.raw_college_name, &record.raw_address);
        let eligible_streams = eligible_streams(record, index, course_rules);
        Self {
            record,
            state,
            name,
            name_tokens,
            address,
            composite_key,
            eligible_streams,
        }
    }

    /// A record whose name normalizes to empty can never be matched; it is
    /// reported UNMATCHED without running any tier.
    pub fn is_unmatchable(&self) -> bool {
        self.name.is_empty()
    }
}

/// Eligible streams for a record's course.
///
/// Explicit config rules win; a catalogue hit decides next; a name-based
/// inference is the fallback. Diploma courses widen to MEDICAL and DNB
/// unless the config narrows them, because guessing one stream for a
/// diploma is exactly how cross-stream false matches happen.
fn eligible_streams(
    record: &SeatRecord,
    index: &RegistryIndex,
    course_rules: &CourseRules,
) -> SmallVec<[Stream; 3]> {
    let configured = course_rules.eligible_streams(&record.raw_course);
    // The config resolves to a single inferred stream only when it had no
    // explicit rule; give the course catalogue a chance to refine that.
    if configured.len() == 1 {
        let canonical = normalize::canonicalize(&record.raw_course);
        if let Some((stream, level)) = index.course(&canonical) {
            if level == CourseLevel::Diploma {
                return smallvec![Stream::Medical, Stream::Dnb];
            }
            return smallvec![stream];
        }
    }
    configured
}
