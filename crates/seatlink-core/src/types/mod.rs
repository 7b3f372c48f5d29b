//! Data model for a resolution run.
//!
//! Master entities are read-only reference data once a run starts; seat
//! records are the per-batch input; match results are the only thing the
//! engine writes.

pub mod master;
pub mod outcome;
pub mod seat;

pub use master::{CollegeId, CourseLevel, MasterCollege, MasterCourse, Stream};
pub use outcome::{
    MatchMethod, MatchOutcome, MatchResult, MatchStatus, TierAttempt, TierVerdict,
};
pub use seat::SeatRecord;
