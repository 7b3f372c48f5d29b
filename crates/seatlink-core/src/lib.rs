//! Core types, shared normalization, configuration, and error taxonomy for
//! the seatlink resolution engine.
//!
//! Everything in this crate is pure: no I/O, no global state. The
//! [`normalize`] module is the single source of truth for name, address,
//! state, and composite-key canonicalization; both registry construction and
//! query-time matching go through it.

pub mod config;
pub mod errors;
pub mod normalize;
pub mod types;

pub use config::LinkConfig;
pub use errors::{BatchResult, LinkErrorCode, PipelineError};
pub use types::{
    CollegeId, CourseLevel, MasterCollege, MasterCourse, MatchMethod, MatchOutcome,
    MatchResult, MatchStatus, SeatRecord, Stream, TierAttempt,
};
