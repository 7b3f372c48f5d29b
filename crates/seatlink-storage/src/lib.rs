//! Persistence for seatlink: a SQLite store for registry, records,
//! embeddings, and match results, plus CSV adapters for flat-file runs.
//!
//! The engine never sees this crate; both adapters produce the same
//! in-memory collections ([`RegistryRows`], [`EmbeddingRows`], plain
//! `Vec<SeatRecord>`) and consume plain `Vec<MatchResult>`.

pub mod connection;
pub mod csv;
pub mod schema;
pub mod store;

mod queries;

pub use store::{EmbeddingRows, LinkStore, RegistryRows};

use seatlink_core::errors::StorageError;

/// Maps a rusqlite error into the storage error taxonomy.
pub(crate) fn sql_err(e: rusqlite::Error) -> StorageError {
    StorageError::Sqlite { message: e.to_string() }
}
