//! The SQLite store: one connection, one schema, typed save/load methods.

use std::path::Path;

use rusqlite::Connection;
use seatlink_core::errors::StorageError;
use seatlink_core::types::{CollegeId, MasterCollege, MasterCourse, MatchResult, SeatRecord};

use crate::queries::{embedding_ops, record_ops, registry_ops, result_ops};
use crate::{connection, schema, sql_err};

/// Registry tables in adapter-neutral form. Offerings pair a college id with
/// a raw course name from that college's published list.
#[derive(Debug, Default)]
pub struct RegistryRows {
    pub colleges: Vec<MasterCollege>,
    pub courses: Vec<MasterCourse>,
    pub offerings: Vec<(CollegeId, String)>,
}

/// Optional embedding vectors, keyed by college id or seat record id.
#[derive(Debug, Default)]
pub struct EmbeddingRows {
    pub colleges: Vec<(CollegeId, Vec<f32>)>,
    pub records: Vec<(i64, Vec<f32>)>,
}

impl EmbeddingRows {
    pub fn is_empty(&self) -> bool {
        self.colleges.is_empty() && self.records.is_empty()
    }
}

/// Owns a single connection. Batches run one at a time, so there is no pool;
/// every save is a transaction and every load sees a committed snapshot.
pub struct LinkStore {
    conn: Connection,
}

impl LinkStore {
    /// Open (or create) a database file and ensure the schema exists.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let conn = connection::open(path)?;
        schema::create_all(&conn)?;
        tracing::debug!(path = %path.display(), "opened link store");
        Ok(Self { conn })
    }

    /// In-memory store for tests and dry runs.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = connection::open_in_memory()?;
        schema::create_all(&conn)?;
        Ok(Self { conn })
    }

    /// Colleges, courses, and offerings are all-or-nothing: a half-saved
    /// registry would pass integrity checks it should fail.
    pub fn save_registry(&self, rows: &RegistryRows) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction().map_err(sql_err)?;
        match save_registry_inner(&tx, rows) {
            Ok(()) => {
                tx.commit().map_err(sql_err)?;
                tracing::debug!(
                    colleges = rows.colleges.len(),
                    courses = rows.courses.len(),
                    offerings = rows.offerings.len(),
                    "registry saved"
                );
                Ok(())
            }
            Err(e) => {
                let _ = tx.rollback();
                Err(e)
            }
        }
    }

    pub fn save_seat_records(&self, records: &[SeatRecord]) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction().map_err(sql_err)?;
        match save_records_inner(&tx, records) {
            Ok(()) => tx.commit().map_err(sql_err),
            Err(e) => {
                let _ = tx.rollback();
                Err(e)
            }
        }
    }

    pub fn save_results(&self, results: &[MatchResult]) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction().map_err(sql_err)?;
        match save_results_inner(&tx, results) {
            Ok(()) => {
                tx.commit().map_err(sql_err)?;
                tracing::debug!(results = results.len(), "match results saved");
                Ok(())
            }
            Err(e) => {
                let _ = tx.rollback();
                Err(e)
            }
        }
    }

    pub fn save_embeddings(&self, rows: &EmbeddingRows) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction().map_err(sql_err)?;
        match save_embeddings_inner(&tx, rows) {
            Ok(()) => tx.commit().map_err(sql_err),
            Err(e) => {
                let _ = tx.rollback();
                Err(e)
            }
        }
    }

    pub fn load_registry(&self) -> Result<RegistryRows, StorageError> {
        Ok(RegistryRows {
            colleges: registry_ops::load_colleges(&self.conn)?,
            courses: registry_ops::load_courses(&self.conn)?,
            offerings: registry_ops::load_offerings(&self.conn)?,
        })
    }

    pub fn load_seat_records(&self) -> Result<Vec<SeatRecord>, StorageError> {
        record_ops::load_records(&self.conn)
    }

    /// Stored results in canonical state order, then record id.
    pub fn load_results(&self) -> Result<Vec<MatchResult>, StorageError> {
        result_ops::load_results(&self.conn)
    }

    pub fn load_embeddings(&self) -> Result<EmbeddingRows, StorageError> {
        embedding_ops::load_embeddings(&self.conn)
    }
}

fn save_registry_inner(conn: &Connection, rows: &RegistryRows) -> Result<(), StorageError> {
    for college in &rows.colleges {
        registry_ops::upsert_college(conn, college)?;
    }
    for course in &rows.courses {
        registry_ops::upsert_course(conn, course)?;
    }
    for (college_id, course_name) in &rows.offerings {
        registry_ops::insert_offering(conn, college_id, course_name)?;
    }
    Ok(())
}

fn save_records_inner(conn: &Connection, records: &[SeatRecord]) -> Result<(), StorageError> {
    for record in records {
        record_ops::upsert_record(conn, record)?;
    }
    Ok(())
}

fn save_results_inner(conn: &Connection, results: &[MatchResult]) -> Result<(), StorageError> {
    for result in results {
        result_ops::upsert_result(conn, result)?;
    }
    Ok(())
}

fn save_embeddings_inner(conn: &Connection, rows: &EmbeddingRows) -> Result<(), StorageError> {
    for (college_id, vector) in &rows.colleges {
        embedding_ops::upsert_embedding(
            conn,
            embedding_ops::KIND_COLLEGE,
            college_id.as_str(),
            vector,
        )?;
    }
    for (record_id, vector) in &rows.records {
        embedding_ops::upsert_embedding(
            conn,
            embedding_ops::KIND_RECORD,
            &record_id.to_string(),
            vector,
        )?;
    }
    Ok(())
}
