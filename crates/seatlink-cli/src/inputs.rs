//! Adapter selection and input loading. The extension decides: `.db`,
//! `.sqlite`, and `.sqlite3` go through the SQLite store, everything else
//! is read as CSV.

use std::path::Path;

use seatlink_core::errors::{BatchResult, PipelineError};
use seatlink_core::types::SeatRecord;
use seatlink_engine::EmbeddingStore;
use seatlink_storage::{csv, EmbeddingRows, LinkStore, RegistryRows};

pub fn is_sqlite(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| {
            e.eq_ignore_ascii_case("db")
                || e.eq_ignore_ascii_case("sqlite")
                || e.eq_ignore_ascii_case("sqlite3")
        })
}

/// Registry-side inputs assembled from one or more sources.
pub struct RegistryInputs {
    pub rows: RegistryRows,
    pub embeddings: EmbeddingRows,
}

/// Loads the registry from a database or colleges CSV. The optional CSV
/// side files extend whatever the primary source provided.
pub fn load_registry(
    registry: &Path,
    courses: Option<&Path>,
    offerings: Option<&Path>,
    embeddings: Option<&Path>,
) -> Result<RegistryInputs, PipelineError> {
    let (mut rows, mut vectors) = if is_sqlite(registry) {
        let store = LinkStore::open(registry)?;
        (store.load_registry()?, store.load_embeddings()?)
    } else {
        let rows = RegistryRows {
            colleges: csv::read_colleges(registry)?,
            ..RegistryRows::default()
        };
        (rows, EmbeddingRows::default())
    };

    if let Some(path) = courses {
        rows.courses.extend(csv::read_courses(path)?);
    }
    if let Some(path) = offerings {
        rows.offerings.extend(csv::read_offerings(path)?);
    }
    if let Some(path) = embeddings {
        let extra = csv::read_embeddings(path)?;
        vectors.colleges.extend(extra.colleges);
        vectors.records.extend(extra.records);
    }

    Ok(RegistryInputs {
        rows,
        embeddings: vectors,
    })
}

pub fn load_records(path: &Path) -> Result<Vec<SeatRecord>, PipelineError> {
    if is_sqlite(path) {
        Ok(LinkStore::open(path)?.load_seat_records()?)
    } else {
        Ok(csv::read_seat_records(path)?)
    }
}

/// Moves loaded vectors into the engine's store, which enforces a single
/// dimension across all of them. A mismatched vector is skipped and
/// collected, never fatal: the record just loses one tier.
pub fn build_embedding_store(rows: EmbeddingRows) -> BatchResult<EmbeddingStore> {
    let mut out = BatchResult::new(EmbeddingStore::default());
    for (id, vector) in rows.colleges {
        if let Err(e) = out.data.insert_college(id.clone(), vector) {
            tracing::warn!(college = %id, "embedding skipped: {e}");
            out.add_error(e.into());
        }
    }
    for (record_id, vector) in rows.records {
        if let Err(e) = out.data.insert_record(record_id, vector) {
            tracing::warn!(record = record_id, "embedding skipped: {e}");
            out.add_error(e.into());
        }
    }
    out
}
