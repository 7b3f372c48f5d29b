//! Precomputed embedding vectors, stored as little-endian f32 blobs with an
//! explicit dimension column so truncated blobs are caught on load.

use rusqlite::{params, Connection};
use seatlink_core::errors::StorageError;
use seatlink_core::types::CollegeId;

use crate::sql_err;
use crate::store::EmbeddingRows;

pub const KIND_COLLEGE: &str = "college";
pub const KIND_RECORD: &str = "record";

fn f32s_to_bytes(vector: &[f32]) -> Vec<u8> {
    vector.iter().flat_map(|f| f.to_le_bytes()).collect()
}

fn bytes_to_f32s(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

pub fn upsert_embedding(
    conn: &Connection,
    kind: &str,
    key: &str,
    vector: &[f32],
) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO embeddings (kind, key, dimensions, vector)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(kind, key) DO UPDATE SET
             dimensions = excluded.dimensions,
             vector = excluded.vector",
        params![kind, key, vector.len() as i64, f32s_to_bytes(vector)],
    )
    .map_err(sql_err)?;
    Ok(())
}

pub fn load_embeddings(conn: &Connection) -> Result<EmbeddingRows, StorageError> {
    let mut stmt = conn
        .prepare("SELECT kind, key, dimensions, vector FROM embeddings ORDER BY kind, key")
        .map_err(sql_err)?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, Vec<u8>>(3)?,
            ))
        })
        .map_err(sql_err)?;

    let mut out = EmbeddingRows::default();
    for row in rows {
        let (kind, key, dimensions, blob) = row.map_err(sql_err)?;
        let dimensions = usize::try_from(dimensions).unwrap_or(0);
        if blob.len() != dimensions * 4 {
            return Err(StorageError::EmbeddingDimension {
                expected: dimensions,
                got: blob.len() / 4,
            });
        }
        let vector = bytes_to_f32s(&blob);
        match kind.as_str() {
            KIND_COLLEGE => out.colleges.push((CollegeId::new(key), vector)),
            KIND_RECORD => {
                let id = key.parse::<i64>().map_err(|_| StorageError::InvalidRow {
                    table: "embeddings".into(),
                    message: format!("record key '{key}' is not an integer"),
                })?;
                out.records.push((id, vector));
            }
            other => {
                return Err(StorageError::InvalidRow {
                    table: "embeddings".into(),
                    message: format!("unknown kind '{other}'"),
                })
            }
        }
    }
    Ok(out)
}
