//! Match result rows. Candidates and trace are stored as JSON text so an
//! AMBIGUOUS or UNMATCHED row stays reviewable without re-running the
//! cascade.

use rusqlite::{params, Connection};
use seatlink_core::errors::StorageError;
use seatlink_core::types::{CollegeId, MatchMethod, MatchResult, MatchStatus, TierAttempt};

use crate::sql_err;

fn bad_row(id: i64, what: &str, detail: impl std::fmt::Display) -> StorageError {
    StorageError::InvalidRow {
        table: "match_results".into(),
        message: format!("{what} for record {id}: {detail}"),
    }
}

pub fn upsert_result(conn: &Connection, result: &MatchResult) -> Result<(), StorageError> {
    let id = result.seat_record_id;
    let candidates =
        serde_json::to_string(&result.candidates).map_err(|e| bad_row(id, "candidates", e))?;
    let trace = serde_json::to_string(&result.trace).map_err(|e| bad_row(id, "trace", e))?;
    conn.execute(
        "INSERT INTO match_results (
            seat_record_id, college_id, confidence, method, state_normalized,
            status, candidates, trace
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT(seat_record_id) DO UPDATE SET
             college_id = excluded.college_id,
             confidence = excluded.confidence,
             method = excluded.method,
             state_normalized = excluded.state_normalized,
             status = excluded.status,
             candidates = excluded.candidates,
             trace = excluded.trace",
        params![
            id,
            result.college_id.as_ref().map(|c| c.as_str()),
            result.confidence,
            result.method.map(|m| m.name()),
            result.state_normalized,
            result.status.name(),
            candidates,
            trace,
        ],
    )
    .map_err(sql_err)?;
    Ok(())
}

/// Results ordered by canonical state, then record id. The original batch
/// interleaving is not stored, so re-renders use this stable order instead.
pub fn load_results(conn: &Connection) -> Result<Vec<MatchResult>, StorageError> {
    let mut stmt = conn
        .prepare(
            "SELECT seat_record_id, college_id, confidence, method, state_normalized,
                    status, candidates, trace
             FROM match_results ORDER BY state_normalized, seat_record_id",
        )
        .map_err(sql_err)?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
                row.get::<_, String>(7)?,
            ))
        })
        .map_err(sql_err)?;

    let mut results = Vec::new();
    for row in rows {
        let (id, college_id, confidence, method, state_normalized, status, candidates, trace) =
            row.map_err(sql_err)?;
        let status = MatchStatus::parse(&status)
            .ok_or_else(|| bad_row(id, "status", format!("unknown value '{status}'")))?;
        let method = match method {
            Some(raw) => Some(
                MatchMethod::parse(&raw)
                    .ok_or_else(|| bad_row(id, "method", format!("unknown value '{raw}'")))?,
            ),
            None => None,
        };
        let candidates: Vec<CollegeId> =
            serde_json::from_str(&candidates).map_err(|e| bad_row(id, "candidates", e))?;
        let trace: Vec<TierAttempt> =
            serde_json::from_str(&trace).map_err(|e| bad_row(id, "trace", e))?;
        results.push(MatchResult {
            seat_record_id: id,
            college_id: college_id.map(CollegeId::new),
            confidence,
            method,
            state_normalized,
            status,
            candidates,
            trace,
        });
    }
    Ok(results)
}
