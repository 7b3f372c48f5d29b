//! Seat allotment record rows.

use rusqlite::{params, Connection};
use seatlink_core::errors::StorageError;
use seatlink_core::types::SeatRecord;

use crate::sql_err;

pub fn upsert_record(conn: &Connection, record: &SeatRecord) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO seat_records (
            id, college_name, address, state, course, category, quota, round, year, rank
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
         ON CONFLICT(id) DO UPDATE SET
             college_name = excluded.college_name,
             address = excluded.address,
             state = excluded.state,
             course = excluded.course,
             category = excluded.category,
             quota = excluded.quota,
             round = excluded.round,
             year = excluded.year,
             rank = excluded.rank",
        params![
            record.id,
            record.raw_college_name,
            record.raw_address,
            record.raw_state,
            record.raw_course,
            record.category,
            record.quota,
            record.round,
            record.year,
            record.rank,
        ],
    )
    .map_err(sql_err)?;
    Ok(())
}

pub fn load_records(conn: &Connection) -> Result<Vec<SeatRecord>, StorageError> {
    let mut stmt = conn
        .prepare(
            "SELECT id, college_name, address, state, course, category, quota,
                    round, year, rank
             FROM seat_records ORDER BY id",
        )
        .map_err(sql_err)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(SeatRecord {
                id: row.get(0)?,
                raw_college_name: row.get(1)?,
                raw_address: row.get(2)?,
                raw_state: row.get(3)?,
                raw_course: row.get(4)?,
                category: row.get(5)?,
                quota: row.get(6)?,
                round: row.get(7)?,
                year: row.get(8)?,
                rank: row.get(9)?,
            })
        })
        .map_err(sql_err)?;

    let mut records = Vec::new();
    for row in rows {
        records.push(row.map_err(sql_err)?);
    }
    Ok(records)
}
