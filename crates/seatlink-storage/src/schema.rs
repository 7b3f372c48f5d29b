//! Schema creation. One fixed schema, created idempotently on open.

use rusqlite::Connection;
use seatlink_core::errors::StorageError;

use crate::sql_err;

/// Create every table and index the store uses.
pub fn create_all(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "
        -- Master registry
        CREATE TABLE IF NOT EXISTS master_colleges (
            id      TEXT PRIMARY KEY,
            name    TEXT NOT NULL,
            address TEXT NOT NULL DEFAULT '',
            state   TEXT NOT NULL,
            stream  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_colleges_state ON master_colleges(state);

        CREATE TABLE IF NOT EXISTS master_courses (
            id     TEXT PRIMARY KEY,
            name   TEXT NOT NULL,
            stream TEXT NOT NULL,
            level  TEXT NOT NULL
        );

        -- Which canonical courses a college is known to run
        CREATE TABLE IF NOT EXISTS college_courses (
            college_id  TEXT NOT NULL,
            course_name TEXT NOT NULL,
            PRIMARY KEY (college_id, course_name),
            FOREIGN KEY (college_id) REFERENCES master_colleges(id)
        );

        -- Raw allotment rows as delivered by the upstream ETL
        CREATE TABLE IF NOT EXISTS seat_records (
            id           INTEGER PRIMARY KEY,
            college_name TEXT NOT NULL,
            address      TEXT NOT NULL DEFAULT '',
            state        TEXT NOT NULL DEFAULT '',
            course       TEXT NOT NULL DEFAULT '',
            category     TEXT NOT NULL DEFAULT '',
            quota        TEXT NOT NULL DEFAULT '',
            round        INTEGER,
            year         INTEGER,
            rank         INTEGER
        );

        -- One row per resolved seat record; candidates and trace are JSON
        CREATE TABLE IF NOT EXISTS match_results (
            seat_record_id   INTEGER PRIMARY KEY,
            college_id       TEXT,
            confidence       REAL NOT NULL,
            method           TEXT,
            state_normalized TEXT NOT NULL,
            status           TEXT NOT NULL,
            candidates       TEXT NOT NULL DEFAULT '[]',
            trace            TEXT NOT NULL DEFAULT '[]'
        );

        CREATE INDEX IF NOT EXISTS idx_results_status ON match_results(status);

        -- Precomputed name vectors; kind is 'college' or 'record'
        CREATE TABLE IF NOT EXISTS embeddings (
            kind       TEXT NOT NULL,
            key        TEXT NOT NULL,
            dimensions INTEGER NOT NULL,
            vector     BLOB NOT NULL,
            PRIMARY KEY (kind, key)
        );
        ",
    )
    .map_err(sql_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection;

    #[test]
    fn schema_creation_is_idempotent() {
        let conn = connection::open_in_memory().unwrap();
        create_all(&conn).unwrap();
        create_all(&conn).unwrap();
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN
                 ('master_colleges', 'master_courses', 'college_courses',
                  'seat_records', 'match_results', 'embeddings')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 6);
    }
}
