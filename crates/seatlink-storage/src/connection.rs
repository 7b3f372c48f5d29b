//! Connection setup: open plus the PRAGMA set every connection gets.

use std::path::Path;

use rusqlite::Connection;
use seatlink_core::errors::StorageError;

use crate::sql_err;

/// Open a file-backed database and apply pragmas.
pub fn open(path: &Path) -> Result<Connection, StorageError> {
    let conn = Connection::open(path).map_err(sql_err)?;
    apply_pragmas(&conn)?;
    Ok(conn)
}

/// Open an in-memory database, mainly for tests.
pub fn open_in_memory() -> Result<Connection, StorageError> {
    let conn = Connection::open_in_memory().map_err(sql_err)?;
    apply_pragmas(&conn)?;
    Ok(conn)
}

/// WAL mode, NORMAL sync, 5s busy_timeout, foreign_keys ON.
fn apply_pragmas(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        PRAGMA foreign_keys = ON;
        ",
    )
    .map_err(sql_err)
}
