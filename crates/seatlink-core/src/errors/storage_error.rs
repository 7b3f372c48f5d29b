//! Storage adapter errors: SQLite and CSV.

use super::error_code::{self, LinkErrorCode};

/// Errors from the persistence and ingest adapters.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("sqlite error: {message}")]
    Sqlite { message: String },

    #[error("missing column {column} in {table}")]
    MissingColumn { table: String, column: String },

    #[error("invalid row in {table}: {message}")]
    InvalidRow { table: String, message: String },

    #[error("embedding dimension mismatch: expected {expected}, got {got}")]
    EmbeddingDimension { expected: usize, got: usize },

    #[error("csv error in {path}: {message}")]
    Csv { path: String, message: String },

    #[error("io error on {path}: {message}")]
    Io { path: String, message: String },
}

impl LinkErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        error_code::STORAGE_ERROR
    }
}
