//! Row-level operations, free functions over a connection.

pub mod embedding_ops;
pub mod record_ops;
pub mod registry_ops;
pub mod result_ops;
