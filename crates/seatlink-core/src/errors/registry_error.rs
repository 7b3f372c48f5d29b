//! Registry construction errors.
//!
//! Non-fatal registry defects found after construction (duplicate keys,
//! cross-state links) are validation findings, not errors; they live in the
//! engine's validation module.

use super::error_code::{self, LinkErrorCode};

/// Errors that prevent building a usable registry index.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("duplicate college id in registry: {id}")]
    DuplicateCollegeId { id: String },

    #[error("registry is empty; nothing to match against")]
    EmptyRegistry,
}

impl LinkErrorCode for RegistryError {
    fn error_code(&self) -> &'static str {
        error_code::REGISTRY_ERROR
    }
}
