//! Shared normalization: the single source of truth for name, address,
//! state, and composite-key canonicalization.
//!
//! Both registry construction and query-time matching import this module.
//! Key construction exists exactly once, here; a second implementation
//! anywhere else is the bug class this layout eliminates.

pub mod state;
pub mod text;

pub use state::StateNormalizer;
pub use text::{address_keywords, canonicalize, tokens};

/// Canonical identity key: `normalized name + ", " + sorted address keywords`.
///
/// Returns `None` when the name normalizes to empty. An empty-name key would
/// collide with every other empty-name entry, so the caller gets an explicit
/// unmatchable marker instead.
pub fn build_composite_key(name: &str, address: &str) -> Option<String> {
    let name = canonicalize(name);
    if name.is_empty() {
        return None;
    }
    let keywords: Vec<String> = address_keywords(address).into_iter().collect();
    Some(format!("{}, {}", name, keywords.join(" ")))
}
