//! Address-based disambiguation for generically named institutions.

use std::collections::BTreeSet;

use seatlink_core::config::GenericNameConfig;
use seatlink_core::normalize;
use seatlink_core::types::MasterCollege;

use crate::context::RecordContext;

/// Compiled generic-name rules: which names are non-discriminating, and
/// which address tokens count as location evidence.
#[derive(Debug, Clone)]
pub struct GenericRules {
    /// Canonical name prefixes, longest first.
    patterns: Vec<String>,
    /// Words that never name a place.
    words: BTreeSet<String>,
    min_token_len: usize,
}

impl GenericRules {
    pub fn from_config(config: &GenericNameConfig) -> Self {
        Self {
            patterns: config.effective_patterns(),
            words: config.effective_words(),
            min_token_len: config.effective_min_location_token_len(),
        }
    }

    /// The generic pattern a canonical name falls under, if any. A pattern
    /// matches the whole name or a word-boundary prefix of it, so
    /// "AREA HOSPITAL ADONI" is generic but "AREA HOSPITALS TRUST" is not
    /// under the pattern "AREA HOSPITAL".
    pub fn match_pattern(&self, name: &str) -> Option<&str> {
        self.patterns.iter().find_map(|pattern| {
            let rest = name.strip_prefix(pattern.as_str())?;
            if rest.is_empty() || rest.starts_with(' ') {
                Some(pattern.as_str())
            } else {
                None
            }
        })
    }

    pub fn is_generic(&self, name: &str) -> bool {
        self.match_pattern(name).is_some()
    }

    /// Location-bearing tokens of an address: keywords of the configured
    /// minimum length with the generic word set removed.
    pub fn location_tokens(&self, address: &str) -> BTreeSet<String> {
        normalize::address_keywords(address)
            .into_iter()
            .filter(|token| token.len() >= self.min_token_len && !self.words.contains(token))
            .collect()
    }
}

/// Keeps only candidates with location evidence in the record's address:
/// at least one of the candidate's location tokens must appear as a word
/// of the record's canonicalized address. Survivors stay in input
/// (college-id) order. No evidence means no survivors, never a guess.
pub fn by_address<'c>(
    rules: &GenericRules,
    ctx: &RecordContext<'_>,
    pool: &[&'c MasterCollege],
) -> Vec<&'c MasterCollege> {
    let record_words: BTreeSet<String> = normalize::tokens(&ctx.record.raw_address);
    if record_words.is_empty() {
        return Vec::new();
    }
    pool.iter()
        .copied()
        .filter(|college| {
            rules
                .location_tokens(&college.address)
                .iter()
                .any(|token| record_words.contains(token))
        })
        .collect()
}
