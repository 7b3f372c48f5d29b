//! Generic institution-name handling.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::normalize;

/// Rules for names that are not discriminating on their own.
///
/// `patterns` are name prefixes shared by many unrelated institutions
/// ("DISTRICT HOSPITAL" exists in nearly every district); `words` are tokens
/// that never name a location and so are excluded when mining candidate
/// addresses for location evidence.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GenericNameConfig {
    /// Generic name prefixes. Empty means use the built-in list.
    pub patterns: Vec<String>,
    /// Non-location words. Empty means use the built-in list.
    pub words: Vec<String>,
    /// Minimum length of a location-bearing token. Default: 4.
    pub min_location_token_len: Option<usize>,
}

impl GenericNameConfig {
    pub fn effective_min_location_token_len(&self) -> usize {
        self.min_location_token_len.unwrap_or(4)
    }

    /// Canonicalized generic name prefixes, longest first so the most
    /// specific pattern wins a prefix test.
    pub fn effective_patterns(&self) -> Vec<String> {
        let source: Vec<&str> = if self.patterns.is_empty() {
            BUILT_IN_PATTERNS.to_vec()
        } else {
            self.patterns.iter().map(String::as_str).collect()
        };
        let mut patterns: Vec<String> = source
            .into_iter()
            .map(normalize::canonicalize)
            .filter(|p| !p.is_empty())
            .collect();
        patterns.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        patterns.dedup();
        patterns
    }

    /// Canonicalized non-location word set.
    pub fn effective_words(&self) -> BTreeSet<String> {
        let source: Vec<&str> = if self.words.is_empty() {
            BUILT_IN_WORDS.to_vec()
        } else {
            self.words.iter().map(String::as_str).collect()
        };
        source
            .into_iter()
            .map(normalize::canonicalize)
            .filter(|w| !w.is_empty())
            .collect()
    }
}

const BUILT_IN_PATTERNS: &[&str] = &[
    "DISTRICT HOSPITAL",
    "DISTRICT GENERAL HOSPITAL",
    "SUB DISTRICT HOSPITAL",
    "AREA HOSPITAL",
    "GENERAL HOSPITAL",
    "CIVIL HOSPITAL",
    "TALUK HOSPITAL",
    "GOVERNMENT HOSPITAL",
    "GOVERNMENT MEDICAL COLLEGE",
    "GOVERNMENT DENTAL COLLEGE",
    "GOVERNMENT GENERAL HOSPITAL",
    "GOVT HOSPITAL",
    "GOVT MEDICAL COLLEGE",
    "GOVT DENTAL COLLEGE",
    "GOVT GENERAL HOSPITAL",
];

const BUILT_IN_WORDS: &[&str] = &[
    "HOSPITAL", "HOSPITALS", "COLLEGE", "INSTITUTE", "INSTITUTIONS", "UNIVERSITY",
    "MEDICAL", "DENTAL", "SCIENCES", "SCIENCE", "CENTRE", "CENTER", "GOVERNMENT",
    "GOVT", "DISTRICT", "GENERAL", "AREA", "CIVIL", "TALUK", "POST", "GRADUATE",
    "RESEARCH", "ROAD", "NEAR", "OPPOSITE", "BEHIND", "DIST", "INDIA", "INDIAN",
    "STATE", "NATIONAL", "REGIONAL", "SUPER", "SPECIALITY", "TRUST", "SOCIETY",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_patterns_are_canonical_and_longest_first() {
        let config = GenericNameConfig::default();
        let patterns = config.effective_patterns();
        assert!(patterns.contains(&"AREA HOSPITAL".to_string()));
        // Longest first: the more specific pattern must come before its
        // prefix-sharing shorter sibling.
        let district = patterns.iter().position(|p| p == "DISTRICT HOSPITAL").unwrap();
        let sub = patterns.iter().position(|p| p == "SUB DISTRICT HOSPITAL").unwrap();
        assert!(sub < district);
    }

    #[test]
    fn configured_patterns_replace_built_ins() {
        let config = GenericNameConfig {
            patterns: vec!["Community Health Centre".to_string()],
            ..GenericNameConfig::default()
        };
        assert_eq!(config.effective_patterns(), vec!["COMMUNITY HEALTH CENTRE"]);
    }

    #[test]
    fn words_are_canonicalized() {
        let config = GenericNameConfig {
            words: vec!["hospital".to_string(), "Road".to_string()],
            ..GenericNameConfig::default()
        };
        let words = config.effective_words();
        assert!(words.contains("HOSPITAL"));
        assert!(words.contains("ROAD"));
    }
}
