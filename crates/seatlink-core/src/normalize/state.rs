//! Canonical state resolution.

use std::collections::{BTreeMap, BTreeSet};

use rustc_hash::FxHashMap;

use super::text::canonicalize;

/// Resolves raw state spellings to one canonical token per state.
///
/// Built once per run, before any matching: the alias table comes from
/// configuration, the known-state set from the registry itself. Resolution
/// order: alias table, direct hit on a known state, fuzzy rescue against
/// known states, verbatim pass-through. A pass-through token naming no
/// registry state just yields an empty candidate set downstream; it is
/// never silently widened to an all-India search.
#[derive(Debug, Clone)]
pub struct StateNormalizer {
    aliases: FxHashMap<String, String>,
    known: BTreeSet<String>,
    fuzzy_floor: f64,
}

impl StateNormalizer {
    pub fn new(aliases: &BTreeMap<String, String>, fuzzy_floor: f64) -> Self {
        let aliases = aliases
            .iter()
            .map(|(alias, canonical)| (canonicalize(alias), canonicalize(canonical)))
            .collect();
        Self {
            aliases,
            known: BTreeSet::new(),
            fuzzy_floor,
        }
    }

    /// Register a state observed in the registry and return its canonical
    /// token. Aliases apply here too, so registry rows spelled with a known
    /// alias collapse onto the same token as query rows.
    pub fn register_known(&mut self, raw_state: &str) -> String {
        let token = self.resolve_exact(raw_state);
        self.known.insert(token.clone());
        token
    }

    /// Canonical tokens of every registered state, in lexicographic order.
    pub fn known_states(&self) -> impl Iterator<Item = &str> {
        self.known.iter().map(String::as_str)
    }

    fn resolve_exact(&self, raw: &str) -> String {
        let canonical = canonicalize(raw);
        match self.aliases.get(&canonical) {
            Some(target) => target.clone(),
            None => canonical,
        }
    }

    /// Resolve a raw state to its canonical token.
    pub fn resolve(&self, raw: &str) -> String {
        let canonical = self.resolve_exact(raw);
        if self.known.is_empty() || self.known.contains(&canonical) {
            return canonical;
        }
        // Fuzzy rescue for misspellings, judged against registry states
        // only, on token-sorted text so word order cannot mask a match.
        // Equal scores keep the lexicographically first state.
        let needle = token_sorted(&canonical);
        let mut best: Option<(&String, f64)> = None;
        for state in &self.known {
            let score = strsim::jaro_winkler(&needle, &token_sorted(state));
            if score >= self.fuzzy_floor && best.map_or(true, |(_, b)| score > b) {
                best = Some((state, score));
            }
        }
        match best {
            Some((state, score)) => {
                tracing::debug!(raw, canonical = %state, score, "state resolved by fuzzy rescue");
                state.clone()
            }
            None => canonical,
        }
    }
}

fn token_sorted(text: &str) -> String {
    let mut tokens: Vec<&str> = text.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}
