//! State alias configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// State-name alias table.
///
/// File entries extend and override the built-in table. Keys and values are
/// canonicalized by the normalizer at use, so `"Orissa"` and `"ORISSA"`
/// configure the same alias.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StateAliasConfig {
    /// Extra `alias -> canonical` entries.
    pub aliases: BTreeMap<String, String>,
    /// Similarity floor for rescuing misspelled states against the registry
    /// state set. Default: 0.85.
    pub fuzzy_floor: Option<f64>,
}

impl StateAliasConfig {
    pub fn effective_fuzzy_floor(&self) -> f64 {
        self.fuzzy_floor.unwrap_or(0.85)
    }

    /// Built-in aliases merged with configured ones; configured entries win.
    pub fn effective_aliases(&self) -> BTreeMap<String, String> {
        let mut table = built_in_aliases();
        for (alias, canonical) in &self.aliases {
            table.insert(alias.clone(), canonical.clone());
        }
        table
    }
}

/// Alias spellings observed across counselling authorities over the years.
fn built_in_aliases() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("ORISSA".to_string(), "ODISHA".to_string()),
        ("DELHI".to_string(), "DELHI (NCT)".to_string()),
        ("NEW DELHI".to_string(), "DELHI (NCT)".to_string()),
        ("DELHI NCR".to_string(), "DELHI (NCT)".to_string()),
        ("PONDICHERRY".to_string(), "PUDUCHERRY".to_string()),
    ])
}
