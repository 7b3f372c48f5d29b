//! Top-level configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{
    CourseRuleConfig, GenericNameConfig, ReportConfig, RuntimeConfig, StateAliasConfig,
    ThresholdConfig,
};
use crate::errors::ConfigError;

/// Project config file looked up next to the data when no explicit path is
/// given.
pub const PROJECT_CONFIG_FILE: &str = "seatlink.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`SEATLINK_*`)
/// 3. Explicit config path, or `seatlink.toml` in the working root
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LinkConfig {
    pub matching: ThresholdConfig,
    pub states: StateAliasConfig,
    pub generic: GenericNameConfig,
    pub courses: CourseRuleConfig,
    pub runtime: RuntimeConfig,
    pub report: ReportConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub parallel: Option<bool>,
    pub candidate_cap: Option<usize>,
    pub fuzzy_accept: Option<f64>,
    pub tie_epsilon: Option<f64>,
}

impl LinkConfig {
    /// Load configuration with layered resolution.
    ///
    /// An explicit path that does not exist is fatal; a missing project
    /// file just means defaults.
    pub fn load(
        root: &Path,
        explicit_path: Option<&Path>,
        cli_overrides: Option<&CliOverrides>,
    ) -> Result<Self, ConfigError> {
        let mut config = match explicit_path {
            Some(path) => Self::read_toml_file(path)?,
            None => {
                let project_path = root.join(PROJECT_CONFIG_FILE);
                if project_path.exists() {
                    Self::read_toml_file(&project_path)?
                } else {
                    Self::default()
                }
            }
        };

        Self::apply_env_overrides(&mut config);

        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }

    fn read_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Apply environment variable overrides.
    /// Pattern: `SEATLINK_FUZZY_ACCEPT`, `SEATLINK_CANDIDATE_CAP`, etc.
    fn apply_env_overrides(config: &mut LinkConfig) {
        if let Ok(val) = std::env::var("SEATLINK_FUZZY_ACCEPT") {
            if let Ok(v) = val.parse::<f64>() {
                config.matching.fuzzy_accept = Some(v);
            }
        }
        if let Ok(val) = std::env::var("SEATLINK_FUZZY_MARGIN") {
            if let Ok(v) = val.parse::<f64>() {
                config.matching.fuzzy_margin = Some(v);
            }
        }
        if let Ok(val) = std::env::var("SEATLINK_TIE_EPSILON") {
            if let Ok(v) = val.parse::<f64>() {
                config.matching.tie_epsilon = Some(v);
            }
        }
        if let Ok(val) = std::env::var("SEATLINK_CANDIDATE_CAP") {
            if let Ok(v) = val.parse::<usize>() {
                config.runtime.candidate_cap = Some(v);
            }
        }
        if let Ok(val) = std::env::var("SEATLINK_PARALLEL") {
            if let Ok(v) = val.parse::<bool>() {
                config.runtime.parallel = Some(v);
            }
        }
        if let Ok(val) = std::env::var("SEATLINK_LOW_CONFIDENCE_THRESHOLD") {
            if let Ok(v) = val.parse::<f64>() {
                config.report.low_confidence_threshold = Some(v);
            }
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut LinkConfig, cli: &CliOverrides) {
        if let Some(v) = cli.parallel {
            config.runtime.parallel = Some(v);
        }
        if let Some(v) = cli.candidate_cap {
            config.runtime.candidate_cap = Some(v);
        }
        if let Some(v) = cli.fuzzy_accept {
            config.matching.fuzzy_accept = Some(v);
        }
        if let Some(v) = cli.tie_epsilon {
            config.matching.tie_epsilon = Some(v);
        }
    }

    /// Validate the configuration values. Any violation is fatal before a
    /// single record is processed.
    pub fn validate(config: &LinkConfig) -> Result<(), ConfigError> {
        let unit_fields = [
            ("matching.fuzzy_accept", config.matching.fuzzy_accept),
            ("matching.fuzzy_margin", config.matching.fuzzy_margin),
            ("matching.token_set_accept", config.matching.token_set_accept),
            ("matching.embedding_floor", config.matching.embedding_floor),
            ("matching.phonetic_accept", config.matching.phonetic_accept),
            ("matching.tie_epsilon", config.matching.tie_epsilon),
            (
                "matching.disambiguation_confidence",
                config.matching.disambiguation_confidence,
            ),
            (
                "report.low_confidence_threshold",
                config.report.low_confidence_threshold,
            ),
            ("states.fuzzy_floor", config.states.fuzzy_floor),
        ];
        for (field, value) in unit_fields {
            if let Some(v) = value {
                if !(0.0..=1.0).contains(&v) {
                    return Err(ConfigError::ValidationFailed {
                        field: field.to_string(),
                        message: "must be between 0.0 and 1.0".to_string(),
                    });
                }
            }
        }
        if let Some(cap) = config.runtime.candidate_cap {
            if cap == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "runtime.candidate_cap".to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        if let Some(len) = config.generic.min_location_token_len {
            if len == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "generic.min_location_token_len".to_string(),
                    message: "must be at least 1".to_string(),
                });
            }
        }
        Ok(())
    }
}
