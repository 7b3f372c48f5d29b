//! Configuration system for seatlink.
//! TOML-based, layered resolution: CLI > env > project file > defaults.

pub mod course_config;
pub mod generic_config;
pub mod link_config;
pub mod report_config;
pub mod runtime_config;
pub mod state_config;
pub mod threshold_config;

pub use course_config::{CourseRuleConfig, CourseRules};
pub use generic_config::GenericNameConfig;
pub use link_config::{CliOverrides, LinkConfig};
pub use report_config::ReportConfig;
pub use runtime_config::RuntimeConfig;
pub use state_config::StateAliasConfig;
pub use threshold_config::{EffectiveThresholds, ThresholdConfig};
