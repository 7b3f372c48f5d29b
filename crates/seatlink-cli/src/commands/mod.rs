//! Subcommand implementations.

pub mod check_config;
pub mod report;
pub mod run;
