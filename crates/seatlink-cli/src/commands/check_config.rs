//! `seatlink check-config`: load, validate, and echo the configuration.

use std::path::Path;

use seatlink_core::config::LinkConfig;
use seatlink_core::errors::PipelineError;

use crate::EXIT_SUCCESS;

pub fn execute(config_path: Option<&Path>) -> Result<u8, PipelineError> {
    let config = LinkConfig::load(Path::new("."), config_path, None)?;
    println!("configuration OK");

    let rendered = config.to_toml()?;
    if rendered.trim().is_empty() {
        println!("# all values at compiled defaults");
    } else {
        println!("{rendered}");
    }

    let thresholds = config.matching.effective();
    println!("# effective values");
    println!("fuzzy_accept = {:.2}", thresholds.fuzzy_accept);
    println!("fuzzy_margin = {:.2}", thresholds.fuzzy_margin);
    println!("token_set_accept = {:.2}", thresholds.token_set_accept);
    println!("embedding_floor = {:.2}", thresholds.embedding_floor);
    println!("phonetic_accept = {:.2}", thresholds.phonetic_accept);
    println!("tie_epsilon = {:.2}", thresholds.tie_epsilon);
    println!(
        "disambiguation_confidence = {:.2}",
        thresholds.disambiguation_confidence
    );
    println!(
        "candidate_cap = {}",
        config.runtime.effective_candidate_cap()
    );
    println!("parallel = {}", config.runtime.effective_parallel());
    println!(
        "low_confidence_threshold = {:.2}",
        config.report.effective_low_confidence_threshold()
    );
    println!(
        "audit_sample_size = {}",
        config.report.effective_audit_sample_size()
    );

    Ok(EXIT_SUCCESS)
}
