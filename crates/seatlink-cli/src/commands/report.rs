//! `seatlink report`: re-render the Markdown report from a saved run.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use seatlink_core::config::LinkConfig;
use seatlink_core::errors::{PipelineError, ReportError, StorageError};
use seatlink_core::normalize;
use seatlink_engine::{render_report, validate_batch, BatchStats, RegistryIndex, RunMeta};
use seatlink_storage::LinkStore;

use crate::inputs;
use crate::{EXIT_FINDINGS, EXIT_SUCCESS};

#[derive(Args)]
pub struct ReportArgs {
    /// Results database written by `seatlink run`
    #[arg(value_name = "DB")]
    pub db: PathBuf,

    /// Write the report here instead of stdout
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

pub fn execute(config_path: Option<&Path>, args: &ReportArgs) -> Result<u8, PipelineError> {
    let started = Instant::now();
    if !inputs::is_sqlite(&args.db) {
        return Err(StorageError::Io {
            path: args.db.display().to_string(),
            message: "re-rendering needs the SQLite results database written by `seatlink run`"
                .to_string(),
        }
        .into());
    }
    let config = LinkConfig::load(Path::new("."), config_path, None)?;

    let store = LinkStore::open(&args.db)?;
    let registry = store.load_registry()?;
    let index = RegistryIndex::build(
        registry.colleges,
        registry.courses,
        registry.offerings,
        &config,
    )?;
    let results = store.load_results()?;

    // Unmatchable counts are not stored; they are recomputed from the saved
    // input rows the same way the pipeline classifies them.
    let unmatchable: BTreeSet<i64> = store
        .load_seat_records()?
        .iter()
        .filter(|r| normalize::canonicalize(&r.raw_college_name).is_empty())
        .map(|r| r.id)
        .collect();

    let mut stats = BatchStats::new(
        config.report.effective_low_confidence_threshold(),
        config.report.effective_audit_sample_size(),
    );
    for result in &results {
        stats.record(result);
        if unmatchable.contains(&result.seat_record_id) {
            stats.note_unmatchable();
        }
    }

    let validation = validate_batch(&results, &index);
    let meta = RunMeta {
        registry_colleges: index.len(),
        parallel: config.runtime.effective_parallel(),
        duration_secs: started.elapsed().as_secs_f64(),
        thresholds: config.matching.effective(),
    };
    let rendered = render_report(&stats, &validation, &meta);

    match &args.out {
        Some(path) => {
            std::fs::write(path, &rendered).map_err(|e| ReportError::WriteFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            println!("report written to {}", path.display());
        }
        None => print!("{rendered}"),
    }

    if validation.is_clean() {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_FINDINGS)
    }
}
