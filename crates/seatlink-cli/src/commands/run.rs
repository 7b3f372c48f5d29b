//! `seatlink run`: resolve one batch end to end and write the artifacts.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use seatlink_core::config::{CliOverrides, LinkConfig};
use seatlink_core::errors::{PipelineError, ReportError};
use seatlink_engine::{render_report, validate_batch, BatchRunner, RegistryIndex, RunMeta};
use seatlink_storage::{csv, LinkStore};

use crate::inputs;
use crate::{EXIT_FINDINGS, EXIT_SUCCESS};

#[derive(Args)]
pub struct RunArgs {
    /// Master registry: colleges CSV or a seatlink SQLite database
    #[arg(long, value_name = "PATH")]
    pub registry: PathBuf,

    /// Seat allotment batch: CSV or a seatlink SQLite database
    #[arg(long, value_name = "PATH")]
    pub records: PathBuf,

    /// Course catalogue CSV (id,name,stream,level)
    #[arg(long, value_name = "PATH")]
    pub courses: Option<PathBuf>,

    /// College offerings CSV (college_id,course_name)
    #[arg(long, value_name = "PATH")]
    pub offerings: Option<PathBuf>,

    /// Precomputed embedding vectors CSV (kind,key,vector)
    #[arg(long, value_name = "PATH")]
    pub embeddings: Option<PathBuf>,

    /// Results destination; a SQLite path gets the full store, else CSV
    #[arg(long, value_name = "PATH", default_value = "results.db")]
    pub out: PathBuf,

    /// Markdown report destination
    #[arg(long, value_name = "PATH", default_value = "report.md")]
    pub report: PathBuf,

    /// Force sequential resolution
    #[arg(long)]
    pub sequential: bool,

    /// Candidate cap override
    #[arg(long, value_name = "N")]
    pub candidate_cap: Option<usize>,

    /// Fuzzy accept threshold override
    #[arg(long, value_name = "SCORE")]
    pub fuzzy_accept: Option<f64>,

    /// Tie epsilon override
    #[arg(long, value_name = "SCORE")]
    pub tie_epsilon: Option<f64>,
}

pub fn execute(config_path: Option<&Path>, args: &RunArgs) -> Result<u8, PipelineError> {
    let started = Instant::now();
    let overrides = CliOverrides {
        parallel: if args.sequential { Some(false) } else { None },
        candidate_cap: args.candidate_cap,
        fuzzy_accept: args.fuzzy_accept,
        tie_epsilon: args.tie_epsilon,
    };
    let config = LinkConfig::load(Path::new("."), config_path, Some(&overrides))?;
    tracing::debug!(
        parallel = config.runtime.effective_parallel(),
        candidate_cap = config.runtime.effective_candidate_cap(),
        "configuration resolved"
    );

    let registry = inputs::load_registry(
        &args.registry,
        args.courses.as_deref(),
        args.offerings.as_deref(),
        args.embeddings.as_deref(),
    )?;
    let records = inputs::load_records(&args.records)?;

    // A SQLite destination also receives the inputs, making the file a
    // self-contained artifact `seatlink report` can re-render from.
    let out_store = if inputs::is_sqlite(&args.out) {
        let store = LinkStore::open(&args.out)?;
        store.save_registry(&registry.rows)?;
        store.save_embeddings(&registry.embeddings)?;
        store.save_seat_records(&records)?;
        Some(store)
    } else {
        None
    };

    let index = RegistryIndex::build(
        registry.rows.colleges,
        registry.rows.courses,
        registry.rows.offerings,
        &config,
    )?;
    let embeddings = inputs::build_embedding_store(registry.embeddings);

    let runner = BatchRunner::new(&index, &embeddings.data, &config);
    let output = runner.run(&records);
    let validation = validate_batch(&output.results, &index);

    let meta = RunMeta {
        registry_colleges: index.len(),
        parallel: config.runtime.effective_parallel(),
        duration_secs: started.elapsed().as_secs_f64(),
        thresholds: config.matching.effective(),
    };
    let rendered = render_report(&output.stats, &validation, &meta);

    match &out_store {
        Some(store) => store.save_results(&output.results)?,
        None => csv::write_results(&args.out, &output.results)?,
    }
    std::fs::write(&args.report, &rendered).map_err(|e| ReportError::WriteFailed {
        path: args.report.display().to_string(),
        message: e.to_string(),
    })?;

    println!(
        "{} records: {} matched, {} unmatched ({} unmatchable), {} ambiguous",
        output.stats.total,
        output.stats.matched,
        output.stats.unmatched,
        output.stats.unmatchable,
        output.stats.ambiguous
    );
    println!("results written to {}", args.out.display());
    println!("report written to {}", args.report.display());

    if validation.is_clean() {
        Ok(EXIT_SUCCESS)
    } else {
        eprintln!(
            "{} integrity finding(s); review the report before promoting results",
            validation.findings.len()
        );
        Ok(EXIT_FINDINGS)
    }
}
