//! seatlink command line: resolve seat allotment batches against the
//! college master registry.

mod commands;
mod inputs;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use seatlink_core::errors::LinkErrorCode;
use tracing_subscriber::EnvFilter;

pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
/// The run completed and artifacts were written, but integrity findings
/// demand registry review before results are promoted.
pub(crate) const EXIT_FINDINGS: u8 = 3;

#[derive(Parser)]
#[command(name = "seatlink")]
#[command(about = "Reconcile seat allotment records against the college master registry")]
#[command(version)]
struct Cli {
    /// Explicit config file (otherwise ./seatlink.toml, then defaults)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Debug-level logging; RUST_LOG takes over when this flag is absent
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a batch of seat records and write results plus the report
    #[command(after_help = "\
Examples:
  seatlink run --registry colleges.csv --records batch.csv
  seatlink run --registry registry.db --records batch.csv --out results.db
  seatlink run --registry colleges.csv --courses courses.csv \\
      --offerings offerings.csv --records batch.csv --sequential
  SEATLINK_FUZZY_ACCEPT=0.90 seatlink run --registry colleges.csv --records batch.csv")]
    Run(commands::run::RunArgs),

    /// Resolve the layered configuration, validate it, and print it
    CheckConfig,

    /// Re-render the Markdown report from a stored results database
    Report(commands::report::ReportArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let outcome = match cli.command {
        Commands::Run(args) => commands::run::execute(cli.config.as_deref(), &args),
        Commands::CheckConfig => commands::check_config::execute(cli.config.as_deref()),
        Commands::Report(args) => commands::report::execute(cli.config.as_deref(), &args),
    };

    match outcome {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("error: {}", e.log_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
