//! Spreadsheet ingestion for client, worker and task datasets: header normalization, typed
//! records, multi-pass validation with stable diagnostics, and a cleaned export package.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

pub use application::validation::{validate, validate_dataset, ValidationReport};
pub use domain::{
    AppError, CanonicalField, CheckKind, Client, Dataset, Diagnostic, EngineConfig, EntityKind,
    Result, Severity, Task, Worker,
};

use interfaces::cli::{run_command, Cli};

pub fn run() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    match run_command(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            error!(error = %err, "Command failed");
            ExitCode::from(2)
        }
    }
}
