// ============================================================
// COMMAND LINE INTERFACE
// ============================================================

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use crate::application::header_normalizer::map_headers;
use crate::application::validation::{validate_dataset, ValidationReport};
use crate::domain::error::Result;
use crate::domain::{Dataset, EngineConfig, EntityKind, PriorityWeights, RuleSet};
use crate::infrastructure::config::ConfigService;
use crate::infrastructure::export::{ExportContext, ExportService};
use crate::infrastructure::tabular::{infer_kind, load_dataset, raw_headers};

#[derive(Parser)]
#[command(name = "forge", about = "Normalize and validate client, worker and task sheets")]
pub struct Cli {
    /// Engine configuration file (TOML)
    #[arg(long, global = true, env = "FORGE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Sheet locations shared by `validate` and `export`
#[derive(clap::Args)]
pub struct Sources {
    /// Client sheet (CSV or spreadsheet)
    #[arg(long)]
    pub clients: Option<PathBuf>,

    /// Worker sheet
    #[arg(long)]
    pub workers: Option<PathBuf>,

    /// Task sheet
    #[arg(long)]
    pub tasks: Option<PathBuf>,
}

impl Sources {
    fn as_pairs(&self) -> Vec<(EntityKind, &Path)> {
        [
            (EntityKind::Client, &self.clients),
            (EntityKind::Worker, &self.workers),
            (EntityKind::Task, &self.tasks),
        ]
        .into_iter()
        .filter_map(|(kind, path)| path.as_deref().map(|p| (kind, p)))
        .collect()
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a dataset and print its diagnostics
    Validate {
        #[command(flatten)]
        sources: Sources,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show how a file's header labels map onto canonical field names
    Headers {
        file: PathBuf,

        /// client, worker or task. Defaults to a guess from the file name.
        #[arg(long)]
        kind: Option<EntityKind>,
    },
    /// Write cleaned sheets, rules and the validation report
    Export {
        #[command(flatten)]
        sources: Sources,

        /// Output directory
        #[arg(short, long)]
        out: PathBuf,

        /// JSON array of rules to include
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Priority weight preset (maximize-fulfillment, fair-distribution, skill-optimization)
        #[arg(long)]
        preset: Option<String>,

        /// Export even when validation reports errors
        #[arg(long)]
        force: bool,
    },
}

/// Execute a parsed command. `Ok(false)` means the run completed but found errors.
pub fn run_command(cli: Cli) -> Result<bool> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Validate { sources, json } => handle_validate(&sources, json, &config),
        Commands::Headers { file, kind } => handle_headers(&file, kind, &config),
        Commands::Export {
            sources,
            out,
            rules,
            preset,
            force,
        } => handle_export(&sources, &out, rules.as_deref(), preset.as_deref(), force, &config),
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let service = ConfigService::new();
    match path {
        Some(path) => service.with_file(path).load(),
        None => service.load(),
    }
}

fn build_report(dataset: &Dataset, config: &EngineConfig) -> ValidationReport {
    ValidationReport::from_diagnostics(validate_dataset(dataset), config.max_diagnostics)
}

fn handle_validate(sources: &Sources, json: bool, config: &EngineConfig) -> Result<bool> {
    let dataset = load_dataset(&sources.as_pairs(), config)?;
    let report = build_report(&dataset, config);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for diagnostic in &report.diagnostics {
            println!("{}", diagnostic);
        }
        if report.truncated {
            println!("... output capped at {} diagnostics", config.max_diagnostics);
        }
        println!(
            "{} error(s), {} warning(s)",
            report.summary.total_errors, report.summary.total_warnings
        );
        for recommendation in &report.recommendations {
            println!("- {}", recommendation);
        }
    }

    Ok(!report.has_errors())
}

fn handle_headers(file: &Path, kind: Option<EntityKind>, config: &EngineConfig) -> Result<bool> {
    let kind = kind.unwrap_or_else(|| infer_kind(file));
    let headers = raw_headers(file, config)?;

    println!("{} headers in {}", kind.label(), file.display());
    for m in map_headers(kind, &headers) {
        if m.matched {
            println!("  {} -> {}", m.raw, m.canonical);
        } else {
            println!("  {} (kept as-is)", m.raw);
        }
    }
    Ok(true)
}

fn handle_export(
    sources: &Sources,
    out: &Path,
    rules_path: Option<&Path>,
    preset: Option<&str>,
    force: bool,
    config: &EngineConfig,
) -> Result<bool> {
    let dataset = load_dataset(&sources.as_pairs(), config)?;
    let report = build_report(&dataset, config);

    let rules = match rules_path {
        Some(path) => RuleSet::from_json(&std::fs::read_to_string(path)?)?,
        None => RuleSet::new(),
    };
    let weights = match preset {
        Some(key) => PriorityWeights::preset(key)?,
        None => PriorityWeights::default(),
    };

    if force && report.has_errors() {
        warn!(
            errors = report.summary.total_errors,
            "Exporting despite validation errors"
        );
    }

    let manifest = ExportService::new(out)
        .with_config(config)
        .allow_errors(force)
        .export(&ExportContext {
            dataset: &dataset,
            rules: &rules,
            weights: &weights,
            report: &report,
        })?;

    for file in &manifest.files {
        println!("{}  {}", file.sha256, file.name);
    }
    info!(out = %out.display(), "Export complete");

    Ok(!report.has_errors())
}
