// ============================================================
// EXPORT PACKAGE
// ============================================================
// Cleaned CSVs, rules configuration, validation report and a
// checksum manifest, written into one output directory

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info};
use uuid::Uuid;

use crate::application::validation::{ReportSummary, ValidationReport};
use crate::domain::error::{AppError, Result};
use crate::domain::{
    CanonicalField, Dataset, Diagnostic, EngineConfig, EntityKind, ExportFormat, PriorityWeights,
    Record, Rule, RuleSet,
};

pub const RULES_FILE: &str = "rules_config.json";
pub const REPORT_FILE: &str = "validation_report.json";
pub const MANIFEST_FILE: &str = "manifest.json";

fn io_err(msg: impl Into<String>) -> AppError {
    AppError::IoError(msg.into())
}

/// File name of the cleaned CSV for one collection
pub fn cleaned_file_name(kind: EntityKind) -> String {
    format!("{}_cleaned.csv", kind.collection_name())
}

/// Everything that goes into one export
pub struct ExportContext<'a> {
    pub dataset: &'a Dataset,
    pub rules: &'a RuleSet,
    pub weights: &'a PriorityWeights,
    pub report: &'a ValidationReport,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedFile {
    pub name: String,
    pub bytes: u64,
    pub sha256: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportManifest {
    pub generated_at: String,
    pub files: Vec<ExportedFile>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RulesMetadata {
    generated_at: String,
    total_clients: usize,
    total_workers: usize,
    total_tasks: usize,
    active_rules: usize,
}

#[derive(Serialize)]
struct RulesConfig<'a> {
    rules: Vec<&'a Rule>,
    priorities: &'a PriorityWeights,
    metadata: RulesMetadata,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportDocumentSummary<'a> {
    #[serde(flatten)]
    counts: &'a ReportSummary,
    validation_date: String,
}

#[derive(Serialize)]
struct ReportDocument<'a> {
    summary: ReportDocumentSummary<'a>,
    errors: &'a [Diagnostic],
    truncated: bool,
    recommendations: &'a [String],
}

/// Every file an export may produce, apart from the manifest
fn package_files() -> Vec<String> {
    let mut names: Vec<String> = EntityKind::ALL.iter().map(|k| cleaned_file_name(*k)).collect();
    names.push(RULES_FILE.to_string());
    names.push(REPORT_FILE.to_string());
    names
}

pub struct ExportService {
    out_dir: PathBuf,
    write_csv: bool,
    write_json: bool,
    include_report: bool,
    allow_errors: bool,
}

impl ExportService {
    pub fn new(out_dir: impl AsRef<Path>) -> Self {
        Self {
            out_dir: out_dir.as_ref().to_path_buf(),
            write_csv: true,
            write_json: true,
            include_report: true,
            allow_errors: false,
        }
    }

    /// Take formats and the report switch from the engine configuration
    pub fn with_config(mut self, config: &EngineConfig) -> Self {
        self.write_csv = config.exports(ExportFormat::Csv);
        self.write_json = config.exports(ExportFormat::Json);
        self.include_report = config.include_validation_report;
        self
    }

    /// Export even when the report still contains errors
    pub fn allow_errors(mut self, allow: bool) -> Self {
        self.allow_errors = allow;
        self
    }

    pub fn export(&self, ctx: &ExportContext<'_>) -> Result<ExportManifest> {
        if !self.allow_errors && !ctx.report.is_ready_for_export() {
            return Err(AppError::ValidationError(format!(
                "Dataset has {} validation error(s); resolve them before exporting",
                ctx.report.summary.total_errors
            )));
        }

        fs::create_dir_all(&self.out_dir).map_err(|e| {
            io_err(format!(
                "Failed to create export dir {}: {e}",
                self.out_dir.display()
            ))
        })?;

        let generated_at = Utc::now().to_rfc3339();
        let mut files = Vec::new();

        if self.write_csv {
            files.push(self.write_file(
                &cleaned_file_name(EntityKind::Client),
                &cleaned_csv(&ctx.dataset.clients)?,
            )?);
            files.push(self.write_file(
                &cleaned_file_name(EntityKind::Worker),
                &cleaned_csv(&ctx.dataset.workers)?,
            )?);
            files.push(self.write_file(
                &cleaned_file_name(EntityKind::Task),
                &cleaned_csv(&ctx.dataset.tasks)?,
            )?);
        }

        if self.write_json {
            let enabled = ctx.rules.enabled();
            let rules_config = RulesConfig {
                metadata: RulesMetadata {
                    generated_at: generated_at.clone(),
                    total_clients: ctx.dataset.clients.len(),
                    total_workers: ctx.dataset.workers.len(),
                    total_tasks: ctx.dataset.tasks.len(),
                    active_rules: enabled.len(),
                },
                rules: enabled,
                priorities: ctx.weights,
            };
            files.push(self.write_file(RULES_FILE, &serde_json::to_vec_pretty(&rules_config)?)?);
        }

        if self.write_json && self.include_report {
            let document = ReportDocument {
                summary: ReportDocumentSummary {
                    counts: &ctx.report.summary,
                    validation_date: generated_at.clone(),
                },
                errors: &ctx.report.diagnostics,
                truncated: ctx.report.truncated,
                recommendations: &ctx.report.recommendations,
            };
            files.push(self.write_file(REPORT_FILE, &serde_json::to_vec_pretty(&document)?)?);
        }

        self.remove_stale(&files)?;

        let manifest = ExportManifest {
            generated_at,
            files,
        };
        write_atomic(
            &self.out_dir.join(MANIFEST_FILE),
            &serde_json::to_vec_pretty(&manifest)?,
        )?;

        info!(
            out_dir = %self.out_dir.display(),
            files = manifest.files.len(),
            errors = ctx.report.summary.total_errors,
            "Export package written"
        );

        Ok(manifest)
    }

    /// Delete package files from an earlier export that this one did not write
    fn remove_stale(&self, written: &[ExportedFile]) -> Result<()> {
        for name in package_files() {
            if written.iter().any(|f| f.name == name) {
                continue;
            }
            let path = self.out_dir.join(&name);
            if path.exists() {
                fs::remove_file(&path).map_err(|e| {
                    io_err(format!("Failed to remove stale {}: {e}", path.display()))
                })?;
                debug!(file = %name, "Removed file left by a previous export");
            }
        }
        Ok(())
    }

    fn write_file(&self, name: &str, bytes: &[u8]) -> Result<ExportedFile> {
        write_atomic(&self.out_dir.join(name), bytes)?;
        Ok(ExportedFile {
            name: name.to_string(),
            bytes: bytes.len() as u64,
            sha256: sha256_hex(bytes),
        })
    }
}

/// Cleaned CSV for one collection: canonical headers in fixed order, then every
/// pass-through column in order of first appearance. Empty input yields the header row.
pub fn cleaned_csv<R: Record>(records: &[R]) -> Result<Vec<u8>> {
    let mut extra_headers: Vec<&str> = Vec::new();
    for record in records {
        for field in record.extra() {
            if !extra_headers.contains(&field.name.as_str()) {
                extra_headers.push(&field.name);
            }
        }
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    let header: Vec<&str> = CanonicalField::for_kind(R::KIND)
        .iter()
        .map(|f| f.as_str())
        .chain(extra_headers.iter().copied())
        .collect();
    writer.write_record(&header)?;

    for record in records {
        let mut cells = record.canonical_cells();
        for name in &extra_headers {
            let value = record
                .extra()
                .iter()
                .find(|f| f.name == *name)
                .map(|f| f.value.clone())
                .unwrap_or_default();
            cells.push(value);
        }
        writer.write_record(&cells)?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("Failed to flush CSV buffer: {e}")))
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Write through a temp file in the same directory, then rename into place
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp_path = path.with_extension(format!("tmp-{}", Uuid::new_v4()));
    {
        let mut file = fs::File::create(&tmp_path).map_err(|e| {
            io_err(format!(
                "Failed to create temp file {}: {e}",
                tmp_path.display()
            ))
        })?;
        file.write_all(bytes).map_err(|e| {
            io_err(format!(
                "Failed to write temp file {}: {e}",
                tmp_path.display()
            ))
        })?;
        file.sync_all().ok();
    }

    // Windows rename cannot replace an existing file
    if path.exists() {
        fs::remove_file(path).map_err(|e| {
            io_err(format!("Failed to replace {}: {e}", path.display()))
        })?;
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        io_err(format!(
            "Failed to rename temp file {} to {}: {e}",
            tmp_path.display(),
            path.display()
        ))
    })
}
