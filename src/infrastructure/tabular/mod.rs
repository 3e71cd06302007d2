// ============================================================
// TABULAR DECODING
// ============================================================
// Raw upload bytes -> ordered rows with normalized headers.
// Delimited text and spreadsheet workbooks differ only in how cells
// are read; both run every header through the kind's synonym table.

mod delimited;
mod workbook;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::application::record_builder::load_rows;
use crate::domain::error::{AppError, Result};
use crate::domain::{Dataset, EngineConfig, EntityKind, RawRow};

pub use delimited::{decode_text, detect_delimiter, DelimitedDecoder};
pub use workbook::{cell_text, WorkbookDecoder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Delimited,
    Workbook,
}

impl SourceFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "csv" | "tsv" | "txt" => Some(SourceFormat::Delimited),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(SourceFormat::Workbook),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// Decode one upload. Every header is normalized against `kind`'s synonym table.
pub fn decode(bytes: &[u8], format: SourceFormat, kind: EntityKind) -> Result<Vec<RawRow>> {
    match format {
        SourceFormat::Delimited => DelimitedDecoder::new().decode(bytes, kind),
        SourceFormat::Workbook => WorkbookDecoder::decode(bytes, kind),
    }
}

/// Cells past the last header have no column to land in. Empty ones are padding;
/// anything else is rejected so no value is lost without notice.
fn reject_surplus<'a>(
    row_number: usize,
    header_count: usize,
    cells: impl Iterator<Item = &'a str>,
) -> Result<()> {
    let mut total = 0;
    let mut has_value = false;
    for (idx, cell) in cells.enumerate() {
        total = idx + 1;
        if idx >= header_count && !cell.trim().is_empty() {
            has_value = true;
        }
    }
    if has_value {
        return Err(AppError::ParseError(format!(
            "Data row {} has {} cells but only {} header columns",
            row_number, total, header_count
        )));
    }
    Ok(())
}

/// A decoded file together with what was inferred about it
#[derive(Debug, Clone)]
pub struct DecodedUpload {
    pub kind: EntityKind,
    pub format: SourceFormat,
    pub rows: Vec<RawRow>,
}

/// Read a file, enforcing the configured size and extension limits
fn read_upload(path: &Path, config: &EngineConfig) -> Result<(Vec<u8>, SourceFormat)> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    if !config.is_allowed_extension(ext) {
        return Err(AppError::ValidationError(format!(
            "Unsupported file type '{}' for {}",
            ext,
            path.display()
        )));
    }
    let format = SourceFormat::from_extension(ext).ok_or_else(|| {
        AppError::ValidationError(format!("Cannot decode '.{}' files", ext))
    })?;

    let metadata = std::fs::metadata(path)
        .map_err(|e| AppError::NotFound(format!("{}: {}", path.display(), e)))?;
    if metadata.len() > config.max_file_size {
        return Err(AppError::ValidationError(format!(
            "{} is {} bytes, limit is {}",
            path.display(),
            metadata.len(),
            config.max_file_size
        )));
    }

    Ok((std::fs::read(path)?, format))
}

/// Read and decode a file. When `kind` is `None` it is inferred from the file name.
pub fn decode_file(
    path: &Path,
    kind: Option<EntityKind>,
    config: &EngineConfig,
) -> Result<DecodedUpload> {
    let kind = kind.unwrap_or_else(|| infer_kind(path));
    let (bytes, format) = read_upload(path, config)?;
    let rows = if is_tab_separated(path) {
        DelimitedDecoder::new().with_delimiter(b'\t').decode(&bytes, kind)?
    } else {
        decode(&bytes, format, kind)?
    };

    info!(
        file = %path.display(),
        entity = %kind,
        format = ?format,
        rows = rows.len(),
        "Decoded upload"
    );

    Ok(DecodedUpload { kind, format, rows })
}

/// Header labels of a file as written, before normalization
pub fn raw_headers(path: &Path, config: &EngineConfig) -> Result<Vec<String>> {
    let (bytes, format) = read_upload(path, config)?;
    match format {
        SourceFormat::Delimited if is_tab_separated(path) => {
            DelimitedDecoder::new().with_delimiter(b'\t').raw_headers(&bytes)
        }
        SourceFormat::Delimited => DelimitedDecoder::new().raw_headers(&bytes),
        SourceFormat::Workbook => WorkbookDecoder::raw_headers(&bytes),
    }
}

fn is_tab_separated(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("tsv"))
}

pub fn infer_kind(path: &Path) -> EntityKind {
    EntityKind::from_file_name(
        path.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default(),
    )
}

/// Decode each source into its collection. Kinds without a source stay empty.
pub fn load_dataset(sources: &[(EntityKind, &Path)], config: &EngineConfig) -> Result<Dataset> {
    let mut dataset = Dataset::default();
    for (kind, path) in sources {
        let upload = decode_file(path, Some(*kind), config)?;
        load_rows(&mut dataset, upload.kind, &upload.rows);
    }
    Ok(dataset)
}
