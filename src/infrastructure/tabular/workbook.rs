// ============================================================
// WORKBOOK DECODER
// ============================================================
// First worksheet of an xlsx/xls/ods workbook, first row as headers

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use tracing::debug;

use crate::application::header_normalizer::normalize_headers;
use crate::domain::error::{AppError, Result};
use crate::domain::{EntityKind, RawField, RawRow};

use super::reject_surplus;

pub struct WorkbookDecoder;

impl WorkbookDecoder {
    pub fn decode(bytes: &[u8], kind: EntityKind) -> Result<Vec<RawRow>> {
        rows_from_range(&first_sheet(bytes)?, kind)
    }

    /// Header labels exactly as written in the first worksheet
    pub fn raw_headers(bytes: &[u8]) -> Result<Vec<String>> {
        let range = first_sheet(bytes)?;
        let first = range
            .rows()
            .next()
            .ok_or_else(|| AppError::ParseError("Empty spreadsheet".to_string()))?;
        Ok(first.iter().map(cell_text).collect())
    }
}

fn first_sheet(bytes: &[u8]) -> Result<Range<Data>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| AppError::ParseError(format!("Failed to open workbook: {}", e)))?;

    workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::ParseError("No worksheet found".to_string()))?
        .map_err(|e| AppError::ParseError(format!("Failed to read worksheet: {}", e)))
}

/// Convert a worksheet range into rows; the first row holds the headers.
/// Trailing unlabeled columns must be empty in every data row.
pub fn rows_from_range(range: &Range<Data>, kind: EntityKind) -> Result<Vec<RawRow>> {
    let mut sheet_rows = range.rows();

    let mut labels: Vec<String> = sheet_rows
        .next()
        .ok_or_else(|| AppError::ParseError("Empty spreadsheet".to_string()))?
        .iter()
        .map(cell_text)
        .collect();
    while labels.last().is_some_and(|l| l.is_empty()) {
        labels.pop();
    }
    let headers = normalize_headers(kind, &labels);

    let mut rows = Vec::new();
    for (line, sheet_row) in sheet_rows.enumerate() {
        let cells: Vec<String> = sheet_row.iter().map(cell_text).collect();
        reject_surplus(line + 1, headers.len(), cells.iter().map(String::as_str))?;

        let fields: Vec<RawField> = headers
            .iter()
            .enumerate()
            .map(|(idx, header)| RawField {
                name: header.clone(),
                value: cells.get(idx).cloned().unwrap_or_default(),
            })
            .collect();

        let row = RawRow::new(rows.len(), fields);
        if row.is_blank() {
            continue;
        }
        rows.push(row);
    }

    debug!(entity = %kind, rows = rows.len(), "Decoded worksheet");
    Ok(rows)
}

/// Render a cell as text. Integral floats print without a fractional part.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
