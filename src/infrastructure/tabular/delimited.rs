// ============================================================
// DELIMITED TEXT DECODER
// ============================================================
// CSV/TSV decoding with encoding detection, delimiter detection
// and kind-aware header normalization

use std::borrow::Cow;

use csv::{Reader, ReaderBuilder, StringRecord, Trim};
use encoding_rs::{Encoding, WINDOWS_1252};
use tracing::warn;

use crate::application::header_normalizer::normalize_headers;
use crate::domain::error::{AppError, Result};
use crate::domain::{EntityKind, RawField, RawRow};

use super::reject_surplus;

/// Delimited text decoder. Headers and values are trimmed.
#[derive(Default)]
pub struct DelimitedDecoder {
    /// Fixed delimiter; detected from the content when `None`
    delimiter: Option<u8>,
}

impl DelimitedDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Decode raw bytes into rows keyed by canonical (or pass-through) names
    pub fn decode(&self, bytes: &[u8], kind: EntityKind) -> Result<Vec<RawRow>> {
        let content = decode_text(bytes);
        self.decode_str(&content, kind)
    }

    /// Header labels exactly as written in the file
    pub fn raw_headers(&self, bytes: &[u8]) -> Result<Vec<String>> {
        let content = decode_text(bytes);
        let mut reader = self.reader(&content);
        let headers = reader
            .headers()
            .map_err(|e| AppError::ParseError(format!("Failed to read CSV headers: {}", e)))?;
        Ok(headers.iter().map(str::to_string).collect())
    }

    /// Decode already-decoded text. A row with non-empty cells past the last header is
    /// rejected.
    pub fn decode_str(&self, content: &str, kind: EntityKind) -> Result<Vec<RawRow>> {
        let mut reader = self.reader(content);

        let raw: Vec<String> = reader
            .headers()
            .map_err(|e| AppError::ParseError(format!("Failed to read CSV headers: {}", e)))?
            .iter()
            .map(str::to_string)
            .collect();
        let headers = normalize_headers(kind, &raw);

        let mut rows = Vec::new();
        for (line, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::ParseError(format!("Failed to parse CSV row {}: {}", line + 1, e))
            })?;
            reject_surplus(line + 1, headers.len(), record.iter())?;

            let row = build_row(rows.len(), &headers, &record);
            if row.is_blank() {
                continue;
            }
            rows.push(row);
        }

        Ok(rows)
    }

    fn reader<'a>(&self, content: &'a str) -> Reader<&'a [u8]> {
        let delimiter = self
            .delimiter
            .unwrap_or_else(|| detect_delimiter(content));

        ReaderBuilder::new()
            .delimiter(delimiter)
            .trim(Trim::All)
            .flexible(true) // Allow rows with different lengths
            .from_reader(content.as_bytes())
    }
}

/// Pair each header with its cell; short rows are padded with empty strings
fn build_row(index: usize, headers: &[String], record: &StringRecord) -> RawRow {
    let fields = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| RawField {
            name: header.clone(),
            value: record.get(idx).unwrap_or("").to_string(),
        })
        .collect();
    RawRow::new(index, fields)
}

/// Decode bytes to text: honour a BOM, otherwise UTF-8 with a Windows-1252 fallback
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        if had_errors {
            warn!(encoding = encoding.name(), "Replaced malformed sequences while decoding");
        }
        return text;
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => {
            warn!("Input is not valid UTF-8, decoding as Windows-1252");
            let (text, _, _) = WINDOWS_1252.decode(bytes);
            text
        }
    }
}

/// Detect delimiter from content (comma, semicolon, tab, pipe)
pub fn detect_delimiter(content: &str) -> u8 {
    let candidates = [b',', b';', b'\t', b'|'];
    let sample_lines: Vec<&str> = content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(10)
        .collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best_delimiter = b',';
    let mut best_score = 0.0f32;

    for &delimiter in &candidates {
        let field_counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| line.bytes().filter(|&b| b == delimiter).count())
            .collect();

        // Score by consistency (low standard deviation) and frequency
        let avg = field_counts.iter().sum::<usize>() as f32 / field_counts.len() as f32;
        let variance = field_counts
            .iter()
            .map(|&x| (x as f32 - avg).powi(2))
            .sum::<f32>()
            / field_counts.len() as f32;

        let score = avg / (1.0 + variance.sqrt());

        if score > best_score {
            best_score = score;
            best_delimiter = delimiter;
        }
    }

    best_delimiter
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_client_sheet() {
        let content = "Client_ID,Name,Priority,Region\nC1,Acme,3,EMEA\nC2,Globex,1,\n";
        let rows = DelimitedDecoder::new()
            .decode(content.as_bytes(), EntityKind::Client)
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("ClientID"), Some("C1"));
        assert_eq!(rows[0].get("ClientName"), Some("Acme"));
        assert_eq!(rows[0].get("PriorityLevel"), Some("3"));
        assert_eq!(rows[0].get("Region"), Some("EMEA"));
        assert_eq!(rows[1].get("Region"), Some(""));
        assert_eq!(rows[1].index, 1);
    }

    #[test]
    fn test_quoted_lists_survive() {
        let content = "TaskID,RequiredSkills,PreferredPhases\nT1,\"python, sql\",\"[1,2]\"\n";
        let rows = DelimitedDecoder::new()
            .decode(content.as_bytes(), EntityKind::Task)
            .unwrap();
        assert_eq!(rows[0].get("RequiredSkills"), Some("python, sql"));
        assert_eq!(rows[0].get("PreferredPhases"), Some("[1,2]"));
    }

    #[test]
    fn test_blank_rows_skipped_and_short_rows_padded() {
        let content = "id;skills;slots\nW1;a,b\n;;\nW2;c;[1]\n";
        let rows = DelimitedDecoder::new()
            .decode(content.as_bytes(), EntityKind::Worker)
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("WorkerID"), Some("W1"));
        assert_eq!(rows[0].get("AvailableSlots"), Some(""));
        assert_eq!(rows[1].get("WorkerID"), Some("W2"));
        assert_eq!(rows[1].index, 1);
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a,b,c\nd,e,f"), b',');
        assert_eq!(detect_delimiter("a;b;c\nd;e;f"), b';');
        assert_eq!(detect_delimiter("a\tb\tc\nd\te\tf"), b'\t');
        assert_eq!(detect_delimiter(""), b',');
    }

    #[test]
    fn test_decode_text_handles_bom_and_latin1() {
        let with_bom = b"\xEF\xBB\xBFid\nC1\n";
        assert_eq!(decode_text(with_bom), "id\nC1\n");

        let latin1 = b"name\nCaf\xE9\n";
        assert_eq!(decode_text(latin1), "name\nCaf\u{e9}\n");
    }

    #[test]
    fn test_repeated_canonical_column_kept() {
        let rows = DelimitedDecoder::new()
            .decode(b"id,client_id,name\nC1,C2,Acme\n", EntityKind::Client)
            .unwrap();
        assert_eq!(rows[0].get("ClientID"), Some("C1"));
        assert_eq!(rows[0].get("ClientID_1"), Some("C2"));
        assert_eq!(rows[0].get("ClientName"), Some("Acme"));
    }

    #[test]
    fn test_surplus_cells_rejected() {
        let result = DelimitedDecoder::new()
            .decode(b"ClientID,PriorityLevel\nC1,3\nC2,3,surplus\n", EntityKind::Client);
        match result {
            Err(AppError::ParseError(msg)) => assert!(msg.contains("row 2"), "{}", msg),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_trailing_empty_cells_allowed() {
        let rows = DelimitedDecoder::new()
            .decode(b"ClientID,PriorityLevel\nC1,3,,\n", EntityKind::Client)
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].fields.len(), 2);
    }

    #[test]
    fn test_raw_headers_untouched() {
        let headers = DelimitedDecoder::new()
            .with_delimiter(b'|')
            .raw_headers(b"Client_ID|Name\nC1|Acme\n")
            .unwrap();
        assert_eq!(headers, vec!["Client_ID".to_string(), "Name".to_string()]);
    }

    #[test]
    fn test_header_only_input() {
        let rows = DelimitedDecoder::new()
            .decode(b"TaskID,Duration\n", EntityKind::Task)
            .unwrap();
        assert!(rows.is_empty());
    }
}
