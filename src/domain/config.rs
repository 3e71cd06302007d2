// ============================================================
// ENGINE CONFIGURATION
// ============================================================
// Upload limits, report capping and export options

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::error::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct EngineConfig {
    /// Largest accepted upload in bytes (default: 10 MiB)
    #[validate(range(min = 1))]
    pub max_file_size: u64,

    /// Accepted file extensions, without the dot
    #[validate(length(min = 1))]
    pub allowed_extensions: Vec<String>,

    /// Maximum number of diagnostics kept in a report (default: 100).
    /// Counts in the summary always reflect the full run.
    #[validate(range(min = 1))]
    pub max_diagnostics: usize,

    /// Write validation_report.json alongside the cleaned data
    pub include_validation_report: bool,

    /// What an export writes: `csv` for the cleaned sheets, `json` for the rules
    /// and report documents
    #[validate(length(min = 1))]
    pub export_formats: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024,
            allowed_extensions: vec!["csv".to_string(), "xlsx".to_string(), "xls".to_string()],
            max_diagnostics: 100,
            include_validation_report: true,
            export_formats: vec!["csv".to_string(), "json".to_string()],
        }
    }
}

impl EngineConfig {
    /// Validate configuration values
    pub fn check(&self) -> Result<()> {
        self.validate()
            .map_err(|e| AppError::ConfigError(format!("Invalid engine config: {}", e)))?;
        if let Some(unknown) = self
            .export_formats
            .iter()
            .find(|f| ExportFormat::parse(f).is_none())
        {
            return Err(AppError::ConfigError(format!(
                "Unknown export format '{}' (expected csv or json)",
                unknown
            )));
        }
        Ok(())
    }

    pub fn exports(&self, format: ExportFormat) -> bool {
        self.export_formats
            .iter()
            .any(|f| ExportFormat::parse(f) == Some(format))
    }

    /// Case-insensitive extension check; accepts a leading dot
    pub fn is_allowed_extension(&self, ext: &str) -> bool {
        let ext = ext.trim_start_matches('.').to_lowercase();
        self.allowed_extensions
            .iter()
            .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(&ext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(EngineConfig::default().check().is_ok());
    }

    #[test]
    fn test_rejects_zero_limits() {
        let config = EngineConfig {
            max_diagnostics: 0,
            ..Default::default()
        };
        assert!(matches!(config.check(), Err(AppError::ConfigError(_))));

        let config = EngineConfig {
            allowed_extensions: vec![],
            ..Default::default()
        };
        assert!(config.check().is_err());
    }

    #[test]
    fn test_export_formats() {
        let config = EngineConfig {
            export_formats: vec!["CSV".to_string()],
            ..Default::default()
        };
        assert!(config.check().is_ok());
        assert!(config.exports(ExportFormat::Csv));
        assert!(!config.exports(ExportFormat::Json));

        let config = EngineConfig {
            export_formats: vec!["csv".to_string(), "xml".to_string()],
            ..Default::default()
        };
        assert!(matches!(config.check(), Err(AppError::ConfigError(msg)) if msg.contains("xml")));
    }

    #[test]
    fn test_extension_matching() {
        let config = EngineConfig::default();
        assert!(config.is_allowed_extension("CSV"));
        assert!(config.is_allowed_extension(".xlsx"));
        assert!(!config.is_allowed_extension("pdf"));
    }
}
