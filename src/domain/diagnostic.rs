// ============================================================
// DIAGNOSTICS
// ============================================================
// One unit of validation output, tied to an entity kind and,
// when applicable, a row and a field

use serde::{Deserialize, Serialize};

use super::entity::EntityKind;
use super::records::CanonicalField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Every defect class the validators can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    MissingId,
    DuplicateId,
    InvalidNumber,
    PriorityRange,
    MaxLoadRange,
    QualificationRange,
    DurationRange,
    MaxConcurrentRange,
    InvalidAttributesJson,
    SlotsNotPositiveList,
    SlotsMalformed,
    UnknownTaskReference,
    UncoveredSkill,
    PhasesFormatUnclear,
    MissingClients,
    MissingWorkers,
    MissingTasks,
}

/// A single validation finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// Stable identifier; identical input yields identical ids
    pub id: String,
    #[serde(rename = "type")]
    pub severity: Severity,
    pub check: CheckKind,
    pub message: String,
    pub entity: EntityKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<CanonicalField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Diagnostic {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.severity, self.entity)?;
        if let Some(row) = self.row_index {
            write!(f, " row {}", row + 1)?;
        }
        if let Some(field) = self.field {
            write!(f, " ({})", field)?;
        }
        write!(f, ": {}", self.message)
    }
}
