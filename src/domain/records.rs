// ============================================================
// CANONICAL RECORDS
// ============================================================
// Fixed schema for the three entity kinds plus the raw row shape
// produced by the tabular decoder

use serde::{Deserialize, Serialize};

use super::entity::EntityKind;

/// One canonical attribute of a Client, Worker or Task record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanonicalField {
    ClientID,
    ClientName,
    PriorityLevel,
    RequestedTaskIDs,
    GroupTag,
    AttributesJSON,
    WorkerID,
    WorkerName,
    Skills,
    AvailableSlots,
    MaxLoadPerPhase,
    WorkerGroup,
    QualificationLevel,
    TaskID,
    TaskName,
    Category,
    Duration,
    RequiredSkills,
    PreferredPhases,
    MaxConcurrent,
}

const CLIENT_FIELDS: &[CanonicalField] = &[
    CanonicalField::ClientID,
    CanonicalField::ClientName,
    CanonicalField::PriorityLevel,
    CanonicalField::RequestedTaskIDs,
    CanonicalField::GroupTag,
    CanonicalField::AttributesJSON,
];

const WORKER_FIELDS: &[CanonicalField] = &[
    CanonicalField::WorkerID,
    CanonicalField::WorkerName,
    CanonicalField::Skills,
    CanonicalField::AvailableSlots,
    CanonicalField::MaxLoadPerPhase,
    CanonicalField::WorkerGroup,
    CanonicalField::QualificationLevel,
];

const TASK_FIELDS: &[CanonicalField] = &[
    CanonicalField::TaskID,
    CanonicalField::TaskName,
    CanonicalField::Category,
    CanonicalField::Duration,
    CanonicalField::RequiredSkills,
    CanonicalField::PreferredPhases,
    CanonicalField::MaxConcurrent,
];

impl CanonicalField {
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalField::ClientID => "ClientID",
            CanonicalField::ClientName => "ClientName",
            CanonicalField::PriorityLevel => "PriorityLevel",
            CanonicalField::RequestedTaskIDs => "RequestedTaskIDs",
            CanonicalField::GroupTag => "GroupTag",
            CanonicalField::AttributesJSON => "AttributesJSON",
            CanonicalField::WorkerID => "WorkerID",
            CanonicalField::WorkerName => "WorkerName",
            CanonicalField::Skills => "Skills",
            CanonicalField::AvailableSlots => "AvailableSlots",
            CanonicalField::MaxLoadPerPhase => "MaxLoadPerPhase",
            CanonicalField::WorkerGroup => "WorkerGroup",
            CanonicalField::QualificationLevel => "QualificationLevel",
            CanonicalField::TaskID => "TaskID",
            CanonicalField::TaskName => "TaskName",
            CanonicalField::Category => "Category",
            CanonicalField::Duration => "Duration",
            CanonicalField::RequiredSkills => "RequiredSkills",
            CanonicalField::PreferredPhases => "PreferredPhases",
            CanonicalField::MaxConcurrent => "MaxConcurrent",
        }
    }

    /// Canonical fields of one entity kind, in export column order
    pub fn for_kind(kind: EntityKind) -> &'static [CanonicalField] {
        match kind {
            EntityKind::Client => CLIENT_FIELDS,
            EntityKind::Worker => WORKER_FIELDS,
            EntityKind::Task => TASK_FIELDS,
        }
    }
}

impl std::fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single cell of a decoded row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawField {
    /// Canonical name, or the original header when no synonym matched
    pub name: String,
    pub value: String,
}

/// A decoded row in column order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    /// Row index (0-based, header row excluded)
    pub index: usize,
    pub fields: Vec<RawField>,
}

impl RawRow {
    pub fn new(index: usize, fields: Vec<RawField>) -> Self {
        Self { index, fields }
    }

    /// Build a row from `(name, value)` pairs
    pub fn from_pairs<K, V>(index: usize, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let fields = pairs
            .into_iter()
            .map(|(name, value)| RawField {
                name: name.into(),
                value: value.into(),
            })
            .collect();
        Self { index, fields }
    }

    /// First value stored under `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|f| f.value.trim().is_empty())
    }
}

/// An integer cell after coercion.
///
/// Spreadsheet cells arrive as text; an empty cell is `Missing` and is not range checked,
/// text that is not an integer is kept verbatim as `Invalid`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericField {
    #[default]
    Missing,
    Value(i64),
    Invalid(String),
}

impl NumericField {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return NumericField::Missing;
        }
        if let Ok(v) = trimmed.parse::<i64>() {
            return NumericField::Value(v);
        }
        // Workbooks hand back integral numbers as floats ("3.0")
        match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                NumericField::Value(f as i64)
            }
            _ => NumericField::Invalid(trimmed.to_string()),
        }
    }

    /// Text form used when writing cleaned output
    pub fn to_cell(&self) -> String {
        match self {
            NumericField::Missing => String::new(),
            NumericField::Value(v) => v.to_string(),
            NumericField::Invalid(raw) => raw.clone(),
        }
    }
}

impl From<i64> for NumericField {
    fn from(v: i64) -> Self {
        NumericField::Value(v)
    }
}

/// Shared view over the three record types
pub trait Record {
    const KIND: EntityKind;

    /// Cell values in `CanonicalField::for_kind` order
    fn canonical_cells(&self) -> Vec<String>;

    /// Columns that matched no synonym, in original order
    fn extra(&self) -> &[RawField];
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Client {
    pub client_id: String,
    pub client_name: String,
    pub priority_level: NumericField,
    pub requested_task_ids: String,
    pub group_tag: String,
    pub attributes_json: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<RawField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Worker {
    pub worker_id: String,
    pub worker_name: String,
    pub skills: String,
    pub available_slots: String,
    pub max_load_per_phase: NumericField,
    pub worker_group: String,
    pub qualification_level: NumericField,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<RawField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Task {
    pub task_id: String,
    pub task_name: String,
    pub category: String,
    pub duration: NumericField,
    pub required_skills: String,
    pub preferred_phases: String,
    pub max_concurrent: NumericField,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<RawField>,
}

impl Record for Client {
    const KIND: EntityKind = EntityKind::Client;

    fn canonical_cells(&self) -> Vec<String> {
        vec![
            self.client_id.clone(),
            self.client_name.clone(),
            self.priority_level.to_cell(),
            self.requested_task_ids.clone(),
            self.group_tag.clone(),
            self.attributes_json.clone(),
        ]
    }

    fn extra(&self) -> &[RawField] {
        &self.extra
    }
}

impl Record for Worker {
    const KIND: EntityKind = EntityKind::Worker;

    fn canonical_cells(&self) -> Vec<String> {
        vec![
            self.worker_id.clone(),
            self.worker_name.clone(),
            self.skills.clone(),
            self.available_slots.clone(),
            self.max_load_per_phase.to_cell(),
            self.worker_group.clone(),
            self.qualification_level.to_cell(),
        ]
    }

    fn extra(&self) -> &[RawField] {
        &self.extra
    }
}

impl Record for Task {
    const KIND: EntityKind = EntityKind::Task;

    fn canonical_cells(&self) -> Vec<String> {
        vec![
            self.task_id.clone(),
            self.task_name.clone(),
            self.category.clone(),
            self.duration.to_cell(),
            self.required_skills.clone(),
            self.preferred_phases.clone(),
            self.max_concurrent.to_cell(),
        ]
    }

    fn extra(&self) -> &[RawField] {
        &self.extra
    }
}

/// Split a comma-separated list, trimming tokens and dropping empty ones
pub fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_parse() {
        assert_eq!(NumericField::parse(""), NumericField::Missing);
        assert_eq!(NumericField::parse("  "), NumericField::Missing);
        assert_eq!(NumericField::parse(" 4 "), NumericField::Value(4));
        assert_eq!(NumericField::parse("-2"), NumericField::Value(-2));
        assert_eq!(NumericField::parse("3.0"), NumericField::Value(3));
        assert_eq!(
            NumericField::parse("2.5"),
            NumericField::Invalid("2.5".to_string())
        );
        assert_eq!(
            NumericField::parse("high"),
            NumericField::Invalid("high".to_string())
        );
    }

    #[test]
    fn test_canonical_lookup() {
        assert_eq!(CanonicalField::for_kind(EntityKind::Task).len(), 7);
    }

    #[test]
    fn test_split_list() {
        let tokens: Vec<&str> = split_list(" T1, ,T2 ,,").collect();
        assert_eq!(tokens, vec!["T1", "T2"]);
    }

    #[test]
    fn test_raw_row_get_returns_first() {
        let row = RawRow::from_pairs(0, [("ClientID", "C1"), ("ClientID", "C2")]);
        assert_eq!(row.get("ClientID"), Some("C1"));
        assert_eq!(row.get("Missing"), None);
    }
}
