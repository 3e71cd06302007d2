//! Declarative check catalog.
//!
//! Every defect class maps to a fixed severity, an identifier slug, a message template and an
//! optional remediation hint. Validators only decide *whether* a check fires; wording and
//! severity live here so the policy can be audited in one place.
//!
//! Templates understand three placeholders: `{label}` (entity name, e.g. `Client`), `{field}`
//! (canonical field name) and `{value}` (the offending value or token).

use crate::domain::{CanonicalField, CheckKind, Diagnostic, EntityKind, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckSpec {
    pub check: CheckKind,
    pub severity: Severity,
    pub slug: &'static str,
    pub template: &'static str,
    pub suggestion: Option<&'static str>,
}

pub const ALL_CHECKS: [CheckKind; 17] = [
    CheckKind::MissingId,
    CheckKind::DuplicateId,
    CheckKind::InvalidNumber,
    CheckKind::PriorityRange,
    CheckKind::MaxLoadRange,
    CheckKind::QualificationRange,
    CheckKind::DurationRange,
    CheckKind::MaxConcurrentRange,
    CheckKind::InvalidAttributesJson,
    CheckKind::SlotsNotPositiveList,
    CheckKind::SlotsMalformed,
    CheckKind::UnknownTaskReference,
    CheckKind::UncoveredSkill,
    CheckKind::PhasesFormatUnclear,
    CheckKind::MissingClients,
    CheckKind::MissingWorkers,
    CheckKind::MissingTasks,
];

const fn entry(
    check: CheckKind,
    severity: Severity,
    slug: &'static str,
    template: &'static str,
    suggestion: Option<&'static str>,
) -> CheckSpec {
    CheckSpec {
        check,
        severity,
        slug,
        template,
        suggestion,
    }
}

pub fn spec(check: CheckKind) -> CheckSpec {
    use CheckKind::*;
    use Severity::{Error, Warning};

    match check {
        MissingId => entry(
            check,
            Error,
            "missing-id",
            "Missing {label} ID",
            Some("Fill in an identifier for every row"),
        ),
        DuplicateId => entry(
            check,
            Error,
            "duplicate",
            "Duplicate {label} ID: {value}",
            Some("Give each row a unique identifier or remove the repeated row"),
        ),
        InvalidNumber => entry(
            check,
            Error,
            "number",
            "{field} must be a whole number, got: {value}",
            Some("Enter an integer value or leave the cell empty"),
        ),
        PriorityRange => entry(
            check,
            Error,
            "priority",
            "Priority level must be between 1-5, got: {value}",
            Some("Use a priority between 1 (lowest) and 5 (highest)"),
        ),
        MaxLoadRange => entry(
            check,
            Error,
            "load",
            "MaxLoadPerPhase must be at least 1",
            Some("Set MaxLoadPerPhase to 1 or more"),
        ),
        QualificationRange => entry(
            check,
            Warning,
            "qualification",
            "Unusual qualification level: {value}",
            Some("Qualification levels usually range from 1 to 10"),
        ),
        DurationRange => entry(
            check,
            Error,
            "duration",
            "Duration must be at least 1",
            Some("Set Duration to the number of phases the task needs (1 or more)"),
        ),
        MaxConcurrentRange => entry(
            check,
            Error,
            "concurrent",
            "MaxConcurrent must be at least 1",
            Some("Set MaxConcurrent to 1 or more"),
        ),
        InvalidAttributesJson => entry(
            check,
            Error,
            "json",
            "Invalid JSON in AttributesJSON",
            Some("Use valid JSON, e.g. {\"location\":\"New York\"}"),
        ),
        SlotsNotPositiveList => entry(
            check,
            Error,
            "slots",
            "AvailableSlots must be array of positive numbers",
            Some("List phase numbers greater than zero, e.g. [1,2,3]"),
        ),
        SlotsMalformed => entry(
            check,
            Error,
            "slots-format",
            "Invalid format for AvailableSlots",
            Some("Write slots as a JSON array, e.g. [1,3,5]"),
        ),
        UnknownTaskReference => entry(
            check,
            Error,
            "unknown-task",
            "Unknown task ID referenced: {value}",
            Some("Add the task to the task sheet or remove it from RequestedTaskIDs"),
        ),
        UncoveredSkill => entry(
            check,
            Warning,
            "skill-coverage",
            "Required skill '{value}' not available in any worker",
            Some("Add a worker with this skill or adjust RequiredSkills"),
        ),
        PhasesFormatUnclear => entry(
            check,
            Warning,
            "phases-format",
            "PreferredPhases format unclear: {value}",
            Some("Use a range like 1-3 or a list like [1,2,3]"),
        ),
        MissingClients => entry(check, Error, "missing", "No client data found", None),
        MissingWorkers => entry(
            check,
            Warning,
            "missing",
            "No worker data found - tasks cannot be assigned",
            None,
        ),
        MissingTasks => entry(check, Warning, "missing", "No task data found", None),
    }
}

/// Where a finding applies
#[derive(Debug, Clone, Copy, Default)]
pub struct Location<'a> {
    pub row: Option<usize>,
    pub field: Option<CanonicalField>,
    /// Offending value, substituted for `{value}`
    pub value: &'a str,
    /// Disambiguates several findings of one check on the same row
    pub token: Option<&'a str>,
}

fn render(template: &str, entity: EntityKind, location: &Location<'_>) -> String {
    template
        .replace("{label}", entity.label())
        .replace("{field}", location.field.map(|f| f.as_str()).unwrap_or(""))
        .replace("{value}", location.value)
}

/// Stable identifier: `{entity}-{slug}-{row}[-{token}]`, or `{slug}-{collection}` for
/// dataset-level findings
fn diagnostic_id(slug: &str, entity: EntityKind, location: &Location<'_>) -> String {
    match location.row {
        Some(row) => {
            let mut id = format!("{}-{}-{}", entity.id_prefix(), slug, row);
            if let Some(token) = location.token {
                id.push('-');
                id.push_str(token);
            }
            id
        }
        None => format!("{}-{}", slug, entity.collection_name()),
    }
}

/// Materialize a finding into a diagnostic using the catalog entry for `check`
pub fn diagnostic(check: CheckKind, entity: EntityKind, location: Location<'_>) -> Diagnostic {
    let spec = spec(check);
    Diagnostic {
        id: diagnostic_id(spec.slug, entity, &location),
        severity: spec.severity,
        check,
        message: render(spec.template, entity, &location),
        entity,
        row_index: location.row,
        field: location.field,
        suggestion: spec.suggestion.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_is_total_and_consistent() {
        for check in ALL_CHECKS {
            assert_eq!(spec(check).check, check);
        }
    }

    #[test]
    fn test_warning_policy() {
        let warnings: HashSet<CheckKind> = ALL_CHECKS
            .iter()
            .copied()
            .filter(|c| spec(*c).severity == Severity::Warning)
            .collect();
        let expected: HashSet<CheckKind> = [
            CheckKind::QualificationRange,
            CheckKind::UncoveredSkill,
            CheckKind::PhasesFormatUnclear,
            CheckKind::MissingWorkers,
            CheckKind::MissingTasks,
        ]
        .into_iter()
        .collect();
        assert_eq!(warnings, expected);
    }

    #[test]
    fn test_row_diagnostic_rendering() {
        let d = diagnostic(
            CheckKind::DuplicateId,
            EntityKind::Client,
            Location {
                row: Some(2),
                field: Some(CanonicalField::ClientID),
                value: "C1",
                token: None,
            },
        );
        assert_eq!(d.id, "client-duplicate-2");
        assert_eq!(d.message, "Duplicate Client ID: C1");
        assert_eq!(d.severity, Severity::Error);
        assert!(d.suggestion.is_some());
    }

    #[test]
    fn test_token_and_dataset_ids() {
        let d = diagnostic(
            CheckKind::UnknownTaskReference,
            EntityKind::Client,
            Location {
                row: Some(0),
                field: Some(CanonicalField::RequestedTaskIDs),
                value: "T9",
                token: Some("T9"),
            },
        );
        assert_eq!(d.id, "client-unknown-task-0-T9");

        let d = diagnostic(CheckKind::MissingWorkers, EntityKind::Worker, Location::default());
        assert_eq!(d.id, "missing-workers");
        assert_eq!(d.row_index, None);
        assert_eq!(d.field, None);
    }
}
