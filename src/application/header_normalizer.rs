// Header synonym tables, one per entity kind.
//
// The same bare label ("id", "name", "group", "skills") means different things
// depending on which sheet is being read, so every lookup is scoped to a kind.
// Labels are matched after lower-casing and trimming. Anything that does not
// match is passed through untouched.

use std::collections::HashSet;

use serde::Serialize;
use tracing::warn;

use crate::domain::{CanonicalField, EntityKind};

pub const CLIENT_SYNONYMS: &[(&str, CanonicalField)] = &[
    ("client_id", CanonicalField::ClientID),
    ("clientid", CanonicalField::ClientID),
    ("id", CanonicalField::ClientID),
    ("client_name", CanonicalField::ClientName),
    ("clientname", CanonicalField::ClientName),
    ("name", CanonicalField::ClientName),
    ("priority", CanonicalField::PriorityLevel),
    ("priority_level", CanonicalField::PriorityLevel),
    ("prioritylevel", CanonicalField::PriorityLevel),
    ("requested_tasks", CanonicalField::RequestedTaskIDs),
    ("requestedtasks", CanonicalField::RequestedTaskIDs),
    ("requested_task_ids", CanonicalField::RequestedTaskIDs),
    ("requestedtaskids", CanonicalField::RequestedTaskIDs),
    ("tasks", CanonicalField::RequestedTaskIDs),
    ("group", CanonicalField::GroupTag),
    ("group_tag", CanonicalField::GroupTag),
    ("grouptag", CanonicalField::GroupTag),
    ("attributes", CanonicalField::AttributesJSON),
    ("attributes_json", CanonicalField::AttributesJSON),
    ("attributesjson", CanonicalField::AttributesJSON),
    ("metadata", CanonicalField::AttributesJSON),
];

pub const WORKER_SYNONYMS: &[(&str, CanonicalField)] = &[
    ("worker_id", CanonicalField::WorkerID),
    ("workerid", CanonicalField::WorkerID),
    ("id", CanonicalField::WorkerID),
    ("worker_name", CanonicalField::WorkerName),
    ("workername", CanonicalField::WorkerName),
    ("name", CanonicalField::WorkerName),
    ("skills", CanonicalField::Skills),
    ("skill", CanonicalField::Skills),
    ("available_slots", CanonicalField::AvailableSlots),
    ("availableslots", CanonicalField::AvailableSlots),
    ("slots", CanonicalField::AvailableSlots),
    ("max_load", CanonicalField::MaxLoadPerPhase),
    ("maxload", CanonicalField::MaxLoadPerPhase),
    ("max_load_per_phase", CanonicalField::MaxLoadPerPhase),
    ("maxloadperphase", CanonicalField::MaxLoadPerPhase),
    ("load", CanonicalField::MaxLoadPerPhase),
    ("worker_group", CanonicalField::WorkerGroup),
    ("workergroup", CanonicalField::WorkerGroup),
    ("group", CanonicalField::WorkerGroup),
    ("qualification", CanonicalField::QualificationLevel),
    ("qualification_level", CanonicalField::QualificationLevel),
    ("qualificationlevel", CanonicalField::QualificationLevel),
    ("level", CanonicalField::QualificationLevel),
];

pub const TASK_SYNONYMS: &[(&str, CanonicalField)] = &[
    ("task_id", CanonicalField::TaskID),
    ("taskid", CanonicalField::TaskID),
    ("id", CanonicalField::TaskID),
    ("task_name", CanonicalField::TaskName),
    ("taskname", CanonicalField::TaskName),
    ("name", CanonicalField::TaskName),
    ("category", CanonicalField::Category),
    ("type", CanonicalField::Category),
    ("duration", CanonicalField::Duration),
    ("time", CanonicalField::Duration),
    ("required_skills", CanonicalField::RequiredSkills),
    ("requiredskills", CanonicalField::RequiredSkills),
    ("skills", CanonicalField::RequiredSkills),
    ("preferred_phases", CanonicalField::PreferredPhases),
    ("preferredphases", CanonicalField::PreferredPhases),
    ("phases", CanonicalField::PreferredPhases),
    ("max_concurrent", CanonicalField::MaxConcurrent),
    ("maxconcurrent", CanonicalField::MaxConcurrent),
    ("concurrent", CanonicalField::MaxConcurrent),
    ("concurrency", CanonicalField::MaxConcurrent),
];

pub fn synonyms_for(kind: EntityKind) -> &'static [(&'static str, CanonicalField)] {
    match kind {
        EntityKind::Client => CLIENT_SYNONYMS,
        EntityKind::Worker => WORKER_SYNONYMS,
        EntityKind::Task => TASK_SYNONYMS,
    }
}

/// Resolve a raw label to a canonical field of `kind`, if any synonym matches
pub fn resolve_field(kind: EntityKind, raw: &str) -> Option<CanonicalField> {
    let key = raw.trim().to_lowercase();
    synonyms_for(kind)
        .iter()
        .find(|(synonym, _)| *synonym == key)
        .map(|(_, field)| *field)
}

/// Map a raw column label to its canonical name for `kind`.
/// Unrecognized labels come back unchanged.
pub fn normalize_header(kind: EntityKind, raw: &str) -> String {
    match resolve_field(kind, raw) {
        Some(field) => field.as_str().to_string(),
        None => raw.to_string(),
    }
}

/// Normalize a whole header row. A name that already appeared earlier in the row is
/// renamed `{name}_{n}` (first free `n` from 1) so its column survives as pass-through.
pub fn normalize_headers<S: AsRef<str>>(kind: EntityKind, raw: &[S]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut headers = Vec::with_capacity(raw.len());

    for label in raw {
        let name = normalize_header(kind, label.as_ref());
        let unique = if taken.contains(&name) {
            let renamed = (1..)
                .map(|n| format!("{}_{}", name, n))
                .find(|candidate| !taken.contains(candidate))
                .unwrap_or_default();
            warn!(
                entity = %kind,
                header = label.as_ref(),
                renamed = %renamed,
                "Duplicate column, keeping it as pass-through"
            );
            renamed
        } else {
            name
        };
        taken.insert(unique.clone());
        headers.push(unique);
    }

    headers
}

/// Outcome of mapping one header, for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderMatch {
    pub raw: String,
    pub canonical: String,
    pub matched: bool,
}

pub fn map_headers<S: AsRef<str>>(kind: EntityKind, headers: &[S]) -> Vec<HeaderMatch> {
    headers
        .iter()
        .map(|h| {
            let raw = h.as_ref();
            let field = resolve_field(kind, raw);
            HeaderMatch {
                raw: raw.to_string(),
                canonical: field
                    .map(|f| f.as_str().to_string())
                    .unwrap_or_else(|| raw.to_string()),
                matched: field.is_some(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_id_variants_converge() {
        let a = normalize_header(EntityKind::Client, "Client_ID");
        let b = normalize_header(EntityKind::Client, "clientid");
        let c = normalize_header(EntityKind::Client, "id");
        assert_eq!(a, "ClientID");
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_bare_id_is_kind_scoped() {
        assert_eq!(normalize_header(EntityKind::Worker, "ID"), "WorkerID");
        assert_eq!(normalize_header(EntityKind::Task, " id "), "TaskID");
        assert_eq!(normalize_header(EntityKind::Worker, "group"), "WorkerGroup");
        assert_eq!(normalize_header(EntityKind::Client, "group"), "GroupTag");
        assert_eq!(normalize_header(EntityKind::Task, "skills"), "RequiredSkills");
    }

    #[test]
    fn test_unknown_header_passes_through() {
        assert_eq!(normalize_header(EntityKind::Client, "  Region Code "), "  Region Code ");
        assert_eq!(normalize_header(EntityKind::Task, "Client_ID"), "Client_ID");
    }

    #[test]
    fn test_canonical_names_are_fixed_points() {
        for kind in EntityKind::ALL {
            for field in CanonicalField::for_kind(kind) {
                let once = normalize_header(kind, field.as_str());
                assert_eq!(once, field.as_str());
                assert_eq!(normalize_header(kind, &once), once);
            }
        }
    }

    #[test]
    fn test_repeated_field_is_renamed() {
        let headers = normalize_headers(EntityKind::Client, &["id", "client_id", "name", "ClientID_1"]);
        assert_eq!(headers, vec!["ClientID", "ClientID_1", "ClientName", "ClientID_1_1"]);

        let headers = normalize_headers(EntityKind::Worker, &["skill", "Skills", "skills"]);
        assert_eq!(headers, vec!["Skills", "Skills_1", "Skills_2"]);
    }

    #[test]
    fn test_map_headers_reports_matches() {
        let matches = map_headers(EntityKind::Worker, &["Slots", "Shift"]);
        assert_eq!(matches[0].canonical, "AvailableSlots");
        assert!(matches[0].matched);
        assert_eq!(matches[1].canonical, "Shift");
        assert!(!matches[1].matched);
    }
}
