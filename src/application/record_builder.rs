// ============================================================
// RECORD BUILDER
// ============================================================
// Turn decoded rows (canonical or pass-through keys, string values)
// into typed records. Never fails: missing cells become empty text
// or `NumericField::Missing`, unknown columns are kept in `extra`.

use crate::domain::{
    CanonicalField, Client, Dataset, EntityKind, NumericField, RawField, RawRow, Task, Worker,
};

fn text(row: &RawRow, field: CanonicalField) -> String {
    row.get(field.as_str()).unwrap_or("").trim().to_string()
}

fn number(row: &RawRow, field: CanonicalField) -> NumericField {
    NumericField::parse(row.get(field.as_str()).unwrap_or(""))
}

fn extra_fields(row: &RawRow, known: &[CanonicalField]) -> Vec<RawField> {
    row.fields
        .iter()
        .filter(|f| !known.iter().any(|k| k.as_str() == f.name))
        .cloned()
        .collect()
}

pub fn client_from_row(row: &RawRow) -> Client {
    Client {
        client_id: text(row, CanonicalField::ClientID),
        client_name: text(row, CanonicalField::ClientName),
        priority_level: number(row, CanonicalField::PriorityLevel),
        requested_task_ids: text(row, CanonicalField::RequestedTaskIDs),
        group_tag: text(row, CanonicalField::GroupTag),
        attributes_json: text(row, CanonicalField::AttributesJSON),
        extra: extra_fields(row, CanonicalField::for_kind(EntityKind::Client)),
    }
}

pub fn worker_from_row(row: &RawRow) -> Worker {
    Worker {
        worker_id: text(row, CanonicalField::WorkerID),
        worker_name: text(row, CanonicalField::WorkerName),
        skills: text(row, CanonicalField::Skills),
        available_slots: text(row, CanonicalField::AvailableSlots),
        max_load_per_phase: number(row, CanonicalField::MaxLoadPerPhase),
        worker_group: text(row, CanonicalField::WorkerGroup),
        qualification_level: number(row, CanonicalField::QualificationLevel),
        extra: extra_fields(row, CanonicalField::for_kind(EntityKind::Worker)),
    }
}

pub fn task_from_row(row: &RawRow) -> Task {
    Task {
        task_id: text(row, CanonicalField::TaskID),
        task_name: text(row, CanonicalField::TaskName),
        category: text(row, CanonicalField::Category),
        duration: number(row, CanonicalField::Duration),
        required_skills: text(row, CanonicalField::RequiredSkills),
        preferred_phases: text(row, CanonicalField::PreferredPhases),
        max_concurrent: number(row, CanonicalField::MaxConcurrent),
        extra: extra_fields(row, CanonicalField::for_kind(EntityKind::Task)),
    }
}

pub fn build_clients(rows: &[RawRow]) -> Vec<Client> {
    rows.iter().map(client_from_row).collect()
}

pub fn build_workers(rows: &[RawRow]) -> Vec<Worker> {
    rows.iter().map(worker_from_row).collect()
}

pub fn build_tasks(rows: &[RawRow]) -> Vec<Task> {
    rows.iter().map(task_from_row).collect()
}

/// Replace the collection of `kind` in `dataset` with records built from `rows`
pub fn load_rows(dataset: &mut Dataset, kind: EntityKind, rows: &[RawRow]) {
    match kind {
        EntityKind::Client => dataset.clients = build_clients(rows),
        EntityKind::Worker => dataset.workers = build_workers(rows),
        EntityKind::Task => dataset.tasks = build_tasks(rows),
    }
}
