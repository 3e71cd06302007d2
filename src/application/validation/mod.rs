//! Multi-pass dataset validation.
//!
//! Each entity validator judges records of one kind and reads (never mutates) the collection
//! it depends on: clients need task ids, tasks need worker skills, workers need nothing. The
//! cross-reference pass decides whether the dataset is usable at all. Per record, findings are
//! appended in a fixed order (identifier, range, format, list reference, pattern) and records
//! are visited in collection order, so identical input always yields an identical report.

pub mod catalog;
mod clients;
mod cross_reference;
mod report;
mod tasks;
mod workers;

#[cfg(test)]
mod tests;

use std::borrow::Cow;
use std::collections::HashSet;

use tracing::debug;

use crate::domain::{
    CanonicalField, CheckKind, Client, Dataset, Diagnostic, EntityKind, NumericField, Task,
    Worker,
};

use catalog::Location;

pub use clients::validate_clients;
pub use cross_reference::validate_cross_references;
pub use report::{ReportSummary, SeverityCounts, ValidationReport};
pub use tasks::validate_tasks;
pub use workers::validate_workers;

/// Run every validator in order (clients, workers, tasks, cross references) and concatenate
/// their findings. Total: never fails for well-shaped input.
pub fn validate(clients: &[Client], workers: &[Worker], tasks: &[Task]) -> Vec<Diagnostic> {
    let mut diagnostics = validate_clients(clients, tasks);
    diagnostics.extend(validate_workers(workers));
    diagnostics.extend(validate_tasks(tasks, workers));
    diagnostics.extend(validate_cross_references(clients, workers, tasks));

    debug!(
        clients = clients.len(),
        workers = workers.len(),
        tasks = tasks.len(),
        diagnostics = diagnostics.len(),
        "validation run complete"
    );

    diagnostics
}

pub fn validate_dataset(dataset: &Dataset) -> Vec<Diagnostic> {
    validate(&dataset.clients, &dataset.workers, &dataset.tasks)
}

/// Collects findings for one entity kind
pub(crate) struct Findings {
    entity: EntityKind,
    out: Vec<Diagnostic>,
}

impl Findings {
    pub(crate) fn new(entity: EntityKind) -> Self {
        Self {
            entity,
            out: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, check: CheckKind, location: Location<'_>) {
        self.out.push(catalog::diagnostic(check, self.entity, location));
    }

    pub(crate) fn at(
        &mut self,
        check: CheckKind,
        row: usize,
        field: CanonicalField,
        value: &str,
    ) {
        self.push(
            check,
            Location {
                row: Some(row),
                field: Some(field),
                value,
                token: None,
            },
        );
    }

    /// Identifier pass: missing ids, then repeats of an id already seen earlier in the
    /// collection. Every occurrence after the first is reported.
    pub(crate) fn check_identifier<'a>(
        &mut self,
        seen: &mut HashSet<&'a str>,
        row: usize,
        field: CanonicalField,
        id: &'a str,
    ) {
        if id.is_empty() {
            self.at(CheckKind::MissingId, row, field, id);
        }
        if !seen.insert(id) {
            self.at(CheckKind::DuplicateId, row, field, id);
        }
    }

    /// Range pass for one integer field. Missing values are skipped; text that is not an
    /// integer is reported once; values failing `in_range` raise `out_of_range`.
    pub(crate) fn check_number(
        &mut self,
        row: usize,
        field: CanonicalField,
        value: &NumericField,
        in_range: impl Fn(i64) -> bool,
        out_of_range: CheckKind,
    ) {
        match value {
            NumericField::Missing => {}
            NumericField::Invalid(raw) => self.push(
                CheckKind::InvalidNumber,
                Location {
                    row: Some(row),
                    field: Some(field),
                    value: raw,
                    token: Some(field.as_str()),
                },
            ),
            NumericField::Value(v) if !in_range(*v) => {
                self.at(out_of_range, row, field, &v.to_string())
            }
            NumericField::Value(_) => {}
        }
    }

    /// List-reference pass: one finding per distinct token not present in `known`
    pub(crate) fn check_references<'a>(
        &mut self,
        row: usize,
        field: CanonicalField,
        tokens: impl Iterator<Item = Cow<'a, str>>,
        known: &HashSet<String>,
        missing: CheckKind,
    ) {
        let mut reported: HashSet<Cow<'a, str>> = HashSet::new();
        for token in tokens {
            if known.contains(token.as_ref()) || reported.contains(&token) {
                continue;
            }
            self.push(
                missing,
                Location {
                    row: Some(row),
                    field: Some(field),
                    value: &token,
                    token: Some(&token),
                },
            );
            reported.insert(token);
        }
    }

    pub(crate) fn finish(self) -> Vec<Diagnostic> {
        self.out
    }
}
