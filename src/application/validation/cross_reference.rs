use crate::domain::{CheckKind, Client, Diagnostic, EntityKind, Task, Worker};

use super::catalog::{self, Location};

/// Dataset completeness: the one place that decides whether the three collections together
/// are minimally usable. Missing clients is an error, missing workers or tasks a warning.
pub fn validate_cross_references(
    clients: &[Client],
    workers: &[Worker],
    tasks: &[Task],
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    if clients.is_empty() {
        diagnostics.push(catalog::diagnostic(
            CheckKind::MissingClients,
            EntityKind::Client,
            Location::default(),
        ));
    }

    if workers.is_empty() {
        diagnostics.push(catalog::diagnostic(
            CheckKind::MissingWorkers,
            EntityKind::Worker,
            Location::default(),
        ));
    }

    if tasks.is_empty() {
        diagnostics.push(catalog::diagnostic(
            CheckKind::MissingTasks,
            EntityKind::Task,
            Location::default(),
        ));
    }

    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_missing_workers() {
        let clients = vec![Client::default()];
        let tasks = vec![Task::default()];
        let out = validate_cross_references(&clients, &[], &tasks);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "missing-workers");
        assert_eq!(out[0].message, "No worker data found - tasks cannot be assigned");
        assert!(out[0].is_warning());
    }

    #[test]
    fn test_complete_dataset_passes() {
        let out = validate_cross_references(
            &[Client::default()],
            &[Worker::default()],
            &[Task::default()],
        );
        assert!(out.is_empty());
    }
}
