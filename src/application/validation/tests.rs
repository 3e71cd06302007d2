use super::*;
use crate::domain::{NumericField, Severity};

fn client(id: &str, priority: i64, requested: &str) -> Client {
    Client {
        client_id: id.to_string(),
        priority_level: NumericField::Value(priority),
        requested_task_ids: requested.to_string(),
        ..Default::default()
    }
}

fn worker(id: &str, skills: &str) -> Worker {
    Worker {
        worker_id: id.to_string(),
        skills: skills.to_string(),
        ..Default::default()
    }
}

fn task(id: &str) -> Task {
    Task {
        task_id: id.to_string(),
        ..Default::default()
    }
}

#[test]
fn test_unknown_requested_task() {
    let clients = vec![client("C1", 3, "T1,T9")];
    let tasks = vec![task("T1")];

    let out = validate_clients(&clients, &tasks);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].severity, Severity::Error);
    assert_eq!(out[0].entity, EntityKind::Client);
    assert_eq!(out[0].message, "Unknown task ID referenced: T9");
    assert!(!out.iter().any(|d| d.message.contains("T1")));
}

#[test]
fn test_negative_slot_through_orchestrator() {
    let workers = vec![Worker {
        worker_id: "W1".to_string(),
        available_slots: "[1,2,-3]".to_string(),
        ..Default::default()
    }];

    let out = validate(&[client("C1", 1, "")], &workers, &[task("T1")]);
    let errors: Vec<&Diagnostic> = out.iter().filter(|d| d.is_error()).collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].entity, EntityKind::Worker);
    assert_eq!(errors[0].field, Some(CanonicalField::AvailableSlots));
}

#[test]
fn test_all_collections_empty() {
    let out = validate(&[], &[], &[]);
    let shape: Vec<(&str, Severity)> = out.iter().map(|d| (d.id.as_str(), d.severity)).collect();
    assert_eq!(
        shape,
        vec![
            ("missing-clients", Severity::Error),
            ("missing-workers", Severity::Warning),
            ("missing-tasks", Severity::Warning),
        ]
    );
}

#[test]
fn test_phase_format_scenario() {
    let mut t1 = task("T1");
    t1.preferred_phases = "1-3".to_string();
    let mut t2 = task("T2");
    t2.preferred_phases = "banana".to_string();

    let out = validate_tasks(&[t1, t2], &[]);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].id, "task-phases-format-1");
    assert_eq!(out[0].severity, Severity::Warning);
}

#[test]
fn test_duplicate_count_is_k_minus_one() {
    for k in 2..6 {
        let mut tasks: Vec<Task> = (0..k).map(|_| task("T1")).collect();
        tasks.insert(1, task("T2"));
        let out = validate_tasks(&tasks, &[]);
        let dup_rows: Vec<usize> = out
            .iter()
            .filter(|d| d.check == CheckKind::DuplicateId)
            .filter_map(|d| d.row_index)
            .collect();
        assert_eq!(dup_rows.len(), k - 1);
        // first occurrence is row 0, T2 sits at row 1
        assert_eq!(dup_rows, (2..=k).collect::<Vec<_>>());
    }
}

#[test]
fn test_orchestrator_order_and_determinism() {
    let clients = vec![client("C1", 7, "T1,TX"), client("C1", 2, "")];
    let workers = vec![Worker {
        worker_id: "W1".to_string(),
        skills: "welding".to_string(),
        qualification_level: NumericField::Value(0),
        ..Default::default()
    }];
    let tasks = vec![Task {
        task_id: "T1".to_string(),
        required_skills: "welding, painting".to_string(),
        preferred_phases: "early".to_string(),
        ..Default::default()
    }];

    let first = validate(&clients, &workers, &tasks);
    let second = validate(&clients, &workers, &tasks);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );

    let entities: Vec<EntityKind> = first.iter().map(|d| d.entity).collect();
    assert_eq!(
        entities,
        vec![
            EntityKind::Client,
            EntityKind::Client,
            EntityKind::Client,
            EntityKind::Worker,
            EntityKind::Task,
            EntityKind::Task,
        ]
    );
    let ids: Vec<&str> = first.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "client-priority-0",
            "client-unknown-task-0-TX",
            "client-duplicate-1",
            "worker-qualification-0",
            "task-skill-coverage-0-painting",
            "task-phases-format-0",
        ]
    );
}

#[test]
fn test_inputs_are_not_mutated() {
    let clients = vec![client("C1", 9, "T5")];
    let workers = vec![worker("W1", "a")];
    let tasks = vec![task("T1")];
    let before = (clients.clone(), workers.clone(), tasks.clone());

    let _ = validate(&clients, &workers, &tasks);
    assert_eq!(before, (clients, workers, tasks));
}

#[test]
fn test_clean_dataset_has_no_diagnostics() {
    let clients = vec![client("C1", 3, "T1")];
    let workers = vec![Worker {
        worker_id: "W1".to_string(),
        skills: "Python".to_string(),
        available_slots: "[1,2]".to_string(),
        max_load_per_phase: NumericField::Value(2),
        qualification_level: NumericField::Value(5),
        ..Default::default()
    }];
    let tasks = vec![Task {
        task_id: "T1".to_string(),
        duration: NumericField::Value(2),
        required_skills: "python".to_string(),
        preferred_phases: "[1,2]".to_string(),
        max_concurrent: NumericField::Value(1),
        ..Default::default()
    }];
    assert!(validate(&clients, &workers, &tasks).is_empty());
}
