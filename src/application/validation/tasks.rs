use std::borrow::Cow;
use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::records::split_list;
use crate::domain::{CanonicalField, CheckKind, Diagnostic, EntityKind, Task, Worker};

use super::Findings;

static PHASE_RANGE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+-\d+$").unwrap());

static PHASE_LIST_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[\d+(,\d+)*\]$").unwrap());

/// `A-B` or `[n,n,...]`
pub fn is_recognized_phase_format(phases: &str) -> bool {
    PHASE_RANGE_PATTERN.is_match(phases) || PHASE_LIST_PATTERN.is_match(phases)
}

/// Lower-cased union of every worker's skill tokens
pub fn worker_skill_pool(workers: &[Worker]) -> HashSet<String> {
    workers
        .iter()
        .flat_map(|w| split_list(&w.skills))
        .map(str::to_lowercase)
        .collect()
}

/// Per-record checks for tasks. Required skills are matched against `workers`.
pub fn validate_tasks(tasks: &[Task], workers: &[Worker]) -> Vec<Diagnostic> {
    let skills = worker_skill_pool(workers);
    let mut seen: HashSet<&str> = HashSet::new();
    let mut findings = Findings::new(EntityKind::Task);

    for (index, task) in tasks.iter().enumerate() {
        findings.check_identifier(&mut seen, index, CanonicalField::TaskID, &task.task_id);

        findings.check_number(
            index,
            CanonicalField::Duration,
            &task.duration,
            |v| v >= 1,
            CheckKind::DurationRange,
        );
        findings.check_number(
            index,
            CanonicalField::MaxConcurrent,
            &task.max_concurrent,
            |v| v >= 1,
            CheckKind::MaxConcurrentRange,
        );

        findings.check_references(
            index,
            CanonicalField::RequiredSkills,
            split_list(&task.required_skills).map(|s| Cow::Owned(s.to_lowercase())),
            &skills,
            CheckKind::UncoveredSkill,
        );

        if !task.preferred_phases.is_empty() && !is_recognized_phase_format(&task.preferred_phases)
        {
            findings.at(
                CheckKind::PhasesFormatUnclear,
                index,
                CanonicalField::PreferredPhases,
                &task.preferred_phases,
            );
        }
    }

    findings.finish()
}
