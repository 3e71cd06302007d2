use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{CheckKind, Diagnostic, EntityKind};

use super::catalog::ALL_CHECKS;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeverityCounts {
    pub errors: usize,
    pub warnings: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_errors: usize,
    pub total_warnings: usize,
    pub by_entity: BTreeMap<EntityKind, SeverityCounts>,
}

/// Diagnostics of one run plus counts, capped for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub summary: ReportSummary,
    pub diagnostics: Vec<Diagnostic>,
    /// Set when `diagnostics` was cut to the configured maximum
    pub truncated: bool,
    pub recommendations: Vec<String>,
}

fn recommendation(check: CheckKind) -> &'static str {
    match check {
        CheckKind::MissingId | CheckKind::DuplicateId => {
            "Review duplicate or missing identifiers"
        }
        CheckKind::InvalidNumber
        | CheckKind::PriorityRange
        | CheckKind::MaxLoadRange
        | CheckKind::QualificationRange
        | CheckKind::DurationRange
        | CheckKind::MaxConcurrentRange => "Correct out-of-range or non-numeric values",
        CheckKind::InvalidAttributesJson
        | CheckKind::SlotsNotPositiveList
        | CheckKind::SlotsMalformed => "Fix malformed JSON fields",
        CheckKind::UnknownTaskReference => "Add missing tasks or correct requested task IDs",
        CheckKind::UncoveredSkill => "Ensure all required skills are covered by workers",
        CheckKind::PhasesFormatUnclear => "Write preferred phases as a range (1-3) or list ([1,2,3])",
        CheckKind::MissingClients | CheckKind::MissingWorkers | CheckKind::MissingTasks => {
            "Upload client, worker and task data"
        }
    }
}

impl ValidationReport {
    /// Summarize a full diagnostic list, keeping at most `max_diagnostics` entries
    pub fn from_diagnostics(mut diagnostics: Vec<Diagnostic>, max_diagnostics: usize) -> Self {
        let mut summary = ReportSummary::default();
        for d in &diagnostics {
            let counts = summary.by_entity.entry(d.entity).or_default();
            if d.is_error() {
                summary.total_errors += 1;
                counts.errors += 1;
            } else {
                summary.total_warnings += 1;
                counts.warnings += 1;
            }
        }

        let mut recommendations: Vec<String> = Vec::new();
        for check in ALL_CHECKS {
            if !diagnostics.iter().any(|d| d.check == check) {
                continue;
            }
            let text = recommendation(check);
            if !recommendations.iter().any(|r| r == text) {
                recommendations.push(text.to_string());
            }
        }

        let truncated = diagnostics.len() > max_diagnostics;
        diagnostics.truncate(max_diagnostics);

        Self {
            summary,
            diagnostics,
            truncated,
            recommendations,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.summary.total_errors > 0
    }

    /// Errors block export; an empty client sheet is itself an error
    pub fn is_ready_for_export(&self) -> bool {
        !self.has_errors()
    }
}
