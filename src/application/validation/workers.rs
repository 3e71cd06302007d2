use std::collections::HashSet;

use crate::domain::{AttributeValue, CanonicalField, CheckKind, Diagnostic, EntityKind, Worker};

use super::Findings;

/// Per-record checks for workers. Depends on no other collection.
pub fn validate_workers(workers: &[Worker]) -> Vec<Diagnostic> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut findings = Findings::new(EntityKind::Worker);

    for (index, worker) in workers.iter().enumerate() {
        findings.check_identifier(&mut seen, index, CanonicalField::WorkerID, &worker.worker_id);

        findings.check_number(
            index,
            CanonicalField::MaxLoadPerPhase,
            &worker.max_load_per_phase,
            |v| v >= 1,
            CheckKind::MaxLoadRange,
        );
        findings.check_number(
            index,
            CanonicalField::QualificationLevel,
            &worker.qualification_level,
            |v| (1..=10).contains(&v),
            CheckKind::QualificationRange,
        );

        if !worker.available_slots.is_empty() {
            match AttributeValue::parse_json(&worker.available_slots) {
                Ok(slots) if slots.is_positive_number_list() => {}
                Ok(_) => findings.at(
                    CheckKind::SlotsNotPositiveList,
                    index,
                    CanonicalField::AvailableSlots,
                    &worker.available_slots,
                ),
                Err(_) => findings.at(
                    CheckKind::SlotsMalformed,
                    index,
                    CanonicalField::AvailableSlots,
                    &worker.available_slots,
                ),
            }
        }
    }

    findings.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NumericField, Severity};

    fn worker(id: &str, slots: &str) -> Worker {
        Worker {
            worker_id: id.to_string(),
            available_slots: slots.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_negative_slot_is_single_error() {
        let out = validate_workers(&[worker("W1", "[1,2,-3]")]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "worker-slots-0");
        assert_eq!(out[0].severity, Severity::Error);
        assert_eq!(out[0].field, Some(CanonicalField::AvailableSlots));
    }

    #[test]
    fn test_malformed_slots() {
        let out = validate_workers(&[worker("W1", "1;2;3")]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].check, CheckKind::SlotsMalformed);
        assert_eq!(out[0].id, "worker-slots-format-0");
    }

    #[test]
    fn test_slots_must_be_array() {
        let out = validate_workers(&[worker("W1", "{\"a\":1}")]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].check, CheckKind::SlotsNotPositiveList);
    }

    #[test]
    fn test_load_and_qualification() {
        let w = Worker {
            worker_id: "W1".to_string(),
            max_load_per_phase: NumericField::Value(0),
            qualification_level: NumericField::Value(11),
            ..Default::default()
        };
        let out = validate_workers(&[w]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].check, CheckKind::MaxLoadRange);
        assert_eq!(out[0].severity, Severity::Error);
        assert_eq!(out[1].check, CheckKind::QualificationRange);
        assert_eq!(out[1].severity, Severity::Warning);
        assert_eq!(out[1].message, "Unusual qualification level: 11");
    }

    #[test]
    fn test_duplicates_reported_for_each_repeat() {
        let out = validate_workers(&[
            worker("W1", ""),
            worker("W1", ""),
            worker("W2", ""),
            worker("W1", ""),
        ]);
        let rows: Vec<Option<usize>> = out.iter().map(|d| d.row_index).collect();
        assert_eq!(rows, vec![Some(1), Some(3)]);
        assert!(out.iter().all(|d| d.check == CheckKind::DuplicateId));
    }

    #[test]
    fn test_missing_id() {
        let out = validate_workers(&[worker("", "")]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].check, CheckKind::MissingId);
        assert_eq!(out[0].message, "Missing Worker ID");
    }
}
