use std::borrow::Cow;
use std::collections::HashSet;

use crate::domain::records::split_list;
use crate::domain::{AttributeValue, CanonicalField, CheckKind, Client, Diagnostic, EntityKind, Task};

use super::Findings;

/// Per-record checks for clients. Requested task ids are resolved against `tasks`.
pub fn validate_clients(clients: &[Client], tasks: &[Task]) -> Vec<Diagnostic> {
    let task_ids: HashSet<String> = tasks.iter().map(|t| t.task_id.clone()).collect();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut findings = Findings::new(EntityKind::Client);

    for (index, client) in clients.iter().enumerate() {
        findings.check_identifier(&mut seen, index, CanonicalField::ClientID, &client.client_id);

        findings.check_number(
            index,
            CanonicalField::PriorityLevel,
            &client.priority_level,
            |v| (1..=5).contains(&v),
            CheckKind::PriorityRange,
        );

        if !client.attributes_json.is_empty()
            && AttributeValue::parse_json(&client.attributes_json).is_err()
        {
            findings.at(
                CheckKind::InvalidAttributesJson,
                index,
                CanonicalField::AttributesJSON,
                &client.attributes_json,
            );
        }

        findings.check_references(
            index,
            CanonicalField::RequestedTaskIDs,
            split_list(&client.requested_task_ids).map(Cow::Borrowed),
            &task_ids,
            CheckKind::UnknownTaskReference,
        );
    }

    findings.finish()
}
