// ============================================================
// ENTITY KINDS
// ============================================================
// The three record collections a dataset is made of

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::error::AppError;

/// Which collection a record, sheet or diagnostic belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    #[serde(rename = "clients")]
    Client,
    #[serde(rename = "workers")]
    Worker,
    #[serde(rename = "tasks")]
    Task,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::Client, EntityKind::Worker, EntityKind::Task];

    /// Singular prefix used in diagnostic identifiers
    pub fn id_prefix(&self) -> &'static str {
        match self {
            EntityKind::Client => "client",
            EntityKind::Worker => "worker",
            EntityKind::Task => "task",
        }
    }

    /// Capitalized singular name for messages
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Client => "Client",
            EntityKind::Worker => "Worker",
            EntityKind::Task => "Task",
        }
    }

    /// Plural collection name, as used in reports and export file names
    pub fn collection_name(&self) -> &'static str {
        match self {
            EntityKind::Client => "clients",
            EntityKind::Worker => "workers",
            EntityKind::Task => "tasks",
        }
    }

    /// Guess the kind of an uploaded file from its name.
    /// Falls back to `Client` when nothing matches.
    pub fn from_file_name(name: &str) -> Self {
        let name = name.to_lowercase();
        if name.contains("client") {
            EntityKind::Client
        } else if name.contains("worker") {
            EntityKind::Worker
        } else if name.contains("task") {
            EntityKind::Task
        } else {
            EntityKind::Client
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.collection_name())
    }
}

impl FromStr for EntityKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "client" | "clients" => Ok(EntityKind::Client),
            "worker" | "workers" => Ok(EntityKind::Worker),
            "task" | "tasks" => Ok(EntityKind::Task),
            other => Err(AppError::ValidationError(format!(
                "Unknown entity kind '{}', expected client, worker or task",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_file_name() {
        assert_eq!(EntityKind::from_file_name("Workers_2024.xlsx"), EntityKind::Worker);
        assert_eq!(EntityKind::from_file_name("tasks.csv"), EntityKind::Task);
        assert_eq!(EntityKind::from_file_name("CLIENTS.csv"), EntityKind::Client);
        assert_eq!(EntityKind::from_file_name("data.csv"), EntityKind::Client);
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!("Worker".parse::<EntityKind>().unwrap(), EntityKind::Worker);
        assert_eq!("tasks".parse::<EntityKind>().unwrap(), EntityKind::Task);
        assert!("projects".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_serializes_as_collection_name() {
        let json = serde_json::to_string(&EntityKind::Worker).unwrap();
        assert_eq!(json, "\"workers\"");
    }
}
