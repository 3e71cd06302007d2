// ============================================================
// DATASET
// ============================================================
// The three collections as one unit of validation and export

use serde::{Deserialize, Serialize};

use super::entity::EntityKind;
use super::records::{Client, Task, Worker};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub clients: Vec<Client>,
    pub workers: Vec<Worker>,
    pub tasks: Vec<Task>,
}

impl Dataset {
    pub fn new(clients: Vec<Client>, workers: Vec<Worker>, tasks: Vec<Task>) -> Self {
        Self {
            clients,
            workers,
            tasks,
        }
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Client => self.clients.len(),
            EntityKind::Worker => self.workers.len(),
            EntityKind::Task => self.tasks.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        EntityKind::ALL.iter().all(|k| self.count(*k) == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let dataset = Dataset::new(vec![Client::default(); 2], vec![], vec![Task::default()]);
        assert_eq!(dataset.count(EntityKind::Client), 2);
        assert_eq!(dataset.count(EntityKind::Worker), 0);
        assert_eq!(dataset.count(EntityKind::Task), 1);
        assert!(!dataset.is_empty());
        assert!(Dataset::default().is_empty());
    }
}
