// ============================================================
// DOMAIN LAYER
// ============================================================
// Core types and value objects for dataset ingestion and validation
// No I/O, no async

pub mod config;
pub mod dataset;
pub mod diagnostic;
pub mod entity;
pub mod error;
pub mod records;
pub mod rules;
pub mod value;

pub use config::{EngineConfig, ExportFormat};
pub use dataset::Dataset;
pub use diagnostic::{CheckKind, Diagnostic, Severity};
pub use entity::EntityKind;
pub use error::{AppError, Result};
pub use records::{CanonicalField, Client, NumericField, RawField, RawRow, Record, Task, Worker};
pub use rules::{PriorityWeights, Rule, RuleDraft, RuleSet, RuleType};
pub use value::AttributeValue;
