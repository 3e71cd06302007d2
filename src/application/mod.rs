pub mod header_normalizer;
pub mod record_builder;
pub mod validation;

pub use header_normalizer::{map_headers, normalize_header, HeaderMatch};
pub use record_builder::{build_clients, build_tasks, build_workers, load_rows};
pub use validation::{validate, validate_dataset, ValidationReport};
