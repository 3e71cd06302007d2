pub mod config;
pub mod export;
pub mod tabular;
