pub mod collectors;
pub mod config;
pub mod error;
pub mod ingest;
pub mod runner;
