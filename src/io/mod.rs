//! Dataset ingestion and CSV export.

pub mod export;
pub mod ingest;

pub use ingest::{DatasetError, DatasetKind, load_dataset};
