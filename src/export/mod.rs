//! Export module for fintrack
//!
//! Serializes the in-memory snapshot for download/backup:
//! - JSON: machine-readable, schema-versioned (the user-facing export)
//! - CSV: transaction and EMI lists for spreadsheets
//! - YAML: human-readable snapshot

pub mod csv;
pub mod json;
pub mod yaml;

pub use csv::{export_emis_csv, export_transactions_csv};
pub use json::{export_snapshot_json, import_from_json, SnapshotExport, EXPORT_SCHEMA_VERSION};
pub use yaml::{export_snapshot_yaml, import_from_yaml};
