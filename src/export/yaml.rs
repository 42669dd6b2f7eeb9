//! YAML export functionality
//!
//! Human-readable rendition of the full snapshot export.

use std::io::Write;

use crate::error::{Error, Result};
use crate::export::json::SnapshotExport;
use crate::store::FinanceState;

/// Export the snapshot to YAML
pub fn export_snapshot_yaml<W: Write>(state: &FinanceState, writer: &mut W) -> Result<()> {
    let export = SnapshotExport::from_state(state);

    writeln!(writer, "# fintrack snapshot export")
        .map_err(|e| Error::Export(e.to_string()))?;
    writeln!(writer, "# Generated: {}", export.exported_at)
        .map_err(|e| Error::Export(e.to_string()))?;
    writeln!(writer, "# App Version: {}", export.app_version)
        .map_err(|e| Error::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| Error::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &export).map_err(|e| Error::Export(e.to_string()))?;

    Ok(())
}

/// Import from a YAML export
pub fn import_from_yaml(yaml_str: &str) -> Result<SnapshotExport> {
    let export: SnapshotExport =
        serde_yaml::from_str(yaml_str).map_err(|e| Error::Import(e.to_string()))?;

    export.validate().map_err(Error::Import)?;

    Ok(export)
}
