//! Export CLI command

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;

use crate::error::{Error, Result};
use crate::export::{
    export_emis_csv, export_snapshot_json, export_snapshot_yaml, export_transactions_csv,
};
use crate::store::FinanceStore;

/// Arguments for the export command
#[derive(Args)]
pub struct ExportArgs {
    /// Output format (json, yaml, csv, csv-emis)
    #[arg(short, long, default_value = "json")]
    pub format: String,

    /// Output file; stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

fn write_export<W: Write>(store: &FinanceStore, format: &str, writer: &mut W) -> Result<()> {
    let state = store.state();
    match format {
        "json" => export_snapshot_json(&state, writer, true),
        "yaml" => export_snapshot_yaml(&state, writer),
        "csv" => export_transactions_csv(&state.transactions, writer),
        "csv-emis" => export_emis_csv(&state.emis, writer),
        other => Err(Error::Validation(format!(
            "Invalid export format: '{}'. Valid formats: json, yaml, csv, csv-emis",
            other
        ))),
    }
}

/// Handle the export command
pub async fn handle_export_command(store: &FinanceStore, args: ExportArgs) -> Result<()> {
    match &args.output {
        Some(path) => {
            let mut file = File::create(path)
                .map_err(|e| Error::Export(format!("Failed to create {}: {}", path.display(), e)))?;
            write_export(store, &args.format, &mut file)?;
            println!("Exported {} data to {}", args.format, path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_export(store, &args.format, &mut handle)?;
        }
    }

    Ok(())
}
