//! JSON export functionality
//!
//! Serializes the full in-memory snapshot with schema versioning. The
//! payload mirrors the store's state shape (budget, EMIs, transactions)
//! so a parsed export reconstructs exactly what was in memory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::error::{Error, Result};
use crate::models::{Emi, MonthlyBudget, Transaction};
use crate::store::FinanceState;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full snapshot export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    /// The monthly budget
    pub monthly_budget: MonthlyBudget,

    /// All EMIs
    pub emis: Vec<Emi>,

    /// All transactions
    pub transactions: Vec<Transaction>,

    /// Export metadata
    pub metadata: ExportMetadata,
}

/// Export metadata for reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    /// Total number of EMIs
    pub emi_count: usize,

    /// Total number of transactions
    pub transaction_count: usize,

    /// Date range of transactions (earliest)
    pub earliest_transaction: Option<String>,

    /// Date range of transactions (latest)
    pub latest_transaction: Option<String>,
}

impl SnapshotExport {
    /// Create an export from the store's current state
    pub fn from_state(state: &FinanceState) -> Self {
        let earliest_transaction = state
            .transactions
            .iter()
            .map(|t| t.date)
            .min()
            .map(|d| d.to_string());

        let latest_transaction = state
            .transactions
            .iter()
            .map(|t| t.date)
            .max()
            .map(|d| d.to_string());

        let metadata = ExportMetadata {
            emi_count: state.emis.len(),
            transaction_count: state.transactions.len(),
            earliest_transaction,
            latest_transaction,
        };

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            monthly_budget: state.monthly_budget,
            emis: state.emis.clone(),
            transactions: state.transactions.clone(),
            metadata,
        }
    }

    /// Validate the export structure
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        if self.metadata.emi_count != self.emis.len() {
            return Err(format!(
                "Metadata EMI count ({}) does not match payload ({})",
                self.metadata.emi_count,
                self.emis.len()
            ));
        }

        if self.metadata.transaction_count != self.transactions.len() {
            return Err(format!(
                "Metadata transaction count ({}) does not match payload ({})",
                self.metadata.transaction_count,
                self.transactions.len()
            ));
        }

        for emi in &self.emis {
            if let Err(e) = emi.validate() {
                return Err(format!("EMI {}: {}", emi.id, e));
            }
        }

        Ok(())
    }
}

/// Export the snapshot to JSON
pub fn export_snapshot_json<W: Write>(
    state: &FinanceState,
    writer: &mut W,
    pretty: bool,
) -> Result<()> {
    let export = SnapshotExport::from_state(state);

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| Error::Export(e.to_string()))?;

    Ok(())
}

/// Import from a JSON export (for verification/restore)
pub fn import_from_json(json_str: &str) -> Result<SnapshotExport> {
    let export: SnapshotExport =
        serde_json::from_str(json_str).map_err(|e| Error::Import(e.to_string()))?;

    export.validate().map_err(Error::Import)?;

    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        EmiCategory, EmiId, Money, NewEmi, TransactionId, TransactionType,
    };
    use crate::store::FinanceAction;
    use chrono::NaiveDate;

    fn populated_state() -> FinanceState {
        let now = Utc::now();
        let draft = NewEmi::new(
            "Home Loan",
            Money::from_rupees(2_500_000),
            Money::from_rupees(21_000),
            5,
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            240,
        )
        .with_category(EmiCategory::Home);
        let emi = Emi {
            id: EmiId::new(),
            name: draft.name,
            loan_amount: draft.loan_amount,
            emi_amount: draft.emi_amount,
            due_day: draft.due_day,
            start_date: draft.start_date,
            duration_months: draft.duration_months,
            remaining_months: 226,
            interest_rate: Some(8.5),
            category: draft.category,
            created_at: now,
            updated_at: now,
        };
        let txn = Transaction {
            id: TransactionId::new(),
            amount: Money::from_rupees(2_500),
            kind: TransactionType::Expense,
            category: "Food & Dining".into(),
            description: "Groceries".into(),
            date: NaiveDate::from_ymd_opt(2025, 8, 4).unwrap(),
            is_recurring: false,
            created_at: now,
            updated_at: now,
        };

        FinanceState::default()
            .apply(FinanceAction::SetBudget(MonthlyBudget::with_income(
                Money::from_rupees(50_000),
            )))
            .apply(FinanceAction::AddEmi(emi))
            .apply(FinanceAction::AddTransaction(txn))
    }

    #[test]
    fn test_export_shape() {
        let state = populated_state();
        let export = SnapshotExport::from_state(&state);

        assert_eq!(export.schema_version, EXPORT_SCHEMA_VERSION);
        assert_eq!(export.emis.len(), 1);
        assert_eq!(export.transactions.len(), 1);
        assert_eq!(export.metadata.emi_count, 1);
        assert_eq!(
            export.metadata.earliest_transaction.as_deref(),
            Some("2025-08-04")
        );
        assert!(export.validate().is_ok());
    }

    #[test]
    fn test_json_roundtrip_reconstructs_state() {
        let state = populated_state();

        let mut json_output = Vec::new();
        export_snapshot_json(&state, &mut json_output, true).unwrap();
        let json_string = String::from_utf8(json_output).unwrap();

        // Indented output, as handed to the user
        assert!(json_string.contains("\n  "));

        let imported = import_from_json(&json_string).unwrap();
        assert_eq!(imported.emis.len(), state.emis.len());
        assert_eq!(imported.transactions.len(), state.transactions.len());
        assert_eq!(imported.emis[0].id, state.emis[0].id);
        assert_eq!(imported.emis[0].emi_amount, state.emis[0].emi_amount);
        assert_eq!(imported.transactions[0].amount, state.transactions[0].amount);
        assert_eq!(imported.monthly_budget, state.monthly_budget);
    }

    #[test]
    fn test_import_rejects_tampered_counts() {
        let state = populated_state();
        let mut export = SnapshotExport::from_state(&state);
        export.metadata.transaction_count = 99;

        let json = serde_json::to_string(&export).unwrap();
        let err = import_from_json(&json).unwrap_err();
        assert!(matches!(err, Error::Import(_)));
    }

    #[test]
    fn test_import_rejects_wrong_schema_version() {
        let state = populated_state();
        let mut export = SnapshotExport::from_state(&state);
        export.schema_version = "0.9.0".into();

        let json = serde_json::to_string(&export).unwrap();
        assert!(import_from_json(&json).is_err());
    }
}
