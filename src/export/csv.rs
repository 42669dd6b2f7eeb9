//! CSV export functionality
//!
//! Spreadsheet-friendly renditions of the transaction and EMI lists.
//! Amounts are written as decimal rupees.

use std::io::Write;

use crate::error::{Error, Result};
use crate::models::{Emi, Money, Transaction};

fn decimal_rupees(amount: Money) -> String {
    format!("{}.{:02}", amount.rupees(), amount.paise_part())
}

/// Export transactions to CSV
pub fn export_transactions_csv<W: Write>(
    transactions: &[Transaction],
    writer: &mut W,
) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record([
        "id",
        "date",
        "type",
        "category",
        "description",
        "amount",
        "is_recurring",
    ])
    .map_err(|e| Error::Export(e.to_string()))?;

    for txn in transactions {
        wtr.write_record([
            txn.id.as_uuid().to_string(),
            txn.date.to_string(),
            txn.kind.to_string(),
            txn.category.clone(),
            txn.description.clone(),
            decimal_rupees(txn.amount),
            txn.is_recurring.to_string(),
        ])
        .map_err(|e| Error::Export(e.to_string()))?;
    }

    wtr.flush().map_err(|e| Error::Export(e.to_string()))?;
    Ok(())
}

/// Export EMIs to CSV
pub fn export_emis_csv<W: Write>(emis: &[Emi], writer: &mut W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record([
        "id",
        "name",
        "category",
        "loan_amount",
        "emi_amount",
        "due_day",
        "start_date",
        "duration_months",
        "remaining_months",
        "interest_rate",
    ])
    .map_err(|e| Error::Export(e.to_string()))?;

    for emi in emis {
        wtr.write_record([
            emi.id.as_uuid().to_string(),
            emi.name.clone(),
            emi.category.to_string(),
            decimal_rupees(emi.loan_amount),
            decimal_rupees(emi.emi_amount),
            emi.due_day.to_string(),
            emi.start_date.to_string(),
            emi.duration_months.to_string(),
            emi.remaining_months.to_string(),
            emi.interest_rate.map(|r| r.to_string()).unwrap_or_default(),
        ])
        .map_err(|e| Error::Export(e.to_string()))?;
    }

    wtr.flush().map_err(|e| Error::Export(e.to_string()))?;
    Ok(())
}
