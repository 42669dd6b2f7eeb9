//! Transaction display formatting

use super::truncate;
use crate::models::{Transaction, TransactionType};

/// Format a single transaction for display (register row)
pub fn format_transaction_row(txn: &Transaction) -> String {
    let direction = match txn.kind {
        TransactionType::Income => "+",
        TransactionType::Expense => "-",
    };
    let recurring = if txn.is_recurring { " ⟳" } else { "" };

    format!(
        "{} {} {}{:>11} {:18} {}{}",
        txn.id,
        txn.date.format("%Y-%m-%d"),
        direction,
        txn.amount.to_string(),
        truncate(&txn.category, 18),
        truncate(&txn.description, 30),
        recurring
    )
}

/// Format a list of transactions as a register
pub fn format_transaction_list(transactions: &[Transaction]) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    for txn in transactions {
        output.push_str(&format_transaction_row(txn));
        output.push('\n');
    }

    output
}
