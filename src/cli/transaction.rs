//! Transaction CLI commands

use chrono::Local;
use clap::Subcommand;

use super::{parse_amount, parse_date, parse_month};
use crate::display::transaction::format_transaction_list;
use crate::error::{Error, Result};
use crate::models::{NewTransaction, Transaction, TransactionId, TransactionType};
use crate::store::FinanceStore;

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Add a new transaction
    Add {
        /// Amount (e.g. "2500" or "2,500.50")
        amount: String,
        /// Transaction type (income, expense)
        #[arg(short = 't', long = "type", default_value = "expense")]
        kind: String,
        /// Category (e.g. "Salary", "Food & Dining")
        #[arg(short, long)]
        category: String,
        /// Description
        #[arg(short, long)]
        description: Option<String>,
        /// Transaction date (YYYY-MM-DD); today when omitted
        #[arg(long)]
        date: Option<String>,
        /// Mark as a monthly recurring entry
        #[arg(long)]
        recurring: bool,
    },
    /// List transactions
    List {
        /// Filter by month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
        /// Filter by type (income, expense)
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        /// Filter by category (substring match)
        #[arg(short, long)]
        category: Option<String>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Edit a transaction (full-record update from the current values)
    Update {
        /// Transaction ID
        transaction: String,
        /// New amount
        #[arg(long)]
        amount: Option<String>,
        /// New category
        #[arg(short, long)]
        category: Option<String>,
        /// New description
        #[arg(short, long)]
        description: Option<String>,
        /// New date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete a transaction
    Delete {
        /// Transaction ID
        transaction: String,
    },
}

fn parse_kind(s: &str) -> Result<TransactionType> {
    TransactionType::parse(s).ok_or_else(|| {
        Error::Validation(format!(
            "Invalid transaction type: '{}'. Valid types: income, expense",
            s
        ))
    })
}

/// Find a transaction by id
fn find_transaction<'a>(transactions: &'a [Transaction], needle: &str) -> Result<&'a Transaction> {
    if let Ok(id) = needle.parse::<TransactionId>() {
        if let Some(txn) = transactions.iter().find(|t| t.id == id) {
            return Ok(txn);
        }
    }
    transactions
        .iter()
        .find(|t| t.id.to_string() == needle)
        .ok_or_else(|| Error::transaction_not_found(needle))
}

/// Handle a transaction command
pub async fn handle_transaction_command(
    store: &FinanceStore,
    cmd: TransactionCommands,
) -> Result<()> {
    match cmd {
        TransactionCommands::Add {
            amount,
            kind,
            category,
            description,
            date,
            recurring,
        } => {
            let date = match date {
                Some(s) => parse_date(&s)?,
                None => Local::now().date_naive(),
            };
            let mut draft =
                NewTransaction::new(parse_amount(&amount)?, parse_kind(&kind)?, category, date);
            if let Some(description) = description {
                draft = draft.with_description(description);
            }
            if recurring {
                draft = draft.recurring();
            }
            draft
                .validate()
                .map_err(|e| Error::Validation(e.to_string()))?;

            let txn = store.add_transaction(draft).await?;
            println!(
                "Added {} of {} in {} ({})",
                txn.kind, txn.amount, txn.category, txn.id
            );
        }
        TransactionCommands::List {
            month,
            kind,
            category,
            limit,
        } => {
            let month = month.map(|s| parse_month(&s)).transpose()?;
            let kind = kind.map(|s| parse_kind(&s)).transpose()?;
            let state = store.state();

            // All filtering happens client-side over the loaded snapshot
            let filtered: Vec<Transaction> = state
                .transactions
                .into_iter()
                .filter(|t| month.map_or(true, |(y, m)| t.in_month(y, m)))
                .filter(|t| kind.map_or(true, |k| t.kind == k))
                .filter(|t| {
                    category.as_ref().map_or(true, |c| {
                        t.category.to_lowercase().contains(&c.to_lowercase())
                    })
                })
                .take(limit)
                .collect();

            print!("{}", format_transaction_list(&filtered));
        }
        TransactionCommands::Update {
            transaction,
            amount,
            category,
            description,
            date,
        } => {
            let state = store.state();
            let mut record = find_transaction(&state.transactions, &transaction)?.clone();

            if let Some(amount) = amount {
                record.amount = parse_amount(&amount)?;
            }
            if let Some(category) = category {
                record.category = category;
            }
            if let Some(description) = description {
                record.description = description;
            }
            if let Some(date) = date {
                record.date = parse_date(&date)?;
            }

            let updated = store.update_transaction(record).await?;
            println!("Updated transaction {}", updated.id);
        }
        TransactionCommands::Delete { transaction } => {
            let state = store.state();
            let record = find_transaction(&state.transactions, &transaction)?;
            let id = record.id;

            store.delete_transaction(id).await?;
            println!("Deleted transaction {}", id);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::{NaiveDate, Utc};

    fn txn() -> Transaction {
        let now = Utc::now();
        Transaction {
            id: TransactionId::new(),
            amount: Money::from_rupees(500),
            kind: TransactionType::Expense,
            category: "Shopping".into(),
            description: String::new(),
            date: NaiveDate::from_ymd_opt(2025, 8, 4).unwrap(),
            is_recurring: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!(parse_kind("income").unwrap(), TransactionType::Income);
        assert!(parse_kind("gift").is_err());
    }

    #[test]
    fn test_find_transaction_by_display_id() {
        let txns = vec![txn(), txn()];
        let needle = txns[1].id.to_string();
        let found = find_transaction(&txns, &needle).unwrap();
        assert_eq!(found.id, txns[1].id);
    }

    #[test]
    fn test_find_transaction_unknown() {
        let txns = vec![txn()];
        assert!(find_transaction(&txns, "txn-deadbeef")
            .unwrap_err()
            .is_not_found());
    }
}
