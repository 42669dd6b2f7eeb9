//! Command-line interface
//!
//! One subcommand enum and handler per command family. Handlers own the
//! form-level validation (amount and date parsing, category checks) and
//! drive the finance store; the store itself assumes validated input.

pub mod budget;
pub mod emi;
pub mod export;
pub mod transaction;

pub use budget::{handle_budget_command, BudgetCommands};
pub use emi::{handle_emi_command, EmiCommands};
pub use export::{handle_export_command, ExportArgs};
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::NaiveDate;

use crate::error::Error;
use crate::models::Money;

/// Parse a user-supplied amount, requiring a positive value
fn parse_amount(s: &str) -> Result<Money, Error> {
    let amount = Money::parse(s).map_err(|e| {
        Error::Validation(format!(
            "Invalid amount '{}'. Use a format like '15000' or '1,50,000.50'. {}",
            s, e
        ))
    })?;
    if !amount.is_positive() {
        return Err(Error::Validation(format!(
            "Amount must be positive, got {}",
            amount
        )));
    }
    Ok(amount)
}

/// Parse a user-supplied date in YYYY-MM-DD form
fn parse_date(s: &str) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
        Error::Validation(format!("Invalid date '{}'. Use the format YYYY-MM-DD", s))
    })
}

/// Parse a user-supplied month in YYYY-MM form
fn parse_month(s: &str) -> Result<(i32, u32), Error> {
    let invalid = || Error::Validation(format!("Invalid month '{}'. Use the format YYYY-MM", s));
    let (year, month) = s.split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}
