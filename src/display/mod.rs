//! Terminal display formatting
//!
//! Plain-text register views for EMIs, transactions, and the monthly
//! summary.

pub mod emi;
pub mod summary;
pub mod transaction;

pub use emi::{format_emi_list, format_emi_row};
pub use summary::format_summary;
pub use transaction::{format_transaction_list, format_transaction_row};

use chrono::NaiveDate;

/// Truncate a string to a maximum width, appending an ellipsis
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

/// Format a date for display (e.g. "4 Aug 2025")
pub fn format_date(date: NaiveDate) -> String {
    date.format("%-d %b %Y").to_string()
}
