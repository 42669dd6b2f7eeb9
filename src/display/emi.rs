//! EMI display formatting

use chrono::NaiveDate;

use super::{format_date, truncate};
use crate::models::Emi;
use crate::summary::next_due_date;

/// Format a single EMI for display (register row)
pub fn format_emi_row(emi: &Emi, today: NaiveDate) -> String {
    let due = next_due_date(emi.due_day, today);
    format!(
        "{} {:20} {:10} {:>12} due {:12} {:>3}/{} months left",
        emi.id,
        truncate(&emi.name, 20),
        emi.category.to_string(),
        emi.emi_amount.to_string(),
        format_date(due),
        emi.remaining_months,
        emi.duration_months
    )
}

/// Format a list of EMIs as a register
pub fn format_emi_list(emis: &[Emi], today: NaiveDate) -> String {
    if emis.is_empty() {
        return "No EMIs found.\n".to_string();
    }

    let mut output = String::new();
    for emi in emis {
        output.push_str(&format_emi_row(emi, today));
        output.push('\n');
    }

    output
}
