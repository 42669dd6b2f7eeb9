//! Monthly summary display formatting

use crate::summary::FinancialSummary;

/// Format the monthly summary as a small report block
pub fn format_summary(summary: &FinancialSummary) -> String {
    let mut output = String::new();
    output.push_str("Monthly Summary\n");
    output.push_str("===============\n");
    output.push_str(&format!("Total Income:      {:>14}\n", summary.total_income.to_string()));
    output.push_str(&format!(
        "Total Expenses:    {:>14}  (incl. EMIs {})\n",
        summary.total_expenses.to_string(),
        summary.total_emis
    ));
    output.push_str(&format!(
        "Remaining Balance: {:>14}\n",
        summary.remaining_balance.to_string()
    ));
    output.push_str(&format!("Savings Rate:      {:>13.1}%\n", summary.savings_rate));
    output
}
