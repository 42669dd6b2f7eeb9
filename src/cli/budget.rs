//! Budget CLI commands

use clap::Subcommand;

use super::parse_amount;
use crate::error::Result;
use crate::models::MonthlyBudget;
use crate::store::FinanceStore;

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Show the monthly budget
    Show,
    /// Set the fixed monthly income
    Set {
        /// Monthly income (e.g. "50000")
        #[arg(long)]
        income: String,
    },
}

/// Handle a budget command
pub async fn handle_budget_command(store: &FinanceStore, cmd: BudgetCommands) -> Result<()> {
    match cmd {
        BudgetCommands::Show => {
            let budget = store.state().monthly_budget;
            println!("Monthly income: {}", budget.income);
        }
        BudgetCommands::Set { income } => {
            let budget = MonthlyBudget::with_income(parse_amount(&income)?);
            store.update_budget(budget).await?;
            println!("Monthly income set to {}", budget.income);
        }
    }

    Ok(())
}
