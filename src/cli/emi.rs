//! EMI CLI commands

use chrono::Local;
use clap::Subcommand;

use super::{parse_amount, parse_date};
use crate::display::emi::format_emi_list;
use crate::error::{Error, Result};
use crate::models::{Emi, EmiCategory, EmiId, NewEmi};
use crate::store::FinanceStore;
use crate::summary::next_due_date;

/// EMI subcommands
#[derive(Subcommand)]
pub enum EmiCommands {
    /// Add a new EMI
    Add {
        /// EMI name, e.g. "Home Loan"
        name: String,
        /// Total loan amount (e.g. "25,00,000")
        #[arg(long)]
        loan_amount: String,
        /// Monthly installment amount
        #[arg(long)]
        emi_amount: String,
        /// Day of month the payment falls due (1-31)
        #[arg(long)]
        due_day: u32,
        /// First installment month (YYYY-MM-DD)
        #[arg(long)]
        start_date: String,
        /// Loan duration in months
        #[arg(long)]
        duration: u32,
        /// Annual interest rate percentage
        #[arg(long)]
        interest_rate: Option<f64>,
        /// Loan category (home, car, personal, education, other)
        #[arg(short, long, default_value = "other")]
        category: String,
    },
    /// List all EMIs
    List,
    /// Edit an EMI (full-record update from the current values)
    Update {
        /// EMI name or ID
        emi: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New monthly installment amount
        #[arg(long)]
        emi_amount: Option<String>,
        /// New due day (1-31)
        #[arg(long)]
        due_day: Option<u32>,
        /// New annual interest rate percentage
        #[arg(long)]
        interest_rate: Option<f64>,
        /// New category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Delete an EMI
    Delete {
        /// EMI name or ID
        emi: String,
    },
}

/// Find an EMI by id or name
fn find_emi<'a>(emis: &'a [Emi], needle: &str) -> Result<&'a Emi> {
    if let Ok(id) = needle.parse::<EmiId>() {
        if let Some(emi) = emis.iter().find(|e| e.id == id) {
            return Ok(emi);
        }
    }
    let lower = needle.to_lowercase();
    emis.iter()
        .find(|e| e.name.to_lowercase() == lower || e.id.to_string() == needle)
        .ok_or_else(|| Error::emi_not_found(needle))
}

fn parse_category(s: &str) -> Result<EmiCategory> {
    EmiCategory::parse(s).ok_or_else(|| {
        Error::Validation(format!(
            "Invalid category: '{}'. Valid categories: home, car, personal, education, other",
            s
        ))
    })
}

/// Handle an EMI command
pub async fn handle_emi_command(store: &FinanceStore, cmd: EmiCommands) -> Result<()> {
    match cmd {
        EmiCommands::Add {
            name,
            loan_amount,
            emi_amount,
            due_day,
            start_date,
            duration,
            interest_rate,
            category,
        } => {
            let mut draft = NewEmi::new(
                name,
                parse_amount(&loan_amount)?,
                parse_amount(&emi_amount)?,
                due_day,
                parse_date(&start_date)?,
                duration,
            )
            .with_category(parse_category(&category)?);
            if let Some(rate) = interest_rate {
                draft = draft.with_interest_rate(rate);
            }
            draft
                .validate()
                .map_err(|e| Error::Validation(e.to_string()))?;

            let emi = store.add_emi(draft).await?;
            let today = Local::now().date_naive();

            println!("Added EMI: {} ({})", emi.name, emi.id);
            println!("  Installment: {}/month", emi.emi_amount);
            println!(
                "  Next due: {}",
                next_due_date(emi.due_day, today).format("%Y-%m-%d")
            );
            println!(
                "  Remaining: {} of {} months",
                emi.remaining_months, emi.duration_months
            );
        }
        EmiCommands::List => {
            let today = Local::now().date_naive();
            print!("{}", format_emi_list(&store.state().emis, today));
        }
        EmiCommands::Update {
            emi,
            name,
            emi_amount,
            due_day,
            interest_rate,
            category,
        } => {
            let state = store.state();
            let mut record = find_emi(&state.emis, &emi)?.clone();

            if let Some(name) = name {
                record.name = name;
            }
            if let Some(amount) = emi_amount {
                record.emi_amount = parse_amount(&amount)?;
            }
            if let Some(day) = due_day {
                record.due_day = day;
            }
            if let Some(rate) = interest_rate {
                record.interest_rate = Some(rate);
            }
            if let Some(category) = category {
                record.category = parse_category(&category)?;
            }
            record
                .validate()
                .map_err(|e| Error::Validation(e.to_string()))?;

            let updated = store.update_emi(record).await?;
            println!("Updated EMI: {} ({})", updated.name, updated.id);
        }
        EmiCommands::Delete { emi } => {
            let state = store.state();
            let record = find_emi(&state.emis, &emi)?;
            let (id, name) = (record.id, record.name.clone());

            store.delete_emi(id).await?;
            println!("Deleted EMI: {} ({})", name, id);
        }
    }

    Ok(())
}
