use std::sync::Arc;

use anyhow::{bail, Result};
use chrono::Local;
use clap::{Parser, Subcommand};

use fintrack::cli::{
    handle_budget_command, handle_emi_command, handle_export_command, handle_transaction_command,
    BudgetCommands, EmiCommands, ExportArgs, TransactionCommands,
};
use fintrack::config::{FintrackPaths, Settings};
use fintrack::display::{emi::format_emi_list, summary::format_summary};
use fintrack::gateway::LocalGateway;
use fintrack::models::{MonthlyBudget, Money};
use fintrack::store::FinanceStore;
use fintrack::summary::financial_summary;

#[derive(Parser)]
#[command(
    name = "fintrack",
    author = "Kaylee Beyene",
    version,
    about = "Personal finance tracker for EMIs, transactions, and monthly budgets",
    long_about = "fintrack keeps your loan installments (EMIs), income and expense \
                  transactions, and monthly budget in one place, and shows where \
                  the month's money went."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Set up the local profile
    Init {
        /// Email address for the local profile
        #[arg(short, long)]
        email: String,
        /// Fixed monthly income (e.g. "50000")
        #[arg(long)]
        income: Option<String>,
    },

    /// Show this month's financial summary
    Summary,

    /// EMI management commands
    #[command(subcommand)]
    Emi(EmiCommands),

    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(TransactionCommands),

    /// Budget management commands
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Export the current snapshot
    Export(ExportArgs),

    /// Show current configuration and paths
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let paths = FintrackPaths::new()?;

    match cli.command {
        Some(Commands::Init { email, income }) => {
            let mut settings = Settings::load_or_create(&paths)?;
            settings.email = Some(email);
            settings.setup_completed = true;
            settings.save(&paths)?;

            println!("Profile saved at {}", paths.settings_file().display());

            if let Some(income) = income {
                let income = Money::parse(&income)
                    .map_err(|e| fintrack::Error::Validation(e.to_string()))?;
                let store = open_store(&paths, &settings).await?;
                store
                    .update_budget(MonthlyBudget::with_income(income))
                    .await?;
                println!("Monthly income set to {}", income);
            }

            println!("Run 'fintrack summary' to see this month's picture.");
        }
        Some(Commands::Summary) => {
            let settings = load_settings(&paths)?;
            let store = open_store(&paths, &settings).await?;
            let state = store.state();
            let today = Local::now().date_naive();

            let summary = financial_summary(
                &state.emis,
                &state.transactions,
                state.monthly_budget.income,
                today,
            );
            print!("{}", format_summary(&summary));

            if !state.emis.is_empty() {
                println!();
                println!("Active EMIs");
                println!("-----------");
                print!("{}", format_emi_list(&state.emis, today));
            }
        }
        Some(Commands::Emi(cmd)) => {
            let settings = load_settings(&paths)?;
            let store = open_store(&paths, &settings).await?;
            handle_emi_command(&store, cmd).await?;
        }
        Some(Commands::Transaction(cmd)) => {
            let settings = load_settings(&paths)?;
            let store = open_store(&paths, &settings).await?;
            handle_transaction_command(&store, cmd).await?;
        }
        Some(Commands::Budget(cmd)) => {
            let settings = load_settings(&paths)?;
            let store = open_store(&paths, &settings).await?;
            handle_budget_command(&store, cmd).await?;
        }
        Some(Commands::Export(args)) => {
            let settings = load_settings(&paths)?;
            let store = open_store(&paths, &settings).await?;
            handle_export_command(&store, args).await?;
        }
        Some(Commands::Config) => {
            println!("fintrack Configuration");
            println!("======================");
            println!("Config file:    {}", paths.settings_file().display());
            println!("Data directory: {}", paths.data_dir().display());
            if let Ok(settings) = Settings::load(&paths) {
                println!();
                println!("Profile email:  {}", settings.email.as_deref().unwrap_or("(not set)"));
                println!("User id:        {}", settings.user_id);
                println!("Setup complete: {}", settings.setup_completed);
            }
        }
        None => {
            println!("fintrack - personal finance tracker");
            println!();
            println!("Run 'fintrack --help' for usage information.");
            println!("Run 'fintrack init --email you@example.com' to get started.");
        }
    }

    Ok(())
}

/// Load settings, requiring completed setup
fn load_settings(paths: &FintrackPaths) -> Result<Settings> {
    if !paths.is_initialized() {
        bail!("fintrack is not set up yet. Run 'fintrack init --email you@example.com' first.");
    }
    Ok(Settings::load(paths)?)
}

/// Build the store over the local gateway and start the session
async fn open_store(paths: &FintrackPaths, settings: &Settings) -> Result<FinanceStore> {
    let Some(identity) = settings.identity() else {
        bail!("No profile email recorded. Run 'fintrack init --email you@example.com' first.");
    };
    let gateway = LocalGateway::new(paths.clone());
    let store = FinanceStore::new(Arc::new(gateway));
    store.sign_in(identity).await?;
    Ok(store)
}
