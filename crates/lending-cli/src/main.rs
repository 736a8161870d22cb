mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::amortization::{EmiArgs, ScheduleArgs};
use commands::origination::{EligibilityArgs, ProductsArgs, QuoteArgs};
use commands::servicing::{
    CollectionsArgs, OverviewArgs, PortfolioArgs, RepayArgs, RepaymentStatusArgs,
};

/// Loan EMI, amortization and servicing calculations
#[derive(Parser)]
#[command(
    name = "lend",
    version,
    about = "Loan EMI, amortization and servicing calculations",
    long_about = "A CLI for reducing-balance loan calculations with decimal precision. \
                  Supports EMI quotes, amortization schedules, intake quotes, eligibility \
                  pre-checks, repayment tracking, collections and portfolio reports."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log level when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the fixed monthly installment (EMI)
    Emi(EmiArgs),
    /// Generate a period-by-period amortization schedule
    Schedule(ScheduleArgs),
    /// Quote a loan application (EMI and totals stored at intake)
    Quote(QuoteArgs),
    /// Run the eligibility pre-check for an applicant
    Eligibility(EligibilityArgs),
    /// List the loan product catalogue
    Products(ProductsArgs),
    /// Repayment position of a loan account
    RepaymentStatus(RepaymentStatusArgs),
    /// Record a repayment against an approved loan
    Repay(RepayArgs),
    /// Summarise the collections ledger
    Collections(CollectionsArgs),
    /// Portfolio mix and volume report over a loan book
    Portfolio(PortfolioArgs),
    /// Borrower dashboard overview
    Overview(OverviewArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

/// Logs go to stderr so piped output stays clean.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Emi(args) => commands::amortization::run_emi(args),
        Commands::Schedule(args) => commands::amortization::run_schedule(args),
        Commands::Quote(args) => commands::origination::run_quote(args),
        Commands::Eligibility(args) => commands::origination::run_eligibility(args),
        Commands::Products(args) => commands::origination::run_products(args),
        Commands::RepaymentStatus(args) => commands::servicing::run_repayment_status(args),
        Commands::Repay(args) => commands::servicing::run_repay(args),
        Commands::Collections(args) => commands::servicing::run_collections(args),
        Commands::Portfolio(args) => commands::servicing::run_portfolio(args),
        Commands::Overview(args) => commands::servicing::run_overview(args),
        Commands::Version => {
            println!("lend {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
