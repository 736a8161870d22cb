use chrono::{Local, NaiveDate};
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use lending_core::servicing::ledger::{collections_summary, ledger_from_accounts, CollectionsInput};
use lending_core::servicing::portfolio::{borrower_overview, portfolio_report, PortfolioInput};
use lending_core::servicing::repayments::{
    apply_repayment, repayment_position, ApplyRepaymentInput, LoanAccount, RepaymentRequest,
};

use crate::input;

/// Arguments for the repayment position of one loan
#[derive(Args)]
pub struct RepaymentStatusArgs {
    /// Path to JSON/YAML loan account file
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for recording a repayment
#[derive(Args)]
pub struct RepayArgs {
    /// Path to a loan account file, or an {account, request} file when --amount is omitted
    #[arg(long)]
    pub input: Option<String>,

    /// Amount paid
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Payment date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Payment mode (e.g. Online, Cash)
    #[arg(long)]
    pub mode: Option<String>,
}

/// Arguments for the collections summary
#[derive(Args)]
pub struct CollectionsArgs {
    /// Path to a ledger file ({entries, as_of}), or a list of loan accounts with --from-accounts
    #[arg(long)]
    pub input: Option<String>,

    /// Treat the input as a list of loan accounts and flatten their repayments
    #[arg(long)]
    pub from_accounts: bool,

    /// Reporting date when building from accounts; defaults to today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

/// Arguments for the portfolio report
#[derive(Args)]
pub struct PortfolioArgs {
    /// Path to JSON/YAML file with {loans: [...]}
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the borrower overview
#[derive(Args)]
pub struct OverviewArgs {
    /// Path to JSON/YAML file with the borrower's {loans: [...]}
    #[arg(long)]
    pub input: Option<String>,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn run_repayment_status(args: RepaymentStatusArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let account: LoanAccount = input::load(args.input.as_deref())?
        .ok_or("--input <account.json> or stdin required for repayment status")?;
    let result = repayment_position(&account)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_repay(args: RepayArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let repay_input: ApplyRepaymentInput = match args.amount {
        Some(amount) => {
            let account: LoanAccount = input::load(args.input.as_deref())?
                .ok_or("--input <account.json> or stdin required to record a repayment")?;
            ApplyRepaymentInput {
                account,
                request: RepaymentRequest {
                    amount,
                    date: args.date.unwrap_or_else(today),
                    mode: args.mode,
                },
            }
        }
        None => input::load(args.input.as_deref())?
            .ok_or("--amount is required (or provide --input with account and request)")?,
    };
    let updated = apply_repayment(&repay_input.account, &repay_input.request)?;
    Ok(serde_json::to_value(updated)?)
}

pub fn run_collections(args: CollectionsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let collections_input: CollectionsInput = if args.from_accounts {
        let accounts: Vec<LoanAccount> = input::load(args.input.as_deref())?
            .ok_or("--input <accounts.json> or stdin required with --from-accounts")?;
        CollectionsInput {
            entries: ledger_from_accounts(&accounts),
            as_of: args.as_of.unwrap_or_else(today),
        }
    } else {
        let mut ledger: CollectionsInput = input::load(args.input.as_deref())?
            .ok_or("--input <ledger.json> or stdin required for collections summary")?;
        if let Some(as_of) = args.as_of {
            ledger.as_of = as_of;
        }
        ledger
    };
    let result = collections_summary(&collections_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_portfolio(args: PortfolioArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let book: PortfolioInput = input::load(args.input.as_deref())?
        .ok_or("--input <loans.json> or stdin required for portfolio report")?;
    let result = portfolio_report(&book)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_overview(args: OverviewArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loans: PortfolioInput = input::load(args.input.as_deref())?
        .ok_or("--input <loans.json> or stdin required for borrower overview")?;
    let result = borrower_overview(&loans)?;
    Ok(serde_json::to_value(result)?)
}
