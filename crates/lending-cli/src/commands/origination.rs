use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use lending_core::origination::eligibility::{
    check_eligibility, ApplicantProfile, EligibilityCriteria, EligibilityInput,
};
use lending_core::origination::intake::{quote_application, LoanApplication};
use lending_core::origination::products::{find_product, standard_catalogue, LoanProduct};
use lending_core::{Currency, LoanType};

use crate::input;

/// Arguments for an intake quote
#[derive(Args)]
pub struct QuoteArgs {
    /// Loan type (Personal, Business, Home, Education); selects the standard product
    #[arg(long)]
    pub loan_type: Option<String>,

    /// Requested amount
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Tenure in years
    #[arg(long)]
    pub tenure: Option<Decimal>,

    /// Requested annual rate in percent (defaults to the product rate)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Purpose of the loan
    #[arg(long)]
    pub purpose: Option<String>,

    /// Path to JSON/YAML application file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the eligibility pre-check
#[derive(Args)]
pub struct EligibilityArgs {
    /// Applicant age in years
    #[arg(long)]
    pub age: Option<u32>,

    /// Monthly income
    #[arg(long)]
    pub income: Option<Decimal>,

    /// Credit score
    #[arg(long)]
    pub credit_score: Option<u32>,

    /// Path to JSON/YAML input file with applicant and criteria
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the product catalogue
#[derive(Args)]
pub struct ProductsArgs {
    /// Path to a JSON/YAML product list (defaults to the standard catalogue)
    #[arg(long)]
    pub input: Option<String>,

    /// Show only active products
    #[arg(long)]
    pub active: bool,
}

fn parse_loan_type(raw: &str) -> Result<LoanType, Box<dyn std::error::Error>> {
    let loan_type = match raw.to_ascii_lowercase().as_str() {
        "personal" => LoanType::Personal,
        "business" => LoanType::Business,
        "home" => LoanType::Home,
        "education" => LoanType::Education,
        other => return Err(format!("Unknown loan type '{other}'").into()),
    };
    Ok(loan_type)
}

pub fn run_quote(args: QuoteArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let application: LoanApplication = match input::load(args.input.as_deref())? {
        Some(data) => data,
        None => {
            let loan_type = parse_loan_type(
                args.loan_type
                    .as_deref()
                    .ok_or("--loan-type is required (or provide --input)")?,
            )?;
            let catalogue = standard_catalogue();
            LoanApplication {
                loan_type,
                amount: args
                    .amount
                    .ok_or("--amount is required (or provide --input)")?,
                tenure_years: args
                    .tenure
                    .ok_or("--tenure is required (or provide --input)")?,
                interest_rate_percent: args.rate,
                purpose: args
                    .purpose
                    .ok_or("--purpose is required (or provide --input)")?,
                currency: Currency::default(),
                product: find_product(&catalogue, loan_type).cloned(),
            }
        }
    };
    let result = quote_application(&application)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_eligibility(args: EligibilityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let eligibility_input: EligibilityInput = match input::load(args.input.as_deref())? {
        Some(data) => data,
        None => EligibilityInput {
            applicant: ApplicantProfile {
                age: args.age.ok_or("--age is required (or provide --input)")?,
                monthly_income: args
                    .income
                    .ok_or("--income is required (or provide --input)")?,
                credit_score: args
                    .credit_score
                    .ok_or("--credit-score is required (or provide --input)")?,
                employment: Default::default(),
            },
            criteria: EligibilityCriteria::default(),
        },
    };
    let result = check_eligibility(&eligibility_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_products(args: ProductsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut products: Vec<LoanProduct> = match args.input {
        Some(ref path) => input::file::read_document(path)?,
        None => standard_catalogue(),
    };
    if args.active {
        products.retain(|p| p.is_active());
    }
    Ok(serde_json::to_value(products)?)
}
