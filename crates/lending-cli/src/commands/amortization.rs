use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use lending_core::amortization::{
    build_schedule, calculate_emi, EmiInput, FinalPeriod, LoanTerms, ScheduleInput,
};
use lending_core::Currency;

use crate::input;

/// Currencies selectable from the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CurrencyArg {
    Usd,
    Gbp,
    Eur,
    Chf,
    Jpy,
    Cad,
    Aud,
    Inr,
    Sgd,
}

impl From<CurrencyArg> for Currency {
    fn from(arg: CurrencyArg) -> Self {
        match arg {
            CurrencyArg::Usd => Currency::USD,
            CurrencyArg::Gbp => Currency::GBP,
            CurrencyArg::Eur => Currency::EUR,
            CurrencyArg::Chf => Currency::CHF,
            CurrencyArg::Jpy => Currency::JPY,
            CurrencyArg::Cad => Currency::CAD,
            CurrencyArg::Aud => Currency::AUD,
            CurrencyArg::Inr => Currency::INR,
            CurrencyArg::Sgd => Currency::SGD,
        }
    }
}

/// Loan terms shared by `emi` and `schedule`.
#[derive(Args)]
pub struct TermsArgs {
    /// Amount borrowed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 10.5)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Tenure in years; fractions round to whole months
    #[arg(long, alias = "years")]
    pub tenure: Option<Decimal>,

    /// Currency; decides the rounding unit
    #[arg(long, value_enum, default_value = "usd")]
    pub currency: CurrencyArg,
}

impl TermsArgs {
    fn to_terms(&self) -> Result<LoanTerms, Box<dyn std::error::Error>> {
        Ok(LoanTerms::new(
            self.principal
                .ok_or("--principal is required (or provide --input)")?,
            self.rate.ok_or("--rate is required (or provide --input)")?,
            self.tenure
                .ok_or("--tenure is required (or provide --input)")?,
        )
        .with_currency(self.currency.into()))
    }
}

/// Arguments for the EMI calculator
#[derive(Args)]
pub struct EmiArgs {
    #[command(flatten)]
    pub terms: TermsArgs,

    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub terms: TermsArgs,

    /// Make the final installment settle the outstanding balance exactly
    #[arg(long)]
    pub settle: bool,

    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_emi(args: EmiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let emi_input: EmiInput = match input::load(args.input.as_deref())? {
        Some(data) => data,
        None => args.terms.to_terms()?,
    };
    let result = calculate_emi(&emi_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let schedule_input: ScheduleInput = match input::load(args.input.as_deref())? {
        Some(data) => data,
        None => ScheduleInput {
            terms: args.terms.to_terms()?,
            final_period: if args.settle {
                FinalPeriod::Settle
            } else {
                FinalPeriod::Clamp
            },
        },
    };
    let result = build_schedule(&schedule_input)?;
    Ok(serde_json::to_value(result)?)
}
