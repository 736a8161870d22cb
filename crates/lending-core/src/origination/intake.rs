//! Loan intake: the EMI and total repayment stored on a new loan record.
//!
//! The quote is computed once, when the application is created, through the
//! shared EMI calculator. It is not recomputed when the application's status
//! changes later.

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use super::products::{check_product_limits, LoanProduct};
use crate::amortization::emi::{
    installment_for, term_warnings, total_interest, total_repayment, LoanTerms,
};
use crate::error::LendingError;
use crate::types::{with_metadata, ComputationOutput, Currency, LoanType, Money, Percent, Years};
use crate::LendingResult;

/// A borrower's loan application as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub loan_type: LoanType,
    pub amount: Money,
    pub tenure_years: Years,
    /// Requested annual rate. Falls back to the product's rate when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate_percent: Option<Percent>,
    pub purpose: String,
    #[serde(default)]
    pub currency: Currency,
    /// Product the application is made against, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<LoanProduct>,
}

/// Figures persisted on the loan record at intake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanQuote {
    pub loan_type: LoanType,
    pub principal: Money,
    pub annual_rate_percent: Percent,
    pub tenure_months: u32,
    pub emi: Money,
    pub total_repayment: Money,
    pub total_interest: Money,
}

/// Validate an application and compute its EMI and totals.
pub fn quote_application(
    input: &LoanApplication,
) -> LendingResult<ComputationOutput<LoanQuote>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.purpose.trim().is_empty() {
        return Err(LendingError::invalid(
            "purpose",
            "Please explain the purpose of the loan",
        ));
    }

    let rate = resolve_rate(input, &mut warnings)?;
    let terms = LoanTerms {
        principal: input.amount,
        annual_rate_percent: rate,
        tenure_years: input.tenure_years,
        currency: input.currency.clone(),
    };
    let months = terms.validate()?;
    warnings.extend(term_warnings(&terms, months));

    let emi = installment_for(&terms, months)?;
    let total_repayment = total_repayment(emi, months);
    let principal = terms.opening_balance();

    debug!(
        loan_type = %input.loan_type,
        principal = %principal,
        emi = %emi,
        "quoted loan application"
    );

    let output = LoanQuote {
        loan_type: input.loan_type,
        principal,
        annual_rate_percent: rate,
        tenure_months: months,
        emi,
        total_repayment,
        total_interest: total_interest(total_repayment, principal),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Loan intake quote (shared EMI calculator)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn resolve_rate(input: &LoanApplication, warnings: &mut Vec<String>) -> LendingResult<Percent> {
    let Some(product) = &input.product else {
        return input.interest_rate_percent.ok_or_else(|| {
            LendingError::invalid(
                "interest_rate_percent",
                "An interest rate is required when no product is selected",
            )
        });
    };

    if product.loan_type != input.loan_type {
        return Err(LendingError::invalid(
            "loan_type",
            format!(
                "{} loan application cannot use the {} product",
                input.loan_type, product.name
            ),
        ));
    }
    check_product_limits(product, input.amount, input.tenure_years)?;

    match input.interest_rate_percent {
        Some(requested) if requested != product.interest_rate_percent => {
            warnings.push(format!(
                "Requested rate {}% differs from the {} rate of {}%",
                requested, product.name, product.interest_rate_percent
            ));
            Ok(requested)
        }
        Some(requested) => Ok(requested),
        None => Ok(product.interest_rate_percent),
    }
}
