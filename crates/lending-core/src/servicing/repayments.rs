//! Loan accounts, repayment recording and repayment position.
//!
//! A [`LoanAccount`] is the persisted loan record: the terms captured at
//! intake, the EMI and total repayment stored then, and the repayment
//! history. Schedules are always rebuilt from the persisted principal, rate
//! and tenure, never from the stored EMI.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use crate::amortization::emi::{compute_installment, LoanTerms};
use super::checked_total;
use crate::amortization::schedule::{generate_schedule, AmortizationRow};
use crate::error::LendingError;
use crate::types::{
    with_metadata, ComputationOutput, Currency, LoanStatus, LoanType, Money, Percent, Years,
};
use crate::LendingResult;

const DEFAULT_REPAYMENT_MODE: &str = "Manual";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum RepaymentStatus {
    #[default]
    Success,
    Processing,
    Failed,
}

/// One payment against a loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repayment {
    pub amount: Money,
    pub date: NaiveDate,
    #[serde(default)]
    pub status: RepaymentStatus,
    #[serde(default = "default_mode")]
    pub mode: String,
}

pub(crate) fn default_mode() -> String {
    DEFAULT_REPAYMENT_MODE.to_string()
}

/// Persisted loan record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanAccount {
    pub id: String,
    pub loan_type: LoanType,
    #[serde(default)]
    pub status: LoanStatus,
    pub principal: Money,
    pub annual_rate_percent: Percent,
    pub tenure_years: Years,
    #[serde(default)]
    pub currency: Currency,
    /// EMI stored at intake.
    pub emi: Money,
    /// Total repayment stored at intake.
    pub total_repayment: Money,
    #[serde(default)]
    pub repayments: Vec<Repayment>,
}

impl LoanAccount {
    /// Terms rebuilt from the persisted principal, rate and tenure.
    pub fn terms(&self) -> LoanTerms {
        LoanTerms {
            principal: self.principal,
            annual_rate_percent: self.annual_rate_percent,
            tenure_years: self.tenure_years,
            currency: self.currency.clone(),
        }
    }

    /// Sum of successful repayments.
    pub fn total_paid(&self) -> LendingResult<Money> {
        checked_total(
            self.repayments
                .iter()
                .filter(|r| r.status == RepaymentStatus::Success)
                .map(|r| r.amount),
            "total paid",
        )
    }

    /// Stored total repayment less successful repayments, floored at zero.
    pub fn outstanding(&self) -> LendingResult<Money> {
        let remaining = self
            .total_repayment
            .checked_sub(self.total_paid()?)
            .ok_or_else(|| LendingError::overflow("outstanding balance"))?;
        Ok(remaining.max(Decimal::ZERO))
    }
}

/// A borrower's request to pay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepaymentRequest {
    pub amount: Money,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

/// Input for [`apply_repayment`] when driven from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyRepaymentInput {
    pub account: LoanAccount,
    pub request: RepaymentRequest,
}

/// Where a loan stands against its stored total repayment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepaymentPosition {
    pub loan_id: String,
    pub status: LoanStatus,
    pub emi: Money,
    pub total_repayment: Money,
    pub total_paid: Money,
    pub outstanding: Money,
    /// Whole installments covered by successful repayments.
    pub installments_covered: u32,
    pub installments_remaining: u32,
    /// Share of total repayment already paid, 0-100.
    pub progress_pct: Decimal,
    /// Next period due; `None` once settled.
    pub next_period: Option<u32>,
    pub is_settled: bool,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Amortization schedule for a persisted loan.
pub fn loan_schedule(account: &LoanAccount) -> LendingResult<Vec<AmortizationRow>> {
    generate_schedule(&account.terms())
}

/// Record a successful repayment and return the updated account.
pub fn apply_repayment(
    account: &LoanAccount,
    request: &RepaymentRequest,
) -> LendingResult<LoanAccount> {
    if request.amount <= Decimal::ZERO {
        return Err(LendingError::invalid(
            "amount",
            "Please provide a positive repayment amount",
        ));
    }
    if account.status != LoanStatus::Approved {
        return Err(LendingError::InvalidState(format!(
            "Loan {} is {}; repayments are accepted only on approved loans",
            account.id, account.status
        )));
    }

    let mut updated = account.clone();
    updated.repayments.push(Repayment {
        amount: request.amount,
        date: request.date,
        status: RepaymentStatus::Success,
        mode: request.mode.clone().unwrap_or_else(default_mode),
    });

    debug!(loan_id = %account.id, amount = %request.amount, "recorded repayment");
    Ok(updated)
}

/// Repayment progress for a loan.
pub fn repayment_position(
    account: &LoanAccount,
) -> LendingResult<ComputationOutput<RepaymentPosition>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let months = account.terms().validate()?;
    validate_account(account)?;

    let recomputed = compute_installment(&account.terms())?;
    if recomputed != account.emi {
        warn!(
            loan_id = %account.id,
            stored = %account.emi,
            recomputed = %recomputed,
            "stored EMI differs from recomputed EMI"
        );
        warnings.push(format!(
            "Stored EMI {} differs from the recomputed EMI {}",
            account.emi, recomputed
        ));
    }

    let total_paid = account.total_paid()?;
    let outstanding = account.outstanding()?;
    if total_paid > account.total_repayment {
        warnings.push(format!(
            "Repayments exceed the total repayment by {}",
            total_paid - account.total_repayment
        ));
    }
    let pending = account
        .repayments
        .iter()
        .filter(|r| r.status == RepaymentStatus::Processing)
        .count();
    if pending > 0 {
        warnings.push(format!("{pending} repayment(s) still processing are not counted"));
    }

    let installments_covered = total_paid
        .checked_div(account.emi)
        .ok_or_else(|| LendingError::overflow("repayment position"))?
        .floor()
        .to_u32()
        .unwrap_or(u32::MAX)
        .min(months);
    let progress_pct = if total_paid >= account.total_repayment {
        dec!(100)
    } else {
        total_paid
            .checked_div(account.total_repayment)
            .and_then(|share| share.checked_mul(dec!(100)))
            .ok_or_else(|| LendingError::overflow("repayment position"))?
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    };
    let is_settled = outstanding.is_zero();

    let output = RepaymentPosition {
        loan_id: account.id.clone(),
        status: account.status,
        emi: account.emi,
        total_repayment: account.total_repayment,
        total_paid,
        outstanding,
        installments_covered,
        installments_remaining: months - installments_covered,
        progress_pct,
        next_period: if is_settled {
            None
        } else {
            Some((installments_covered + 1).min(months))
        },
        is_settled,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Repayment position against stored total repayment",
        account,
        warnings,
        elapsed,
        output,
    ))
}

fn validate_account(account: &LoanAccount) -> LendingResult<()> {
    if account.emi <= Decimal::ZERO {
        return Err(LendingError::invalid("emi", "Stored EMI must be positive"));
    }
    if account.total_repayment < Decimal::ZERO {
        return Err(LendingError::invalid(
            "total_repayment",
            "Stored total repayment cannot be negative",
        ));
    }
    if let Some(r) = account.repayments.iter().find(|r| r.amount < Decimal::ZERO) {
        return Err(LendingError::invalid(
            "repayments",
            format!("Repayment on {} has a negative amount", r.date),
        ));
    }
    Ok(())
}
