//! Amortization schedule generator.
//!
//! Produces the period-by-period split of each installment into interest and
//! principal, and the running balance. Each row is rounded independently to
//! the currency's minor unit; rounding drift is not redistributed, it ends up
//! in the final row's `remaining_balance` (a small residual, or clamped to
//! zero). [`FinalPeriod::Settle`] opts into adjusting the last installment so
//! the loan closes at exactly zero.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use super::emi::{installment_for, round_money, term_warnings, LoanTerms};
use crate::error::LendingError;
use crate::types::{with_metadata, ComputationOutput, Currency, Money, Rate};
use crate::LendingResult;

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

/// How the last emitted period treats the outstanding balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalPeriod {
    /// Every row pays the fixed installment; the balance is clamped at zero
    /// and any rounding residual is left on the last row.
    #[default]
    Clamp,
    /// The last row pays exactly the outstanding balance plus its interest.
    Settle,
}

/// One period of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// 1-based period number.
    pub period: u32,
    pub installment: Money,
    pub principal_component: Money,
    pub interest_component: Money,
    /// Balance outstanding after this period's payment. Never negative.
    pub remaining_balance: Money,
}

/// Input for [`build_schedule`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleInput {
    #[serde(flatten)]
    pub terms: LoanTerms,
    #[serde(default)]
    pub final_period: FinalPeriod,
}

/// Schedule output with aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleOutput {
    pub installment: Money,
    pub tenure_months: u32,
    /// Number of rows actually emitted (<= tenure_months).
    pub periods: u32,
    pub rows: Vec<AmortizationRow>,
    pub total_paid: Money,
    pub total_principal: Money,
    pub total_interest: Money,
    /// Balance left after the last row (non-zero only through rounding drift).
    pub residual_balance: Money,
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

/// Validated loan terms from which schedules are produced lazily.
///
/// [`AmortizationPlan::rows`] returns a new iterator on every call, so a plan
/// can be walked any number of times and always yields the same rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmortizationPlan {
    opening_balance: Money,
    monthly_rate: Rate,
    tenure_months: u32,
    installment: Money,
    currency: Currency,
    final_period: FinalPeriod,
}

impl AmortizationPlan {
    /// Validate the terms and compute the installment. Fails before any row
    /// can be produced.
    pub fn new(terms: &LoanTerms) -> LendingResult<Self> {
        let tenure_months = terms.validate()?;
        let installment = installment_for(terms, tenure_months)?;

        Ok(Self {
            opening_balance: terms.opening_balance(),
            monthly_rate: terms.monthly_rate(),
            tenure_months,
            installment,
            currency: terms.currency.clone(),
            final_period: FinalPeriod::default(),
        })
    }

    pub fn with_final_period(mut self, final_period: FinalPeriod) -> Self {
        self.final_period = final_period;
        self
    }

    pub fn installment(&self) -> Money {
        self.installment
    }

    pub fn tenure_months(&self) -> u32 {
        self.tenure_months
    }

    pub fn opening_balance(&self) -> Money {
        self.opening_balance
    }

    pub fn final_period(&self) -> FinalPeriod {
        self.final_period
    }

    /// Iterate the schedule from period 1.
    pub fn rows(&self) -> ScheduleRows<'_> {
        ScheduleRows {
            plan: self,
            period: 0,
            balance: self.opening_balance,
            finished: false,
        }
    }

    /// Rows of the 0-based `page`. Page counts are based on the rows the
    /// schedule actually emits, which can be fewer than `tenure_months`.
    pub fn page(&self, page: u32, page_size: u32) -> LendingResult<SchedulePage> {
        if page_size == 0 {
            return Err(LendingError::invalid("page_size", "Page size must be positive"));
        }
        let total_periods = self.rows().count() as u32;
        let skip = page.saturating_mul(page_size) as usize;
        let rows: Vec<AmortizationRow> =
            self.rows().skip(skip).take(page_size as usize).collect();

        Ok(SchedulePage {
            page,
            page_size,
            tenure_months: self.tenure_months,
            total_periods,
            total_pages: total_periods.div_ceil(page_size),
            page_installments: rows.iter().map(|r| r.installment).sum(),
            rows,
        })
    }
}

/// One page of a schedule, for tables that render a year at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulePage {
    pub page: u32,
    pub page_size: u32,
    pub tenure_months: u32,
    /// Rows the schedule emits in total.
    pub total_periods: u32,
    pub total_pages: u32,
    pub rows: Vec<AmortizationRow>,
    pub page_installments: Money,
}

/// Finite iterator over the rows of an [`AmortizationPlan`].
#[derive(Debug, Clone)]
pub struct ScheduleRows<'a> {
    plan: &'a AmortizationPlan,
    period: u32,
    balance: Money,
    finished: bool,
}

impl Iterator for ScheduleRows<'_> {
    type Item = AmortizationRow;

    fn next(&mut self) -> Option<AmortizationRow> {
        let plan = self.plan;
        if self.finished || self.period >= plan.tenure_months {
            return None;
        }
        self.period += 1;

        let interest = round_money(self.balance * plan.monthly_rate, &plan.currency);
        let mut installment = plan.installment;
        let mut principal = installment - interest;
        let mut remaining = self.balance - principal;

        let last_period = self.period == plan.tenure_months;
        if plan.final_period == FinalPeriod::Settle && (last_period || remaining <= Decimal::ZERO)
        {
            principal = self.balance;
            installment = principal + interest;
            remaining = Decimal::ZERO;
        }

        // Safety exit: rounding drift can zero the balance before the last period.
        if remaining <= Decimal::ZERO {
            remaining = Decimal::ZERO;
            self.finished = true;
        }
        self.balance = remaining;

        Some(AmortizationRow {
            period: self.period,
            installment,
            principal_component: principal,
            interest_component: interest,
            remaining_balance: remaining,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            return (0, Some(0));
        }
        let left = (self.plan.tenure_months - self.period) as usize;
        (left.min(1), Some(left))
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Full schedule for the terms, with the default [`FinalPeriod::Clamp`] policy.
pub fn generate_schedule(terms: &LoanTerms) -> LendingResult<Vec<AmortizationRow>> {
    let plan = AmortizationPlan::new(terms)?;
    Ok(plan.rows().collect())
}

/// Schedule with aggregates and warnings, wrapped in the output envelope.
pub fn build_schedule(input: &ScheduleInput) -> LendingResult<ComputationOutput<ScheduleOutput>> {
    let start = Instant::now();
    let plan = AmortizationPlan::new(&input.terms)?.with_final_period(input.final_period);
    let mut warnings = term_warnings(&input.terms, plan.tenure_months());

    let rows: Vec<AmortizationRow> = plan.rows().collect();
    let periods = rows.len() as u32;
    let total_paid: Money = rows.iter().map(|r| r.installment).sum();
    let total_principal: Money = rows.iter().map(|r| r.principal_component).sum();
    let total_interest: Money = rows.iter().map(|r| r.interest_component).sum();
    let residual_balance = rows
        .last()
        .map(|r| r.remaining_balance)
        .unwrap_or(plan.opening_balance());

    if periods < plan.tenure_months() {
        warnings.push(format!(
            "Balance reached zero after {} of {} periods due to rounding",
            periods,
            plan.tenure_months()
        ));
    }
    if residual_balance > Decimal::ZERO {
        warnings.push(format!(
            "Rounding left a residual balance of {residual_balance} after the final period"
        ));
    }

    debug!(
        periods,
        tenure_months = plan.tenure_months(),
        residual = %residual_balance,
        "built amortization schedule"
    );

    let output = ScheduleOutput {
        installment: plan.installment(),
        tenure_months: plan.tenure_months(),
        periods,
        rows,
        total_paid,
        total_principal,
        total_interest,
        residual_balance,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let methodology = match input.final_period {
        FinalPeriod::Clamp => "Reducing-balance amortization, per-row rounding, balance clamped at zero",
        FinalPeriod::Settle => "Reducing-balance amortization, per-row rounding, final installment settles balance",
    };
    Ok(with_metadata(methodology, input, warnings, elapsed, output))
}
