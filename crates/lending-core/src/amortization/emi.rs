//! EMI (equated monthly installment) calculator for reducing-balance loans.
//!
//! This is the single EMI implementation in the workspace: loan intake,
//! schedule generation, the CLI and the Node bindings all call
//! [`compute_installment`], so there is exactly one rounding path.
//!
//! Monetary values are rounded to the currency's minor unit using
//! round-half-up (`MidpointAwayFromZero`; every amount here is positive).
//! Fractional tenures are converted to whole months the same way, so
//! 2.5 years is 30 months and 1.04 years (12.48 months) is 12 months.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::error::LendingError;
use crate::types::{with_metadata, ComputationOutput, Currency, Money, Percent, Rate, Years};
use crate::LendingResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Largest principal accepted. Keeps every intermediate well inside the
/// 96-bit mantissa of `Decimal`.
pub const MAX_PRINCIPAL: Money = dec!(1_000_000_000_000);

/// Largest annual rate accepted, in percent.
pub const MAX_ANNUAL_RATE_PERCENT: Percent = dec!(1000);

/// Longest tenure accepted (100 years).
pub const MAX_TENURE_MONTHS: u32 = 1200;

/// Annual rates above this draw a warning (usury territory in most markets).
const HIGH_RATE_WARNING_PERCENT: Percent = dec!(36);

const MONTHS_PER_YEAR: Decimal = dec!(12);

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

/// Terms of a reducing-balance loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Amount borrowed.
    pub principal: Money,
    /// Nominal annual rate in percent (10.5 = 10.5%).
    pub annual_rate_percent: Percent,
    /// Tenure in years; fractional values are rounded to whole months.
    pub tenure_years: Years,
    /// Currency of the loan; decides the rounding unit.
    #[serde(default)]
    pub currency: Currency,
}

/// Input for [`calculate_emi`].
pub type EmiInput = LoanTerms;

/// EMI calculator output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmiOutput {
    /// Fixed monthly installment, rounded to the minor unit.
    pub installment: Money,
    /// Number of monthly periods.
    pub tenure_months: u32,
    /// Monthly rate as a decimal (annual percent / 1200), unrounded.
    pub monthly_rate: Rate,
    /// installment * tenure_months.
    pub total_repayment: Money,
    /// total_repayment - principal.
    pub total_interest: Money,
}

impl LoanTerms {
    pub fn new(principal: Money, annual_rate_percent: Percent, tenure_years: Years) -> Self {
        Self {
            principal,
            annual_rate_percent,
            tenure_years,
            currency: Currency::default(),
        }
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Check the domain constraints and return the number of monthly periods.
    pub fn validate(&self) -> LendingResult<u32> {
        if self.principal <= Decimal::ZERO {
            return Err(LendingError::invalid(
                "principal",
                "Principal must be positive",
            ));
        }
        if self.principal > MAX_PRINCIPAL {
            return Err(LendingError::invalid(
                "principal",
                format!("Principal cannot exceed {MAX_PRINCIPAL}"),
            ));
        }
        if self.opening_balance().is_zero() {
            return Err(LendingError::invalid(
                "principal",
                "Principal rounds to zero in the currency's minor unit",
            ));
        }
        if self.annual_rate_percent < Decimal::ZERO {
            return Err(LendingError::invalid(
                "annual_rate_percent",
                "Interest rate cannot be negative",
            ));
        }
        if self.annual_rate_percent > MAX_ANNUAL_RATE_PERCENT {
            return Err(LendingError::invalid(
                "annual_rate_percent",
                format!("Interest rate cannot exceed {MAX_ANNUAL_RATE_PERCENT}%"),
            ));
        }
        tenure_months(self.tenure_years)
    }

    /// Monthly rate as a decimal.
    pub fn monthly_rate(&self) -> Rate {
        monthly_rate(self.annual_rate_percent)
    }

    /// Principal rounded to the minor unit; the balance every schedule starts from.
    pub fn opening_balance(&self) -> Money {
        round_money(self.principal, &self.currency)
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Monthly rate from an annual percentage: `annual / (12 * 100)`.
pub fn monthly_rate(annual_rate_percent: Percent) -> Rate {
    annual_rate_percent / dec!(1200)
}

/// Whole number of monthly periods for a tenure in years, rounded half-up.
pub fn tenure_months(tenure_years: Years) -> LendingResult<u32> {
    if tenure_years <= Decimal::ZERO {
        return Err(LendingError::invalid(
            "tenure_years",
            "Tenure must be positive",
        ));
    }

    let months = tenure_years
        .checked_mul(MONTHS_PER_YEAR)
        .ok_or_else(|| LendingError::overflow("tenure conversion"))?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    if months < Decimal::ONE {
        return Err(LendingError::invalid(
            "tenure_years",
            format!("Tenure of {tenure_years} years is less than one monthly period"),
        ));
    }
    if months > Decimal::from(MAX_TENURE_MONTHS) {
        return Err(LendingError::invalid(
            "tenure_years",
            format!("Tenure cannot exceed {MAX_TENURE_MONTHS} months"),
        ));
    }

    months
        .to_u32()
        .ok_or_else(|| LendingError::overflow("tenure conversion"))
}

/// Round a monetary amount to the currency's minor unit, half-up.
pub fn round_money(amount: Money, currency: &Currency) -> Money {
    amount.round_dp_with_strategy(
        currency.minor_unit_places(),
        RoundingStrategy::MidpointAwayFromZero,
    )
}

/// Fixed monthly installment for the given terms.
///
/// `EMI = P * r * (1+r)^n / ((1+r)^n - 1)`, or `P / n` when the rate is zero.
pub fn compute_installment(terms: &LoanTerms) -> LendingResult<Money> {
    let months = terms.validate()?;
    installment_for(terms, months)
}

/// Total paid over the life of the loan.
pub fn total_repayment(installment: Money, tenure_months: u32) -> Money {
    installment * Decimal::from(tenure_months)
}

/// Interest paid over the life of the loan.
pub fn total_interest(total_repayment: Money, principal: Money) -> Money {
    total_repayment - principal
}

/// EMI with totals, wrapped in the standard output envelope.
pub fn calculate_emi(input: &EmiInput) -> LendingResult<ComputationOutput<EmiOutput>> {
    let start = Instant::now();
    let months = input.validate()?;
    let warnings = term_warnings(input, months);

    let installment = installment_for(input, months)?;
    let total_repayment = total_repayment(installment, months);
    let output = EmiOutput {
        installment,
        tenure_months: months,
        monthly_rate: input.monthly_rate(),
        total_repayment,
        total_interest: total_interest(total_repayment, input.opening_balance()),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Reducing-balance EMI (annuity formula, round-half-up to minor unit)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

/// Installment for already-validated terms.
pub(crate) fn installment_for(terms: &LoanTerms, months: u32) -> LendingResult<Money> {
    let principal = terms.opening_balance();
    let rate = terms.monthly_rate();
    let raw = annuity_payment(principal, rate, months)?;
    let installment = round_money(raw, &terms.currency);

    debug!(
        principal = %principal,
        annual_rate_percent = %terms.annual_rate_percent,
        months,
        installment = %installment,
        "computed installment"
    );

    Ok(installment)
}

fn annuity_payment(principal: Money, rate: Rate, months: u32) -> LendingResult<Money> {
    if rate.is_zero() {
        return Ok(principal / Decimal::from(months));
    }

    // Past ~1e28 the annuity ratio f/(f-1) is 1 at Decimal precision, so the
    // installment is the interest-only payment P*r.
    let Some(factor) = (Decimal::ONE + rate).checked_powu(u64::from(months)) else {
        debug!(months, rate = %rate, "compounding factor exceeds Decimal range, using P*r");
        return principal
            .checked_mul(rate)
            .ok_or_else(|| LendingError::overflow("EMI"));
    };
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        return Err(LendingError::DivisionByZero {
            context: "EMI annuity factor".into(),
        });
    }

    let ratio = factor
        .checked_div(denominator)
        .ok_or_else(|| LendingError::overflow("EMI annuity factor"))?;
    principal
        .checked_mul(rate)
        .and_then(|v| v.checked_mul(ratio))
        .ok_or_else(|| LendingError::overflow("EMI"))
}

pub(crate) fn term_warnings(terms: &LoanTerms, months: u32) -> Vec<String> {
    let mut warnings = Vec::new();

    let exact_months = terms.tenure_years * MONTHS_PER_YEAR;
    if exact_months != Decimal::from(months) {
        warnings.push(format!(
            "Tenure of {} years ({} months) rounded to {} whole months",
            terms.tenure_years,
            exact_months.normalize(),
            months
        ));
    }
    if terms.principal != terms.opening_balance() {
        warnings.push(format!(
            "Principal {} rounded to {} in the currency's minor unit",
            terms.principal,
            terms.opening_balance()
        ));
    }
    if terms.annual_rate_percent > HIGH_RATE_WARNING_PERCENT {
        warnings.push(format!(
            "Annual rate of {}% is unusually high",
            terms.annual_rate_percent
        ));
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn terms(principal: Decimal, rate: Decimal, years: Decimal) -> LoanTerms {
        LoanTerms::new(principal, rate, years)
    }

    fn assert_invalid(result: LendingResult<Money>, expected_field: &str) {
        match result {
            Err(LendingError::InvalidInput { field, .. }) => assert_eq!(field, expected_field),
            other => panic!("expected InvalidInput on {expected_field}, got {other:?}"),
        }
    }

    #[test]
    fn test_guard_edge_terms_do_not_overflow() {
        // (1+r)^n exceeds the Decimal range for all three
        assert_eq!(
            compute_installment(&terms(dec!(10000), dec!(1000), dec!(10))).unwrap(),
            dec!(8333.33)
        );
        assert_eq!(
            compute_installment(&terms(dec!(10000), dec!(100), dec!(100))).unwrap(),
            dec!(833.33)
        );
        assert_eq!(
            compute_installment(&terms(dec!(10000), dec!(70), dec!(100))).unwrap(),
            dec!(583.33)
        );
        // Within range the formula still applies
        assert_eq!(
            compute_installment(&terms(dec!(10000), dec!(200), dec!(30))).unwrap(),
            dec!(1666.67)
        );
    }

    #[test]
    fn test_upper_bounds() {
        assert!(compute_installment(&terms(MAX_PRINCIPAL, dec!(12), dec!(30))).is_ok());
        assert_invalid(
            compute_installment(&terms(MAX_PRINCIPAL + dec!(0.01), dec!(12), dec!(30))),
            "principal",
        );
        assert!(compute_installment(&terms(dec!(1000), MAX_ANNUAL_RATE_PERCENT, dec!(100))).is_ok());
        assert_invalid(
            compute_installment(&terms(dec!(1000), dec!(1000.01), dec!(1))),
            "annual_rate_percent",
        );
    }

    #[test]
    fn test_reference_installment_cents() {
        // Exact annuity value is 1074.6950189...
        let emi = compute_installment(&terms(dec!(50000), dec!(10.5), dec!(5))).unwrap();
        assert_eq!(emi, dec!(1074.70));
    }

    #[test]
    fn test_reference_installment_whole_units() {
        let t = terms(dec!(50000), dec!(10.5), dec!(5)).with_currency(Currency::JPY);
        assert_eq!(compute_installment(&t).unwrap(), dec!(1075));
    }

    #[test]
    fn test_one_year_twelve_percent() {
        // 8884.8788678...
        let emi = compute_installment(&terms(dec!(100000), dec!(12), dec!(1))).unwrap();
        assert_eq!(emi, dec!(8884.88));
    }

    #[test]
    fn test_zero_rate_is_straight_division() {
        let emi = compute_installment(&terms(dec!(12000), dec!(0), dec!(1))).unwrap();
        assert_eq!(emi, dec!(1000));

        let emi = compute_installment(&terms(dec!(10000), dec!(0), dec!(3))).unwrap();
        assert_eq!(emi, dec!(277.78));
    }

    #[test]
    fn test_monthly_rate() {
        assert_eq!(monthly_rate(dec!(10.5)), dec!(0.00875));
        assert_eq!(monthly_rate(dec!(0)), Decimal::ZERO);
    }

    #[test]
    fn test_fractional_tenure_rounding() {
        assert_eq!(tenure_months(dec!(2.5)).unwrap(), 30);
        assert_eq!(tenure_months(dec!(1.04)).unwrap(), 12);
        assert_eq!(tenure_months(dec!(1.0417)).unwrap(), 13);
        // 0.5004 months rounds up to one period
        assert_eq!(tenure_months(dec!(0.0417)).unwrap(), 1);
        assert!(tenure_months(dec!(0.04)).is_err());
    }

    #[test]
    fn test_tenure_upper_bound() {
        assert_eq!(tenure_months(dec!(100)).unwrap(), 1200);
        assert!(tenure_months(dec!(100.1)).is_err());
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        assert_invalid(
            compute_installment(&terms(dec!(0), dec!(10), dec!(5))),
            "principal",
        );
        assert_invalid(
            compute_installment(&terms(dec!(1000), dec!(-1), dec!(5))),
            "annual_rate_percent",
        );
        assert_invalid(
            compute_installment(&terms(dec!(1000), dec!(10), dec!(0))),
            "tenure_years",
        );
        assert_invalid(
            compute_installment(&terms(dec!(-5), dec!(10), dec!(5))),
            "principal",
        );
        assert_invalid(
            compute_installment(&terms(dec!(0.004), dec!(10), dec!(5))),
            "principal",
        );
    }

    #[test]
    fn test_totals() {
        let repay = total_repayment(dec!(1074.70), 60);
        assert_eq!(repay, dec!(64482.00));
        assert_eq!(total_interest(repay, dec!(50000)), dec!(14482.00));
    }

    #[test]
    fn test_calculate_emi_envelope() {
        let out = calculate_emi(&terms(dec!(50000), dec!(10.5), dec!(5))).unwrap();
        let r = &out.result;
        assert_eq!(r.installment, dec!(1074.70));
        assert_eq!(r.tenure_months, 60);
        assert_eq!(r.total_repayment, dec!(64482.00));
        assert_eq!(r.total_interest, dec!(14482.00));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_calculate_emi_warns_on_rounded_tenure_and_high_rate() {
        let out = calculate_emi(&terms(dec!(5000), dec!(48), dec!(1.04))).unwrap();
        assert_eq!(out.result.tenure_months, 12);
        assert_eq!(out.warnings.len(), 2);
        assert!(out.warnings[0].contains("rounded to 12 whole months"));
        assert!(out.warnings[1].contains("unusually high"));
    }

    #[test]
    fn test_deterministic() {
        let t = terms(dec!(250000), dec!(7.25), dec!(30));
        assert_eq!(compute_installment(&t).unwrap(), compute_installment(&t).unwrap());
        assert_eq!(compute_installment(&t).unwrap(), dec!(1705.44));
    }
}
