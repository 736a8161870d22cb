//! Portfolio reports over a book of loan records.
//!
//! Covers:
//! 1. **Portfolio mix** -- principal by loan type.
//! 2. **Volume stats** -- application count by status.
//! 3. **Projected interest** -- stored total repayment less principal.
//! 4. **Disbursed / pending** -- approved principal, pending applications.
//! 5. **Borrower overview** -- active loans, outstanding, monthly commitment.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use super::repayments::LoanAccount;
use super::{accumulate, checked_total};
use crate::error::LendingError;
use crate::types::{with_metadata, ComputationOutput, LoanStatus, LoanType, Money};
use crate::LendingResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioInput {
    pub loans: Vec<LoanAccount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioReport {
    pub total_loans: u32,
    pub portfolio_mix: BTreeMap<LoanType, Money>,
    pub volume_stats: BTreeMap<LoanStatus, u32>,
    pub total_principal: Money,
    pub total_repayment: Money,
    pub projected_interest: Money,
    /// Principal of approved loans.
    pub total_disbursed: Money,
    pub pending_applications: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowerOverview {
    pub active_loans: u32,
    /// Approved total repayment less successful repayments.
    pub total_outstanding: Money,
    /// Sum of EMIs on approved loans.
    pub monthly_commitment: Money,
    pub total_paid: Money,
}

pub fn portfolio_report(
    input: &PortfolioInput,
) -> LendingResult<ComputationOutput<PortfolioReport>> {
    let start = Instant::now();
    validate_book(&input.loans)?;

    let mut portfolio_mix: BTreeMap<LoanType, Money> = BTreeMap::new();
    let mut volume_stats: BTreeMap<LoanStatus, u32> = BTreeMap::new();
    let mut total_principal = Decimal::ZERO;
    let mut total_repayment = Decimal::ZERO;
    let mut total_disbursed = Decimal::ZERO;

    for loan in &input.loans {
        accumulate(
            portfolio_mix.entry(loan.loan_type).or_insert(Decimal::ZERO),
            loan.principal,
            "portfolio mix",
        )?;
        *volume_stats.entry(loan.status).or_insert(0) += 1;
        accumulate(&mut total_principal, loan.principal, "total principal")?;
        accumulate(&mut total_repayment, loan.total_repayment, "total repayment")?;
        if loan.status == LoanStatus::Approved {
            accumulate(&mut total_disbursed, loan.principal, "total disbursed")?;
        }
    }

    let pending_applications = volume_stats
        .get(&LoanStatus::Pending)
        .copied()
        .unwrap_or(0);

    let projected_interest = total_repayment
        .checked_sub(total_principal)
        .ok_or_else(|| LendingError::overflow("projected interest"))?;

    let output = PortfolioReport {
        total_loans: input.loans.len() as u32,
        portfolio_mix,
        volume_stats,
        total_principal,
        total_repayment,
        projected_interest,
        total_disbursed,
        pending_applications,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Portfolio aggregation over stored loan records",
        &serde_json::json!({ "loans": input.loans.len() }),
        Vec::new(),
        elapsed,
        output,
    ))
}

/// Summary of one borrower's loans for their dashboard.
pub fn borrower_overview(
    input: &PortfolioInput,
) -> LendingResult<ComputationOutput<BorrowerOverview>> {
    let start = Instant::now();
    validate_book(&input.loans)?;

    let approved: Vec<&LoanAccount> = input
        .loans
        .iter()
        .filter(|l| l.status == LoanStatus::Approved)
        .collect();

    let outstanding = approved
        .iter()
        .map(|l| l.outstanding())
        .collect::<LendingResult<Vec<Money>>>()?;
    let paid = approved
        .iter()
        .map(|l| l.total_paid())
        .collect::<LendingResult<Vec<Money>>>()?;

    let output = BorrowerOverview {
        active_loans: approved.len() as u32,
        total_outstanding: checked_total(outstanding, "total outstanding")?,
        monthly_commitment: checked_total(approved.iter().map(|l| l.emi), "monthly commitment")?,
        total_paid: checked_total(paid, "total paid")?,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Borrower overview over approved loans",
        &serde_json::json!({ "loans": input.loans.len() }),
        Vec::new(),
        elapsed,
        output,
    ))
}

fn validate_book(loans: &[LoanAccount]) -> LendingResult<()> {
    for (i, loan) in loans.iter().enumerate() {
        if loan.principal < Decimal::ZERO {
            return Err(LendingError::invalid(
                &format!("loans[{i}].principal"),
                format!("Loan {} has a negative principal", loan.id),
            ));
        }
        if loan.total_repayment < Decimal::ZERO {
            return Err(LendingError::invalid(
                &format!("loans[{i}].total_repayment"),
                format!("Loan {} has a negative total repayment", loan.id),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::servicing::repayments::{Repayment, RepaymentStatus};
    use crate::types::Currency;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn loan(id: &str, loan_type: LoanType, status: LoanStatus, principal: Decimal) -> LoanAccount {
        LoanAccount {
            id: id.into(),
            loan_type,
            status,
            principal,
            annual_rate_percent: dec!(12),
            tenure_years: dec!(1),
            currency: Currency::USD,
            emi: principal / dec!(10),
            total_repayment: principal * dec!(1.1),
            repayments: Vec::new(),
        }
    }

    fn book() -> PortfolioInput {
        PortfolioInput {
            loans: vec![
                loan("1", LoanType::Personal, LoanStatus::Approved, dec!(10000)),
                loan("2", LoanType::Personal, LoanStatus::Pending, dec!(5000)),
                loan("3", LoanType::Home, LoanStatus::Approved, dec!(200000)),
                loan("4", LoanType::Business, LoanStatus::Rejected, dec!(50000)),
                loan("5", LoanType::Education, LoanStatus::Pending, dec!(20000)),
            ],
        }
    }

    #[test]
    fn test_portfolio_report() {
        let r = portfolio_report(&book()).unwrap().result;
        assert_eq!(r.total_loans, 5);
        assert_eq!(r.portfolio_mix[&LoanType::Personal], dec!(15000));
        assert_eq!(r.portfolio_mix[&LoanType::Home], dec!(200000));
        assert_eq!(r.volume_stats[&LoanStatus::Pending], 2);
        assert_eq!(r.volume_stats[&LoanStatus::Approved], 2);
        assert!(!r.volume_stats.contains_key(&LoanStatus::Reviewing));
        assert_eq!(r.total_principal, dec!(285000));
        assert_eq!(r.projected_interest, dec!(28500));
        assert_eq!(r.total_disbursed, dec!(210000));
        assert_eq!(r.pending_applications, 2);
    }

    #[test]
    fn test_empty_book() {
        let r = portfolio_report(&PortfolioInput { loans: Vec::new() })
            .unwrap()
            .result;
        assert_eq!(r.total_loans, 0);
        assert_eq!(r.projected_interest, Decimal::ZERO);
        assert!(r.portfolio_mix.is_empty());
    }

    #[test]
    fn test_borrower_overview() {
        let mut input = book();
        input.loans[0].repayments.push(Repayment {
            amount: dec!(1000),
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            status: RepaymentStatus::Success,
            mode: "Online".into(),
        });
        let o = borrower_overview(&input).unwrap().result;
        assert_eq!(o.active_loans, 2);
        // 11000 - 1000 + 220000
        assert_eq!(o.total_outstanding, dec!(230000));
        assert_eq!(o.monthly_commitment, dec!(21000));
        assert_eq!(o.total_paid, dec!(1000));
    }

    #[test]
    fn test_book_total_overflow() {
        let mut input = book();
        input.loans[0].principal = Decimal::MAX;
        input.loans[1].principal = Decimal::MAX;
        assert!(matches!(
            portfolio_report(&input),
            Err(LendingError::Overflow { .. })
        ));
    }

    #[test]
    fn test_negative_principal_rejected() {
        let mut input = book();
        input.loans[2].principal = dec!(-1);
        match portfolio_report(&input) {
            Err(LendingError::InvalidInput { field, .. }) => assert_eq!(field, "loans[2].principal"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }
}
