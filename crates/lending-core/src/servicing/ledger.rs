//! Global repayment ledger and collections summary for administrators.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use super::accumulate;
use super::repayments::{default_mode, LoanAccount, RepaymentStatus};
use crate::error::LendingError;
use crate::types::{with_metadata, ComputationOutput, LoanType, Money};
use crate::LendingResult;

/// One repayment transaction in the global ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub loan_id: String,
    pub loan_type: LoanType,
    pub amount: Money,
    pub date: NaiveDate,
    #[serde(default)]
    pub status: RepaymentStatus,
    #[serde(default = "default_mode")]
    pub mode: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionsInput {
    pub entries: Vec<LedgerEntry>,
    /// Day reported as "collected today".
    pub as_of: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionsSummary {
    pub as_of: NaiveDate,
    /// Successful collections dated `as_of`.
    pub collected_on_date: Money,
    /// All successful collections.
    pub total_collected: Money,
    pub transaction_count: u32,
    pub count_by_status: BTreeMap<RepaymentStatus, u32>,
    /// Successful collections by payment mode.
    pub amount_by_mode: BTreeMap<String, Money>,
    /// Successful collections by loan type.
    pub amount_by_loan_type: BTreeMap<LoanType, Money>,
}

/// Flatten the repayment histories of many loans into ledger entries,
/// newest first.
pub fn ledger_from_accounts(accounts: &[LoanAccount]) -> Vec<LedgerEntry> {
    let mut entries: Vec<LedgerEntry> = accounts
        .iter()
        .flat_map(|account| {
            account.repayments.iter().map(move |r| LedgerEntry {
                loan_id: account.id.clone(),
                loan_type: account.loan_type,
                amount: r.amount,
                date: r.date,
                status: r.status,
                mode: r.mode.clone(),
            })
        })
        .collect();
    entries.sort_by(|a, b| b.date.cmp(&a.date));
    entries
}

pub fn collections_summary(
    input: &CollectionsInput,
) -> LendingResult<ComputationOutput<CollectionsSummary>> {
    let start = Instant::now();

    if let Some(bad) = input.entries.iter().find(|e| e.amount < Decimal::ZERO) {
        return Err(LendingError::invalid(
            "entries",
            format!("Ledger entry for loan {} has a negative amount", bad.loan_id),
        ));
    }

    let mut collected_on_date = Decimal::ZERO;
    let mut total_collected = Decimal::ZERO;
    let mut count_by_status: BTreeMap<RepaymentStatus, u32> = BTreeMap::new();
    let mut amount_by_mode: BTreeMap<String, Money> = BTreeMap::new();
    let mut amount_by_loan_type: BTreeMap<LoanType, Money> = BTreeMap::new();

    for entry in &input.entries {
        *count_by_status.entry(entry.status).or_insert(0) += 1;
        if entry.status != RepaymentStatus::Success {
            continue;
        }
        accumulate(&mut total_collected, entry.amount, "collections total")?;
        if entry.date == input.as_of {
            accumulate(&mut collected_on_date, entry.amount, "collections total")?;
        }
        accumulate(
            amount_by_mode.entry(entry.mode.clone()).or_insert(Decimal::ZERO),
            entry.amount,
            "collections by mode",
        )?;
        accumulate(
            amount_by_loan_type
                .entry(entry.loan_type)
                .or_insert(Decimal::ZERO),
            entry.amount,
            "collections by loan type",
        )?;
    }

    let output = CollectionsSummary {
        as_of: input.as_of,
        collected_on_date,
        total_collected,
        transaction_count: input.entries.len() as u32,
        count_by_status,
        amount_by_mode,
        amount_by_loan_type,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Collections ledger summary (successful transactions only)",
        &serde_json::json!({ "as_of": input.as_of, "entries": input.entries.len() }),
        Vec::new(),
        elapsed,
        output,
    ))
}
