//! Loan servicing: repayments, collections ledger and portfolio reports.

pub mod ledger;
pub mod portfolio;
pub mod repayments;

use rust_decimal::Decimal;

use crate::error::LendingError;
use crate::types::Money;
use crate::LendingResult;

/// Sum amounts with overflow surfaced as [`LendingError::Overflow`].
pub(crate) fn checked_total<I>(amounts: I, context: &str) -> LendingResult<Money>
where
    I: IntoIterator<Item = Money>,
{
    amounts.into_iter().try_fold(Decimal::ZERO, |acc, amount| {
        acc.checked_add(amount)
            .ok_or_else(|| LendingError::overflow(context))
    })
}

/// Add `amount` into a running total in place.
pub(crate) fn accumulate(total: &mut Money, amount: Money, context: &str) -> LendingResult<()> {
    *total = total
        .checked_add(amount)
        .ok_or_else(|| LendingError::overflow(context))?;
    Ok(())
}
