//! Loan origination: product catalogue, intake quote and eligibility pre-check.

pub mod eligibility;
pub mod intake;
pub mod products;
