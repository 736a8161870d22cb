//! Amortization engine: EMI calculator and schedule generator.

pub mod emi;
pub mod schedule;

pub use emi::{
    calculate_emi, compute_installment, monthly_rate, round_money, tenure_months,
    total_interest, total_repayment, EmiInput, EmiOutput, LoanTerms,
};
pub use schedule::{
    build_schedule, generate_schedule, AmortizationPlan, AmortizationRow, FinalPeriod,
    ScheduleInput, ScheduleOutput, SchedulePage, ScheduleRows,
};
