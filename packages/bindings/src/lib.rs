use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_emi(input_json: String) -> NapiResult<String> {
    let input: lending_core::amortization::EmiInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = lending_core::amortization::calculate_emi(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn build_schedule(input_json: String) -> NapiResult<String> {
    let input: lending_core::amortization::ScheduleInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = lending_core::amortization::build_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(serde::Deserialize)]
struct SchedulePageInput {
    #[serde(flatten)]
    terms: lending_core::amortization::LoanTerms,
    page: u32,
    page_size: u32,
}

/// One page of the schedule, for tables that render a year at a time.
#[napi]
pub fn schedule_page(input_json: String) -> NapiResult<String> {
    let input: SchedulePageInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let plan = lending_core::amortization::AmortizationPlan::new(&input.terms)
        .map_err(to_napi_error)?;
    let page = plan
        .page(input.page, input.page_size)
        .map_err(to_napi_error)?;
    serde_json::to_string(&page).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Origination
// ---------------------------------------------------------------------------

#[napi]
pub fn quote_application(input_json: String) -> NapiResult<String> {
    let input: lending_core::origination::intake::LoanApplication =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        lending_core::origination::intake::quote_application(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn check_eligibility(input_json: String) -> NapiResult<String> {
    let input: lending_core::origination::eligibility::EligibilityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = lending_core::origination::eligibility::check_eligibility(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn standard_catalogue() -> NapiResult<String> {
    let catalogue = lending_core::origination::products::standard_catalogue();
    serde_json::to_string(&catalogue).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Servicing
// ---------------------------------------------------------------------------

#[napi]
pub fn repayment_position(input_json: String) -> NapiResult<String> {
    let input: lending_core::servicing::repayments::LoanAccount =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = lending_core::servicing::repayments::repayment_position(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn apply_repayment(input_json: String) -> NapiResult<String> {
    let input: lending_core::servicing::repayments::ApplyRepaymentInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = lending_core::servicing::repayments::apply_repayment(&input.account, &input.request)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn collections_summary(input_json: String) -> NapiResult<String> {
    let input: lending_core::servicing::ledger::CollectionsInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        lending_core::servicing::ledger::collections_summary(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn portfolio_report(input_json: String) -> NapiResult<String> {
    let input: lending_core::servicing::portfolio::PortfolioInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        lending_core::servicing::portfolio::portfolio_report(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn borrower_overview(input_json: String) -> NapiResult<String> {
    let input: lending_core::servicing::portfolio::PortfolioInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        lending_core::servicing::portfolio::borrower_overview(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
