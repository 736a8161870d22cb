use lending_core::amortization::{compute_installment, LoanTerms};
use lending_core::origination::eligibility::{
    check_eligibility, ApplicantProfile, EligibilityCriteria, EligibilityInput, Employment,
};
use lending_core::origination::intake::{quote_application, LoanApplication};
use lending_core::origination::products::{find_product, standard_catalogue, ProductStatus};
use lending_core::{Currency, LendingError, LoanType};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

// ===========================================================================
// Intake quotes
// ===========================================================================

fn application(loan_type: LoanType, amount: rust_decimal::Decimal, years: rust_decimal::Decimal) -> LoanApplication {
    let catalogue = standard_catalogue();
    LoanApplication {
        loan_type,
        amount,
        tenure_years: years,
        interest_rate_percent: None,
        purpose: "Home renovation".into(),
        currency: Currency::USD,
        product: find_product(&catalogue, loan_type).cloned(),
    }
}

#[test]
fn test_quote_uses_product_rate() {
    let out = quote_application(&application(LoanType::Personal, dec!(50000), dec!(5))).unwrap();
    let q = &out.result;
    assert_eq!(q.annual_rate_percent, dec!(12));
    assert_eq!(q.tenure_months, 60);
    assert_eq!(q.emi, dec!(1112.22));
    assert_eq!(q.total_repayment, dec!(66733.20));
    assert_eq!(q.total_interest, dec!(16733.20));
    assert!(out.warnings.is_empty());
}

#[test]
fn test_quote_matches_shared_emi() {
    let app = application(LoanType::Home, dec!(200000), dec!(20));
    let quote = quote_application(&app).unwrap().result;
    let direct = compute_installment(&LoanTerms::new(dec!(200000), dec!(8.5), dec!(20))).unwrap();
    assert_eq!(quote.emi, direct);
    assert_eq!(quote.emi, dec!(1735.65));
    assert_eq!(quote.total_repayment, dec!(416556.00));
}

#[test]
fn test_quote_rejects_amount_over_limit() {
    match quote_application(&application(LoanType::Education, dec!(150000), dec!(5))) {
        Err(LendingError::InvalidInput { field, .. }) => assert_eq!(field, "amount"),
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_quote_rejects_inactive_product() {
    let mut app = application(LoanType::Business, dec!(100000), dec!(5));
    if let Some(product) = app.product.as_mut() {
        product.status = ProductStatus::Inactive;
    }
    assert!(matches!(
        quote_application(&app),
        Err(LendingError::ProductUnavailable(_))
    ));
}

#[test]
fn test_quote_from_json_without_product() {
    let json = r#"{
        "loan_type": "Education",
        "amount": "20000",
        "tenure_years": "3",
        "interest_rate_percent": "9",
        "purpose": "Masters programme"
    }"#;
    let app: LoanApplication = serde_json::from_str(json).unwrap();
    let quote = quote_application(&app).unwrap().result;
    assert_eq!(quote.emi, dec!(635.99));
    assert_eq!(quote.total_repayment, dec!(22895.64));
}

// ===========================================================================
// Eligibility
// ===========================================================================

#[test]
fn test_eligibility_reasons_in_order() {
    let input = EligibilityInput {
        applicant: ApplicantProfile {
            age: 19,
            monthly_income: dec!(1800),
            credit_score: 600,
            employment: Employment::SelfEmployed,
        },
        criteria: EligibilityCriteria::default(),
    };
    let out = check_eligibility(&input).unwrap().result;
    assert!(!out.is_eligible);
    assert_eq!(
        out.reasons,
        vec![
            "Age must be between 21 and 65.".to_string(),
            "Minimum monthly income should be 2500.".to_string(),
            "Minimum credit score required is 650.".to_string(),
        ]
    );
}

#[test]
fn test_eligibility_with_custom_criteria_from_json() {
    let json = r#"{
        "applicant": { "age": 30, "monthly_income": "4000", "credit_score": 700 },
        "criteria": { "min_age": 25, "max_age": 60, "min_monthly_income": "5000", "min_credit_score": 680 }
    }"#;
    let input: EligibilityInput = serde_json::from_str(json).unwrap();
    let out = check_eligibility(&input).unwrap().result;
    assert!(!out.is_eligible);
    assert_eq!(out.reasons, vec!["Minimum monthly income should be 5000.".to_string()]);
}
