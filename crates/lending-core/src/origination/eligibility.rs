//! Rule-based eligibility pre-check shown to prospective borrowers.
//!
//! Thresholds only; no scoring model. Each failed rule contributes one
//! human-readable reason, in the order age, income, credit score.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::error::LendingError;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::LendingResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Employment {
    #[default]
    Salaried,
    SelfEmployed,
    Business,
    Other,
}

/// Applicant facts entered in the pre-check form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantProfile {
    pub age: u32,
    pub monthly_income: Money,
    pub credit_score: u32,
    #[serde(default)]
    pub employment: Employment,
}

/// Thresholds for the pre-check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityCriteria {
    pub min_age: u32,
    pub max_age: u32,
    pub min_monthly_income: Money,
    pub min_credit_score: u32,
}

impl Default for EligibilityCriteria {
    fn default() -> Self {
        Self {
            min_age: 21,
            max_age: 65,
            min_monthly_income: dec!(2500),
            min_credit_score: 650,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityInput {
    pub applicant: ApplicantProfile,
    #[serde(default)]
    pub criteria: EligibilityCriteria,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityOutput {
    pub is_eligible: bool,
    pub reasons: Vec<String>,
}

pub fn check_eligibility(
    input: &EligibilityInput,
) -> LendingResult<ComputationOutput<EligibilityOutput>> {
    let start = Instant::now();
    validate(input)?;

    let applicant = &input.applicant;
    let criteria = &input.criteria;
    let mut reasons = Vec::new();

    if applicant.age < criteria.min_age || applicant.age > criteria.max_age {
        reasons.push(format!(
            "Age must be between {} and {}.",
            criteria.min_age, criteria.max_age
        ));
    }
    if applicant.monthly_income < criteria.min_monthly_income {
        reasons.push(format!(
            "Minimum monthly income should be {}.",
            criteria.min_monthly_income
        ));
    }
    if applicant.credit_score < criteria.min_credit_score {
        reasons.push(format!(
            "Minimum credit score required is {}.",
            criteria.min_credit_score
        ));
    }

    let output = EligibilityOutput {
        is_eligible: reasons.is_empty(),
        reasons,
    };
    debug!(eligible = output.is_eligible, "eligibility pre-check");

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Threshold eligibility pre-check",
        input,
        Vec::new(),
        elapsed,
        output,
    ))
}

fn validate(input: &EligibilityInput) -> LendingResult<()> {
    if input.criteria.min_age > input.criteria.max_age {
        return Err(LendingError::invalid(
            "criteria.min_age",
            "Minimum age cannot exceed maximum age",
        ));
    }
    if input.criteria.min_monthly_income < Decimal::ZERO {
        return Err(LendingError::invalid(
            "criteria.min_monthly_income",
            "Income threshold cannot be negative",
        ));
    }
    if input.applicant.monthly_income < Decimal::ZERO {
        return Err(LendingError::invalid(
            "applicant.monthly_income",
            "Monthly income cannot be negative",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn input(age: u32, income: Decimal, score: u32) -> EligibilityInput {
        EligibilityInput {
            applicant: ApplicantProfile {
                age,
                monthly_income: income,
                credit_score: score,
                employment: Employment::Salaried,
            },
            criteria: EligibilityCriteria::default(),
        }
    }

    #[test]
    fn test_eligible_applicant() {
        let out = check_eligibility(&input(35, dec!(4000), 720)).unwrap();
        assert!(out.result.is_eligible);
        assert!(out.result.reasons.is_empty());
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        assert!(check_eligibility(&input(21, dec!(2500), 650)).unwrap().result.is_eligible);
        assert!(check_eligibility(&input(65, dec!(2500), 650)).unwrap().result.is_eligible);
        assert!(!check_eligibility(&input(20, dec!(2500), 650)).unwrap().result.is_eligible);
        assert!(!check_eligibility(&input(66, dec!(2500), 650)).unwrap().result.is_eligible);
    }

    #[test]
    fn test_all_reasons_in_order() {
        let out = check_eligibility(&input(19, dec!(1200), 600)).unwrap();
        assert!(!out.result.is_eligible);
        assert_eq!(
            out.result.reasons,
            vec![
                "Age must be between 21 and 65.".to_string(),
                "Minimum monthly income should be 2500.".to_string(),
                "Minimum credit score required is 650.".to_string(),
            ]
        );
    }

    #[test]
    fn test_custom_criteria() {
        let mut inp = input(70, dec!(2000), 640);
        inp.criteria = EligibilityCriteria {
            min_age: 18,
            max_age: 75,
            min_monthly_income: dec!(1500),
            min_credit_score: 600,
        };
        assert!(check_eligibility(&inp).unwrap().result.is_eligible);
    }

    #[test]
    fn test_inconsistent_criteria_rejected() {
        let mut inp = input(30, dec!(3000), 700);
        inp.criteria.min_age = 70;
        assert!(check_eligibility(&inp).is_err());
    }

    #[test]
    fn test_criteria_default_from_json() {
        let inp: EligibilityInput = serde_json::from_str(
            r#"{"applicant":{"age":30,"monthly_income":"3000","credit_score":700}}"#,
        )
        .unwrap();
        assert_eq!(inp.criteria, EligibilityCriteria::default());
        assert_eq!(inp.applicant.employment, Employment::Salaried);
    }
}
