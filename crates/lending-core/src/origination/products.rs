//! Loan product catalogue and product limit checks.

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LendingError;
use crate::types::{LoanType, Money, Percent, Years};
use crate::LendingResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductStatus {
    #[default]
    Active,
    Inactive,
}

/// A loan product as configured by administrators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanProduct {
    pub name: String,
    pub loan_type: LoanType,
    /// Advertised annual rate (APR) in percent.
    pub interest_rate_percent: Percent,
    pub max_tenure_years: Years,
    /// Maximum principal.
    pub limit: Money,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl LoanProduct {
    pub fn is_active(&self) -> bool {
        self.status == ProductStatus::Active
    }
}

/// The default product line-up.
pub fn standard_catalogue() -> Vec<LoanProduct> {
    vec![
        product(
            "Personal Loan",
            LoanType::Personal,
            dec!(12),
            dec!(5),
            dec!(50_000),
            "Quick personal financing for all your needs.",
        ),
        product(
            "Business Loan",
            LoanType::Business,
            dec!(10.5),
            dec!(7),
            dec!(250_000),
            "Grow your business with flexible capital.",
        ),
        product(
            "Home Loan",
            LoanType::Home,
            dec!(8.5),
            dec!(25),
            dec!(1_000_000),
            "Long-tenure financing for buying or building a home.",
        ),
        product(
            "Education Loan",
            LoanType::Education,
            dec!(9),
            dec!(10),
            dec!(100_000),
            "Tuition and living-cost financing for students.",
        ),
    ]
}

fn product(
    name: &str,
    loan_type: LoanType,
    rate: Percent,
    max_tenure_years: Years,
    limit: Money,
    description: &str,
) -> LoanProduct {
    LoanProduct {
        name: name.to_string(),
        loan_type,
        interest_rate_percent: rate,
        max_tenure_years,
        limit,
        status: ProductStatus::Active,
        description: Some(description.to_string()),
    }
}

/// First active product of the given type.
pub fn find_product(catalogue: &[LoanProduct], loan_type: LoanType) -> Option<&LoanProduct> {
    catalogue
        .iter()
        .find(|p| p.loan_type == loan_type && p.is_active())
}

/// Check a requested amount and tenure against a product's limits.
pub fn check_product_limits(
    product: &LoanProduct,
    amount: Money,
    tenure_years: Years,
) -> LendingResult<()> {
    if !product.is_active() {
        return Err(LendingError::ProductUnavailable(format!(
            "{} is not currently offered",
            product.name
        )));
    }
    if amount > product.limit {
        return Err(LendingError::invalid(
            "amount",
            format!(
                "Requested {} exceeds the {} limit of {}",
                amount, product.name, product.limit
            ),
        ));
    }
    if tenure_years > product.max_tenure_years {
        return Err(LendingError::invalid(
            "tenure_years",
            format!(
                "Requested tenure of {} years exceeds the {} maximum of {} years",
                tenure_years, product.name, product.max_tenure_years
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_catalogue_covers_every_loan_type() {
        let catalogue = standard_catalogue();
        for loan_type in [
            LoanType::Personal,
            LoanType::Business,
            LoanType::Home,
            LoanType::Education,
        ] {
            assert!(find_product(&catalogue, loan_type).is_some());
        }
        let home = find_product(&catalogue, LoanType::Home).unwrap();
        assert_eq!(home.interest_rate_percent, dec!(8.5));
        assert_eq!(home.limit, dec!(1_000_000));
    }

    #[test]
    fn test_find_skips_inactive() {
        let mut catalogue = standard_catalogue();
        catalogue[0].status = ProductStatus::Inactive;
        assert!(find_product(&catalogue, LoanType::Personal).is_none());
    }

    #[test]
    fn test_limits() {
        let catalogue = standard_catalogue();
        let personal = find_product(&catalogue, LoanType::Personal).unwrap();
        assert!(check_product_limits(personal, dec!(50_000), dec!(5)).is_ok());
        assert!(matches!(
            check_product_limits(personal, dec!(50_000.01), dec!(5)),
            Err(LendingError::InvalidInput { ref field, .. }) if field == "amount"
        ));
        assert!(matches!(
            check_product_limits(personal, dec!(10_000), dec!(6)),
            Err(LendingError::InvalidInput { ref field, .. }) if field == "tenure_years"
        ));
    }

    #[test]
    fn test_inactive_product_unavailable() {
        let mut p = standard_catalogue().remove(1);
        p.status = ProductStatus::Inactive;
        assert!(matches!(
            check_product_limits(&p, dec!(1000), dec!(1)),
            Err(LendingError::ProductUnavailable(_))
        ));
    }

    #[test]
    fn test_product_status_defaults_to_active() {
        let p: LoanProduct = serde_json::from_str(
            r#"{"name":"Micro","loan_type":"Business","interest_rate_percent":"18",
                "max_tenure_years":"2","limit":"5000"}"#,
        )
        .unwrap();
        assert!(p.is_active());
        assert!(p.description.is_none());
    }
}
