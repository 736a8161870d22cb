use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.00875 = 0.875% per period).
pub type Rate = Decimal;

/// Percentages as quoted to borrowers (10.5 = 10.5% per year).
pub type Percent = Decimal;

/// Year fractions or counts
pub type Years = Decimal;

/// Currency code
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    GBP,
    #[default]
    USD,
    EUR,
    CHF,
    JPY,
    CAD,
    AUD,
    INR,
    SGD,
    Other(String),
}

impl Currency {
    /// Decimal places of the currency's minor unit. Every monetary value the
    /// engine emits is rounded to this many places.
    pub fn minor_unit_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// One minor unit (0.01 for cents, 1 for yen).
    pub fn minor_unit(&self) -> Money {
        Decimal::new(1, self.minor_unit_places())
    }
}

/// Loan product families offered at intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LoanType {
    Personal,
    Business,
    Home,
    Education,
}

impl fmt::Display for LoanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LoanType::Personal => "Personal",
            LoanType::Business => "Business",
            LoanType::Home => "Home",
            LoanType::Education => "Education",
        };
        write!(f, "{s}")
    }
}

/// Application / loan lifecycle status.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum LoanStatus {
    #[default]
    Pending,
    Reviewing,
    Approved,
    Rejected,
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LoanStatus::Pending => "Pending",
            LoanStatus::Reviewing => "Reviewing",
            LoanStatus::Approved => "Approved",
            LoanStatus::Rejected => "Rejected",
        };
        write!(f, "{s}")
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_minor_units() {
        assert_eq!(Currency::USD.minor_unit(), dec!(0.01));
        assert_eq!(Currency::JPY.minor_unit(), dec!(1));
        assert_eq!(Currency::Other("KES".into()).minor_unit_places(), 2);
    }

    #[test]
    fn test_status_serializes_as_name() {
        let json = serde_json::to_string(&LoanStatus::Approved).unwrap();
        assert_eq!(json, "\"Approved\"");
        let parsed: LoanType = serde_json::from_str("\"Education\"").unwrap();
        assert_eq!(parsed, LoanType::Education);
    }
}
