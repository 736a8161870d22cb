pub mod csv_out;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Print a command result (envelope, loan account or product list) in the
/// requested format.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Pretty-printed JSON; decimals stay as strings so amounts keep their scale.
fn print_json(value: &Value) {
    match render_json(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}

fn render_json(value: &Value) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lending_core::amortization::{calculate_emi, LoanTerms};
    use rust_decimal_macros::dec;

    #[test]
    fn test_json_keeps_amount_scale() {
        let out = calculate_emi(&LoanTerms::new(dec!(50000), dec!(10.5), dec!(5))).unwrap();
        let rendered = render_json(&serde_json::to_value(out).unwrap()).unwrap();
        assert!(rendered.contains("\"installment\": \"1074.70\""));
        assert!(rendered.contains("\"total_repayment\": \"64482.00\""));
    }
}
