use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.005 = 0.5% per month) unless a field name
/// says `percent`.
pub type Rate = Decimal;

/// Calculator identifiers used as persistence keys and in methodology strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalculatorKind {
    Loan,
    Mortgage,
    Bmi,
}

impl CalculatorKind {
    pub fn id(&self) -> &'static str {
        match self {
            CalculatorKind::Loan => "loan",
            CalculatorKind::Mortgage => "mortgage",
            CalculatorKind::Bmi => "bmi",
        }
    }

    /// Key under which the last-entered parameters are persisted.
    pub fn storage_key(&self) -> String {
        format!("calculator_{}", self.id())
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

    #[test]
    fn test_storage_keys() {
        assert_eq!(CalculatorKind::Loan.storage_key(), "calculator_loan");
        assert_eq!(CalculatorKind::Mortgage.storage_key(), "calculator_mortgage");
        assert_eq!(CalculatorKind::Bmi.storage_key(), "calculator_bmi");
    }

    #[test]
    fn test_with_metadata_envelope() {
        let out = with_metadata("Test", &serde_json::json!({"a": 1}), vec![], 7, 42u32);
        assert_eq!(out.result, 42);
        assert_eq!(out.metadata.computation_time_us, 7);
        assert_eq!(out.assumptions["a"], 1);
    }
}
