//! Personal/auto/student loan payment calculator.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::validation::{self, INTEREST_RATE, LOAN_AMOUNT, LOAN_TERM_MONTHS};
use crate::CalcHubResult;

/// Rate above which a warning is attached to the output.
const HIGH_RATE_WARNING_PERCENT: Decimal = dec!(20);

// ---------------------------------------------------------------------------
// Input / output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanType {
    #[default]
    Personal,
    Auto,
    Student,
    Business,
    Other,
}

impl LoanType {
    fn label(&self) -> &'static str {
        match self {
            LoanType::Personal => "Personal",
            LoanType::Auto => "Auto",
            LoanType::Student => "Student",
            LoanType::Business => "Business",
            LoanType::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanInput {
    pub loan_amount: Money,
    /// Annual rate in percent (6 = 6%).
    pub interest_rate: Rate,
    pub loan_term_months: u32,
    #[serde(default)]
    pub loan_type: LoanType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanOutput {
    pub principal: Money,
    pub monthly_payment: Money,
    pub total_payment: Money,
    pub total_interest: Money,
    pub num_payments: u32,
    pub monthly_rate: Rate,
    /// Share of total payments that repays principal (0..1).
    pub principal_share: Rate,
    /// Share of total payments that is interest (0..1).
    pub interest_share: Rate,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn calculate_loan(input: &LoanInput) -> CalcHubResult<ComputationOutput<LoanOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validation::validate_all(&[
        (Some(input.loan_amount), &LOAN_AMOUNT),
        (Some(input.interest_rate), &INTEREST_RATE),
        (Some(Decimal::from(input.loan_term_months)), &LOAN_TERM_MONTHS),
    ])?;

    if input.interest_rate > HIGH_RATE_WARNING_PERCENT {
        warnings.push(format!(
            "Interest rate of {}% is unusually high",
            input.interest_rate
        ));
    }

    let principal = input.loan_amount;
    let num_payments = input.loan_term_months;
    let monthly_payment =
        amortization::compute_monthly_payment(principal, input.interest_rate, num_payments)?;
    let totals = amortization::compute_totals(principal, monthly_payment, num_payments, None)?;
    let total_payment = totals.total_principal + totals.total_interest;

    // total_payment >= principal > 0 for any non-negative rate
    let principal_share = principal / total_payment;
    let interest_share = totals.total_interest / total_payment;

    let output = LoanOutput {
        principal,
        monthly_payment,
        total_payment,
        total_interest: totals.total_interest,
        num_payments,
        monthly_rate: amortization::monthly_rate(input.interest_rate),
        principal_share,
        interest_share,
    };

    let methodology = format!("{} loan — level-payment annuity", input.loan_type.label());
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(&methodology, input, warnings, elapsed, output))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loan(amount: Decimal, rate: Decimal, months: u32) -> LoanInput {
        LoanInput {
            loan_amount: amount,
            interest_rate: rate,
            loan_term_months: months,
            loan_type: LoanType::Personal,
        }
    }

    #[test]
    fn test_known_answer_one_year_loan() {
        let out = calculate_loan(&loan(dec!(10000), dec!(6), 12)).unwrap();
        let r = &out.result;
        assert!((r.monthly_payment - dec!(860.66)).abs() < dec!(0.01));
        // 860.6643 * 12 - 10,000
        assert!((r.total_interest - dec!(327.97)).abs() < dec!(0.01));
        assert_eq!(r.monthly_rate, dec!(0.005));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_zero_rate_loan() {
        let r = calculate_loan(&loan(dec!(6000), dec!(0), 24)).unwrap().result;
        assert_eq!(r.monthly_payment, dec!(250));
        assert_eq!(r.total_interest, dec!(0));
        assert_eq!(r.principal_share, dec!(1));
    }

    #[test]
    fn test_shares_sum_to_one() {
        let r = calculate_loan(&loan(dec!(25000), dec!(9.5), 60)).unwrap().result;
        assert!((r.principal_share + r.interest_share - dec!(1)).abs() < dec!(0.0000001));
    }

    #[test]
    fn test_rate_outside_declared_range_rejected() {
        assert!(calculate_loan(&loan(dec!(10000), dec!(45), 12)).is_err());
        assert!(calculate_loan(&loan(dec!(0), dec!(5), 12)).is_err());
        assert!(calculate_loan(&loan(dec!(10000), dec!(5), 0)).is_err());
    }

    #[test]
    fn test_high_rate_warning() {
        let out = calculate_loan(&loan(dec!(5000), dec!(24.99), 36)).unwrap();
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_loan_type_deserializes_lowercase() {
        let input: LoanInput = serde_json::from_str(
            r#"{"loan_amount": "15000", "interest_rate": "4.9", "loan_term_months": 48, "loan_type": "auto"}"#,
        )
        .unwrap();
        assert_eq!(input.loan_type, LoanType::Auto);
        let out = calculate_loan(&input).unwrap();
        assert!(out.methodology.starts_with("Auto loan"));
    }
}
