//! Home mortgage payment with escrow (property tax, insurance) and PMI.
//!
//! Principal and interest come from the shared amortization engine; property
//! tax and home insurance are entered as annual amounts and spread evenly over
//! twelve months. Mortgage insurance is charged on the financed principal when
//! the down payment is below 20% of the loan amount.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{self, EscrowComponents};
use crate::error::CalcHubError;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::validation::{
    self, DOWN_PAYMENT, HOME_INSURANCE, INTEREST_RATE, LOAN_AMOUNT, LOAN_TERM_YEARS, PROPERTY_TAX,
};
use crate::CalcHubResult;

// ---------------------------------------------------------------------------
// Input / output types
// ---------------------------------------------------------------------------

fn default_include_pmi() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageInput {
    /// Purchase price / total loan amount before the down payment.
    pub loan_amount: Money,
    #[serde(default)]
    pub down_payment: Money,
    /// Annual rate in percent (6.5 = 6.5%).
    pub interest_rate: Rate,
    pub loan_term_years: u32,
    /// Annual property tax.
    #[serde(default)]
    pub property_tax: Money,
    /// Annual homeowner's insurance.
    #[serde(default)]
    pub home_insurance: Money,
    #[serde(default = "default_include_pmi")]
    pub include_pmi: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageOutput {
    pub principal: Money,
    pub monthly_principal_and_interest: Money,
    pub monthly_tax: Money,
    pub monthly_insurance: Money,
    pub monthly_pmi: Money,
    /// P&I plus escrow.
    pub total_monthly: Money,
    pub total_interest: Money,
    pub total_escrow: Money,
    /// Principal + interest + escrow over the full term.
    pub total_cost: Money,
    pub num_payments: u32,
    pub monthly_rate: Rate,
    /// Down payment as a fraction of the loan amount.
    pub down_payment_ratio: Rate,
    pub pmi_applied: bool,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn calculate_mortgage(
    input: &MortgageInput,
) -> CalcHubResult<ComputationOutput<MortgageOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    validate_mortgage(input)?;

    let principal = input.loan_amount - input.down_payment;
    let num_payments = input.loan_term_years * 12;
    let monthly_pi =
        amortization::compute_monthly_payment(principal, input.interest_rate, num_payments)?;

    let below_threshold = amortization::pmi_required(input.loan_amount, input.down_payment);
    let pmi_applied = input.include_pmi && below_threshold;
    if below_threshold && !input.include_pmi {
        warnings.push(
            "Down payment is below 20% of the loan amount but PMI was excluded; \
             lenders usually require it"
                .into(),
        );
    }

    let escrow = EscrowComponents {
        property_tax: input.property_tax / dec!(12),
        insurance: input.home_insurance / dec!(12),
        mortgage_insurance: if pmi_applied {
            amortization::monthly_mortgage_insurance(principal)
        } else {
            Decimal::ZERO
        },
    };
    let totals = amortization::compute_totals(principal, monthly_pi, num_payments, Some(&escrow))?;

    let total_monthly = monthly_pi
        .checked_add(totals.monthly_escrow)
        .ok_or_else(|| CalcHubError::Overflow {
            context: "total monthly payment".into(),
        })?;

    let output = MortgageOutput {
        principal,
        monthly_principal_and_interest: monthly_pi,
        monthly_tax: escrow.property_tax,
        monthly_insurance: escrow.insurance,
        monthly_pmi: escrow.mortgage_insurance,
        total_monthly,
        total_interest: totals.total_interest,
        total_escrow: totals.total_escrow,
        total_cost: totals.total_cost,
        num_payments,
        monthly_rate: amortization::monthly_rate(input.interest_rate),
        down_payment_ratio: input.down_payment / input.loan_amount,
        pmi_applied,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-rate mortgage — level-payment annuity with escrow and PMI",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn validate_mortgage(input: &MortgageInput) -> CalcHubResult<()> {
    validation::validate_all(&[
        (Some(input.loan_amount), &LOAN_AMOUNT),
        (Some(input.down_payment), &DOWN_PAYMENT),
        (Some(input.interest_rate), &INTEREST_RATE),
        (Some(Decimal::from(input.loan_term_years)), &LOAN_TERM_YEARS),
        (Some(input.property_tax), &PROPERTY_TAX),
        (Some(input.home_insurance), &HOME_INSURANCE),
    ])?;
    if input.down_payment >= input.loan_amount {
        return Err(CalcHubError::InvalidInput {
            field: "down_payment".into(),
            reason: "Down payment must be less than the loan amount".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pmi_scenario() -> MortgageInput {
        MortgageInput {
            loan_amount: dec!(300000),
            down_payment: dec!(30000),
            interest_rate: dec!(6),
            loan_term_years: 30,
            property_tax: Decimal::ZERO,
            home_insurance: Decimal::ZERO,
            include_pmi: true,
        }
    }

    #[test]
    fn test_pmi_scenario_known_answer() {
        let r = calculate_mortgage(&pmi_scenario()).unwrap().result;
        assert_eq!(r.principal, dec!(270000));
        assert_eq!(r.num_payments, 360);
        assert_eq!(r.monthly_pmi, dec!(112.5));
        assert!(r.pmi_applied);
        assert!((r.monthly_principal_and_interest - dec!(1618.79)).abs() < dec!(0.01));
        assert_eq!(r.total_monthly, r.monthly_principal_and_interest + dec!(112.5));
        assert_eq!(r.down_payment_ratio, dec!(0.1));
    }

    #[test]
    fn test_twenty_percent_down_skips_pmi() {
        let mut input = pmi_scenario();
        input.down_payment = dec!(60000);
        let r = calculate_mortgage(&input).unwrap().result;
        assert!(!r.pmi_applied);
        assert_eq!(r.monthly_pmi, Decimal::ZERO);
    }

    #[test]
    fn test_pmi_excluded_by_caller_warns() {
        let mut input = pmi_scenario();
        input.include_pmi = false;
        let out = calculate_mortgage(&input).unwrap();
        assert!(!out.result.pmi_applied);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_escrow_added_to_total_cost() {
        let mut input = pmi_scenario();
        input.down_payment = dec!(60000);
        input.property_tax = dec!(3600);
        input.home_insurance = dec!(1200);
        let r = calculate_mortgage(&input).unwrap().result;
        assert_eq!(r.monthly_tax, dec!(300));
        assert_eq!(r.monthly_insurance, dec!(100));
        assert_eq!(r.total_escrow, dec!(400) * dec!(360));
        assert_eq!(
            r.total_cost,
            r.principal + r.total_interest + r.total_escrow
        );
    }

    #[test]
    fn test_down_payment_covering_loan_rejected() {
        let mut input = pmi_scenario();
        input.down_payment = dec!(300000);
        assert!(calculate_mortgage(&input).is_err());
    }

    #[test]
    fn test_unbounded_escrow_rejected_before_engine() {
        let mut input = pmi_scenario();
        input.property_tax = (Decimal::MAX / dec!(30)).trunc();
        match calculate_mortgage(&input).unwrap_err() {
            CalcHubError::InvalidInput { field, reason } => {
                assert_eq!(field, "property_tax");
                assert_eq!(reason, "Annual property tax cannot exceed 10000000");
            }
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_down_payment_upper_bound() {
        let mut input = pmi_scenario();
        input.down_payment = dec!(200000000);
        let err = calculate_mortgage(&input).unwrap_err();
        assert!(err.to_string().contains("Down payment cannot exceed 100000000"));
    }

    #[test]
    fn test_defaults_from_json() {
        let input: MortgageInput = serde_json::from_str(
            r#"{"loan_amount": "300000", "interest_rate": "6.5", "loan_term_years": 30}"#,
        )
        .unwrap();
        assert!(input.include_pmi);
        assert_eq!(input.down_payment, Decimal::ZERO);
        let r = calculate_mortgage(&input).unwrap().result;
        assert!(r.pmi_applied);
    }
}
