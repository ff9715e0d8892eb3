use calc_hub_core::bmi::index::{self as bmi, BmiInput, UnitSystem};
use calc_hub_core::format::{format_currency, format_currency_detailed};
use calc_hub_core::loan::payment::{self as loan, LoanInput, LoanType};
use calc_hub_core::mortgage::payment::{self as mortgage, MortgageInput};
use calc_hub_core::schedule::{self, ScheduleInput};
use calc_hub_core::store::{self, MemoryStore};
use calc_hub_core::validation::parse_number;
use calc_hub_core::{CalcHubError, CalculatorKind};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

// ===========================================================================
// Mortgage
// ===========================================================================

fn default_page_mortgage() -> MortgageInput {
    // Values the mortgage page pre-renders.
    MortgageInput {
        loan_amount: dec!(300000),
        down_payment: dec!(60000),
        interest_rate: dec!(6.5),
        loan_term_years: 30,
        property_tax: dec!(3600),
        home_insurance: dec!(1200),
        include_pmi: true,
    }
}

#[test]
fn test_mortgage_pmi_scenario_formats_for_display() {
    let input = MortgageInput {
        loan_amount: dec!(300000),
        down_payment: dec!(30000),
        interest_rate: dec!(6),
        loan_term_years: 30,
        property_tax: Decimal::ZERO,
        home_insurance: Decimal::ZERO,
        include_pmi: true,
    };
    let out = mortgage::calculate_mortgage(&input).unwrap().result;
    assert_eq!(format_currency_detailed(out.monthly_pmi), "$112.50");
    assert_eq!(
        format_currency_detailed(out.monthly_principal_and_interest),
        "$1,618.79"
    );
    assert_eq!(format_currency(out.principal), "$270,000");
}

#[test]
fn test_mortgage_page_defaults() {
    let out = mortgage::calculate_mortgage(&default_page_mortgage()).unwrap();
    let r = &out.result;
    // Exactly 20% down: no PMI
    assert!(!r.pmi_applied);
    assert_eq!(r.principal, dec!(240000));
    assert_eq!(r.monthly_tax + r.monthly_insurance, dec!(400));
    assert!(
        (r.monthly_principal_and_interest - dec!(1516.96)).abs() < dec!(0.01),
        "Expected P&I ~1516.96, got {}",
        r.monthly_principal_and_interest
    );
    assert!(out.warnings.is_empty());
    assert!(out.methodology.contains("mortgage"));
}

#[test]
fn test_mortgage_rate_above_range_reports_field() {
    let mut input = default_page_mortgage();
    input.interest_rate = dec!(35);
    match mortgage::calculate_mortgage(&input).unwrap_err() {
        CalcHubError::InvalidInput { field, reason } => {
            assert_eq!(field, "interest_rate");
            assert_eq!(reason, "Interest rate cannot exceed 30");
        }
        other => panic!("Expected InvalidInput, got {other:?}"),
    }
}

// ===========================================================================
// Loan
// ===========================================================================

#[test]
fn test_loan_from_form_text() {
    let input = LoanInput {
        loan_amount: parse_number("$10,000").unwrap(),
        interest_rate: parse_number("6").unwrap(),
        loan_term_months: 12,
        loan_type: LoanType::Personal,
    };
    let out = loan::calculate_loan(&input).unwrap();
    assert_eq!(format_currency_detailed(out.result.monthly_payment), "$860.66");
    assert_eq!(out.result.num_payments, 12);
}

#[test]
fn test_loan_output_serializes_envelope() {
    let input = LoanInput {
        loan_amount: dec!(5000),
        interest_rate: dec!(0),
        loan_term_months: 10,
        loan_type: LoanType::Student,
    };
    let value = serde_json::to_value(loan::calculate_loan(&input).unwrap()).unwrap();
    let payment: Decimal = value["result"]["monthly_payment"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(payment, dec!(500));
    assert_eq!(value["assumptions"]["loan_type"], json!("student"));
    assert_eq!(value["metadata"]["precision"], json!("rust_decimal_128bit"));
}

// ===========================================================================
// BMI
// ===========================================================================

#[test]
fn test_bmi_page_defaults_imperial() {
    let out = bmi::calculate_bmi(&BmiInput {
        weight: dec!(150),
        height: dec!(68),
        unit: UnitSystem::Imperial,
    })
    .unwrap()
    .result;
    assert_eq!(out.category, "Normal weight");
}

#[test]
fn test_bmi_obese_has_no_upper_bound() {
    let out = bmi::calculate_bmi(&BmiInput {
        weight: dec!(120),
        height: dec!(170),
        unit: UnitSystem::Metric,
    })
    .unwrap();
    let value = serde_json::to_value(&out).unwrap();
    assert_eq!(value["result"]["category"], json!("Obese"));
    assert!(value["result"].get("category_max").is_none());
}

// ===========================================================================
// Schedule
// ===========================================================================

#[test]
fn test_schedule_matches_mortgage_payment() {
    let mortgage_out = mortgage::calculate_mortgage(&default_page_mortgage())
        .unwrap()
        .result;
    let sched = schedule::amortization_schedule(&ScheduleInput {
        principal: mortgage_out.principal,
        interest_rate: dec!(6.5),
        term_months: mortgage_out.num_payments,
        max_rows: Some(12),
        first_payment_date: None,
    })
    .unwrap()
    .result;
    assert_eq!(
        sched.monthly_payment,
        mortgage_out.monthly_principal_and_interest
    );
    assert_eq!(sched.installments.len(), 12);
    assert_eq!(sched.total_installments, 360);
    assert!(sched.truncated);
}

// ===========================================================================
// Saved parameters
// ===========================================================================

#[test]
fn test_saved_parameters_prefill_loan_input() {
    let mut saved = MemoryStore::new();
    store::remember(
        &mut saved,
        CalculatorKind::Loan,
        &json!({"loan_amount": "10000", "interest_rate": "6", "loan_term_months": 12}),
    )
    .unwrap();

    let merged = store::prefill(&saved, CalculatorKind::Loan, json!({"interest_rate": "7"})).unwrap();
    let input: LoanInput = serde_json::from_value(merged).unwrap();
    assert_eq!(input.loan_amount, dec!(10000));
    assert_eq!(input.interest_rate, dec!(7));
    assert_eq!(input.loan_type, LoanType::Personal);
}
