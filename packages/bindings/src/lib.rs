use napi::Result as NapiResult;
use napi_derive::napi;
use serde::de::DeserializeOwned;
use serde_json::Value;

use calc_hub_core::bmi::index::{self as bmi, BmiInput};
use calc_hub_core::format;
use calc_hub_core::loan::payment::{self as loan, LoanInput};
use calc_hub_core::mortgage::payment::{self as mortgage, MortgageInput};
use calc_hub_core::schedule::{self, ScheduleInput};
use calc_hub_core::validation::{self, FieldRule};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Parse a form record, reporting missing required fields by label.
fn decode<T: DeserializeOwned>(input_json: &str, rules: &[&FieldRule]) -> NapiResult<T> {
    let record: Value = serde_json::from_str(input_json).map_err(to_napi_error)?;
    validation::validate_present(&record, rules).map_err(to_napi_error)?;
    serde_json::from_value(record).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Calculators
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_loan(input_json: String) -> NapiResult<String> {
    let input: LoanInput = decode(&input_json, &validation::loan_rules())?;
    let output = loan::calculate_loan(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_mortgage(input_json: String) -> NapiResult<String> {
    let input: MortgageInput = decode(&input_json, &validation::mortgage_rules())?;
    let output = mortgage::calculate_mortgage(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_bmi(input_json: String) -> NapiResult<String> {
    let input: BmiInput = decode(&input_json, &validation::bmi_rules())?;
    let output = bmi::calculate_bmi(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: ScheduleInput = decode(&input_json, &validation::schedule_rules())?;
    let output = schedule::amortization_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Format user text such as "1618.7864" as "$1,619", or "$1,618.79" when
/// `detailed` is set.
#[napi]
pub fn format_currency(amount: String, detailed: Option<bool>) -> NapiResult<String> {
    let value = validation::parse_number(&amount).map_err(to_napi_error)?;
    Ok(if detailed.unwrap_or(false) {
        format::format_currency_detailed(value)
    } else {
        format::format_currency(value)
    })
}
