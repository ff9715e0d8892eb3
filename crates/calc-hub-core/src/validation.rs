//! Form-input parsing and field rules.
//!
//! Converts user-entered text into decimals and checks them against the
//! declared range of each calculator field before any calculation runs.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;
use std::str::FromStr;

use crate::error::CalcHubError;
use crate::CalcHubResult;

/// Validation rule for one numeric form field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRule {
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
}

impl FieldRule {
    pub const fn required(name: &'static str, label: &'static str) -> Self {
        FieldRule {
            name,
            label,
            required: true,
            min: None,
            max: None,
        }
    }

    pub const fn optional(name: &'static str, label: &'static str) -> Self {
        FieldRule {
            name,
            label,
            required: false,
            min: None,
            max: None,
        }
    }

    pub const fn min(mut self, min: Decimal) -> Self {
        self.min = Some(min);
        self
    }

    pub const fn max(mut self, max: Decimal) -> Self {
        self.max = Some(max);
        self
    }
}

/// Parse user-entered text such as `$300,000` or ` 6.5 ` into a decimal.
pub fn parse_number(text: &str) -> CalcHubResult<Decimal> {
    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return Err(CalcHubError::invalid("value", "A number is required"));
    }
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map_err(|_| CalcHubError::invalid("value", format!("'{}' is not a number", text.trim())))
}

/// Check one value against its rule, returning every violated message.
pub fn validate_field(value: Option<Decimal>, rule: &FieldRule) -> Vec<String> {
    let mut errors = Vec::new();

    let value = match value {
        Some(v) => v,
        None => {
            if rule.required {
                errors.push(format!("{} is required", rule.label));
            }
            return errors;
        }
    };

    if let Some(min) = rule.min {
        if value < min {
            errors.push(format!("{} must be at least {}", rule.label, min));
        }
    }
    if let Some(max) = rule.max {
        if value > max {
            errors.push(format!("{} cannot exceed {}", rule.label, max));
        }
    }

    errors
}

/// Validate a set of `(value, rule)` pairs, failing with every message at once.
pub fn validate_all(fields: &[(Option<Decimal>, &FieldRule)]) -> CalcHubResult<()> {
    let mut failed_fields = Vec::new();
    let mut messages = Vec::new();
    for (value, rule) in fields {
        let errors = validate_field(*value, rule);
        if !errors.is_empty() {
            failed_fields.push(rule.name);
            messages.extend(errors);
        }
    }

    if messages.is_empty() {
        Ok(())
    } else {
        Err(CalcHubError::InvalidInput {
            field: failed_fields.join(", "),
            reason: messages.join("; "),
        })
    }
}

/// Check that every required rule has a non-null field in a JSON record.
///
/// Used before deserializing form or file input so a missing field reports
/// "<label> is required" rather than a serde message.
pub fn validate_present(record: &Value, rules: &[&FieldRule]) -> CalcHubResult<()> {
    let mut failed_fields = Vec::new();
    let mut messages = Vec::new();
    for rule in rules.iter().filter(|r| r.required) {
        let present = record.get(rule.name).map_or(false, |v| !v.is_null());
        if !present {
            failed_fields.push(rule.name);
            messages.push(format!("{} is required", rule.label));
        }
    }

    if messages.is_empty() {
        Ok(())
    } else {
        Err(CalcHubError::InvalidInput {
            field: failed_fields.join(", "),
            reason: messages.join("; "),
        })
    }
}

// ---------------------------------------------------------------------------
// Declared field ranges
// ---------------------------------------------------------------------------

pub const INTEREST_RATE: FieldRule = FieldRule::required("interest_rate", "Interest rate")
    .min(dec!(0))
    .max(dec!(30));

pub const LOAN_AMOUNT: FieldRule = FieldRule::required("loan_amount", "Loan amount")
    .min(dec!(1))
    .max(dec!(100000000));

pub const LOAN_TERM_MONTHS: FieldRule = FieldRule::required("loan_term_months", "Loan term")
    .min(dec!(1))
    .max(dec!(600));

pub const DOWN_PAYMENT: FieldRule = FieldRule::optional("down_payment", "Down payment")
    .min(dec!(0))
    .max(dec!(100000000));

pub const LOAN_TERM_YEARS: FieldRule = FieldRule::required("loan_term_years", "Loan term")
    .min(dec!(1))
    .max(dec!(50));

pub const PROPERTY_TAX: FieldRule =
    FieldRule::optional("property_tax", "Annual property tax")
        .min(dec!(0))
        .max(dec!(10000000));

pub const HOME_INSURANCE: FieldRule =
    FieldRule::optional("home_insurance", "Annual home insurance")
        .min(dec!(0))
        .max(dec!(1000000));

pub const PRINCIPAL: FieldRule = FieldRule::required("principal", "Principal")
    .min(dec!(1))
    .max(dec!(100000000));

pub const TERM_MONTHS: FieldRule = FieldRule::required("term_months", "Loan term")
    .min(dec!(1))
    .max(dec!(600));

pub const WEIGHT: FieldRule = FieldRule::required("weight", "Weight")
    .min(dec!(0.1))
    .max(dec!(1500));

pub const HEIGHT: FieldRule = FieldRule::required("height", "Height")
    .min(dec!(0.1))
    .max(dec!(300));

pub fn loan_rules() -> [&'static FieldRule; 3] {
    [&LOAN_AMOUNT, &INTEREST_RATE, &LOAN_TERM_MONTHS]
}

pub fn mortgage_rules() -> [&'static FieldRule; 6] {
    [
        &LOAN_AMOUNT,
        &DOWN_PAYMENT,
        &INTEREST_RATE,
        &LOAN_TERM_YEARS,
        &PROPERTY_TAX,
        &HOME_INSURANCE,
    ]
}

pub fn schedule_rules() -> [&'static FieldRule; 3] {
    [&PRINCIPAL, &INTEREST_RATE, &TERM_MONTHS]
}

pub fn bmi_rules() -> [&'static FieldRule; 2] {
    [&WEIGHT, &HEIGHT]
}
