//! Amortization schedule report for display in tables and charts.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{self, Installment, SCHEDULE_ROW_CAP};
use crate::error::CalcHubError;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::validation::{self, INTEREST_RATE, PRINCIPAL, TERM_MONTHS};
use crate::CalcHubResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleInput {
    pub principal: Money,
    /// Annual rate in percent (6.5 = 6.5%).
    pub interest_rate: Rate,
    pub term_months: u32,
    /// Show only the first `max_rows` payments (the mortgage page shows 12).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rows: Option<u32>,
    /// Date of the first payment; later rows fall on the same day of
    /// following months.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_payment_date: Option<NaiveDate>,
}

/// A schedule row with its optional calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledPayment {
    pub payment_number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<NaiveDate>,
    pub payment: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub remaining_balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOutput {
    pub monthly_payment: Money,
    pub installments: Vec<ScheduledPayment>,
    /// Number of payments over the full term.
    pub total_installments: u32,
    /// True when fewer rows are shown than the full term.
    pub truncated: bool,
}

pub fn amortization_schedule(
    input: &ScheduleInput,
) -> CalcHubResult<ComputationOutput<ScheduleOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validation::validate_all(&[
        (Some(input.principal), &PRINCIPAL),
        (Some(input.interest_rate), &INTEREST_RATE),
        (Some(Decimal::from(input.term_months)), &TERM_MONTHS),
    ])?;
    if input.max_rows == Some(0) {
        return Err(CalcHubError::invalid("max_rows", "Row limit must be at least 1"));
    }

    let payment =
        amortization::compute_monthly_payment(input.principal, input.interest_rate, input.term_months)?;
    let rate = amortization::monthly_rate(input.interest_rate);
    let rows = amortization::build_schedule(input.principal, rate, input.term_months, payment)?;

    if input.term_months > SCHEDULE_ROW_CAP {
        warnings.push(format!(
            "Schedule shows the first {SCHEDULE_ROW_CAP} of {} payments",
            input.term_months
        ));
    }

    let limit = input.max_rows.unwrap_or(SCHEDULE_ROW_CAP) as usize;
    let installments = rows
        .iter()
        .take(limit)
        .map(|row| dated_row(row, payment, input.first_payment_date))
        .collect::<CalcHubResult<Vec<_>>>()?;
    let truncated = (installments.len() as u32) < input.term_months;

    let output = ScheduleOutput {
        monthly_payment: payment,
        installments,
        total_installments: input.term_months,
        truncated,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-payment amortization schedule",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn dated_row(
    row: &Installment,
    payment: Money,
    first_payment_date: Option<NaiveDate>,
) -> CalcHubResult<ScheduledPayment> {
    let payment_date = match first_payment_date {
        Some(first) => Some(
            first
                .checked_add_months(Months::new(row.payment_number - 1))
                .ok_or_else(|| {
                    CalcHubError::invalid("first_payment_date", "Payment date out of range")
                })?,
        ),
        None => None,
    };

    Ok(ScheduledPayment {
        payment_number: row.payment_number,
        payment_date,
        payment,
        principal_portion: row.principal_portion,
        interest_portion: row.interest_portion,
        remaining_balance: row.remaining_balance,
    })
}
