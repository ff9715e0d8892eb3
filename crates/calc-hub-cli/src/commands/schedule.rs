use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use calc_hub_core::schedule::{self, ScheduleInput};
use calc_hub_core::validation;

use super::{decimal_value, entered_record, flag_record, parse_amount};

/// Arguments for an amortization schedule
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ScheduleArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount financed
    #[arg(long, value_parser = parse_amount)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long, alias = "rate", value_parser = parse_amount)]
    pub interest_rate: Option<Decimal>,

    /// Number of monthly payments
    #[arg(long, alias = "months")]
    pub term_months: Option<u32>,

    /// Show only the first N payments
    #[arg(long, alias = "rows")]
    pub max_rows: Option<u32>,

    /// Date of the first payment (YYYY-MM-DD)
    #[arg(long, alias = "start")]
    pub first_payment_date: Option<String>,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let flags = flag_record(vec![
        ("principal", decimal_value(args.principal)),
        ("interest_rate", decimal_value(args.interest_rate)),
        ("term_months", args.term_months.map(|m| json!(m))),
        ("max_rows", args.max_rows.map(|r| json!(r))),
        ("first_payment_date", args.first_payment_date.map(Value::String)),
    ]);
    let entered = entered_record(args.input.as_deref(), flags)?;
    validation::validate_present(&entered, &validation::schedule_rules())?;

    let schedule_input: ScheduleInput = serde_json::from_value(entered)
        .map_err(|e| format!("Invalid schedule parameters: {}", e))?;
    let result = schedule::amortization_schedule(&schedule_input)?;
    Ok(serde_json::to_value(result)?)
}
