use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use calc_hub_core::mortgage::payment::{self, MortgageInput};
use calc_hub_core::validation;
use calc_hub_core::CalculatorKind;

use super::{decimal_value, entered_record, flag_record, parse_amount, persist, prepare};
use crate::config::CliConfig;

/// Arguments for a fixed-rate mortgage
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct MortgageArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Home price / loan amount before the down payment
    #[arg(long, alias = "price", value_parser = parse_amount)]
    pub loan_amount: Option<Decimal>,

    /// Down payment
    #[arg(long, alias = "down", value_parser = parse_amount)]
    pub down_payment: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long, alias = "rate", value_parser = parse_amount)]
    pub interest_rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long, alias = "years")]
    pub loan_term_years: Option<u32>,

    /// Annual property tax
    #[arg(long, value_parser = parse_amount)]
    pub property_tax: Option<Decimal>,

    /// Annual home insurance
    #[arg(long, value_parser = parse_amount)]
    pub home_insurance: Option<Decimal>,

    /// Charge PMI when the down payment is below 20% (the default)
    #[arg(long, overrides_with = "no_pmi")]
    pub pmi: bool,

    /// Leave PMI out even when the down payment is below 20%
    #[arg(long, overrides_with = "pmi")]
    pub no_pmi: bool,
}

impl MortgageArgs {
    /// Explicit PMI choice, if either flag was given.
    fn include_pmi(&self) -> Option<bool> {
        match (self.pmi, self.no_pmi) {
            (_, true) => Some(false),
            (true, false) => Some(true),
            (false, false) => None,
        }
    }
}

pub fn run_mortgage(args: MortgageArgs, config: &CliConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let include_pmi = args.include_pmi();
    let flags = flag_record(vec![
        ("loan_amount", decimal_value(args.loan_amount)),
        ("down_payment", decimal_value(args.down_payment)),
        ("interest_rate", decimal_value(args.interest_rate)),
        ("loan_term_years", args.loan_term_years.map(|y| json!(y))),
        ("property_tax", decimal_value(args.property_tax)),
        ("home_insurance", decimal_value(args.home_insurance)),
        ("include_pmi", include_pmi.map(Value::Bool)),
    ]);
    let entered = entered_record(args.input.as_deref(), flags)?;

    let (mortgage_input, record): (MortgageInput, Value) = prepare(
        CalculatorKind::Mortgage,
        entered,
        &validation::mortgage_rules(),
        &[("include_pmi", json!(true))],
        config,
    )?;
    let result = payment::calculate_mortgage(&mortgage_input)?;
    persist(CalculatorKind::Mortgage, &record, config)?;
    Ok(serde_json::to_value(result)?)
}
