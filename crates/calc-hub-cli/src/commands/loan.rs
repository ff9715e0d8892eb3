use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use calc_hub_core::loan::payment::{self, LoanInput, LoanType};
use calc_hub_core::validation;
use calc_hub_core::CalculatorKind;

use super::{decimal_value, entered_record, flag_record, parse_amount, persist, prepare};
use crate::config::CliConfig;

/// Arguments for a fixed-rate loan
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct LoanArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed, e.g. 10000 or '$10,000'
    #[arg(long, value_parser = parse_amount)]
    pub loan_amount: Option<Decimal>,

    /// Annual interest rate in percent, e.g. 6.5
    #[arg(long, alias = "rate", value_parser = parse_amount)]
    pub interest_rate: Option<Decimal>,

    /// Number of monthly payments
    #[arg(long, alias = "months")]
    pub loan_term_months: Option<u32>,

    /// Loan type label
    #[arg(long, value_enum)]
    pub loan_type: Option<LoanTypeArg>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum LoanTypeArg {
    Personal,
    Auto,
    Student,
    Business,
    Other,
}

impl From<LoanTypeArg> for LoanType {
    fn from(arg: LoanTypeArg) -> Self {
        match arg {
            LoanTypeArg::Personal => LoanType::Personal,
            LoanTypeArg::Auto => LoanType::Auto,
            LoanTypeArg::Student => LoanType::Student,
            LoanTypeArg::Business => LoanType::Business,
            LoanTypeArg::Other => LoanType::Other,
        }
    }
}

pub fn run_loan(args: LoanArgs, config: &CliConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let flags = flag_record(vec![
        ("loan_amount", decimal_value(args.loan_amount)),
        ("interest_rate", decimal_value(args.interest_rate)),
        ("loan_term_months", args.loan_term_months.map(|m| json!(m))),
        (
            "loan_type",
            args.loan_type
                .map(|t| serde_json::to_value(LoanType::from(t)))
                .transpose()?,
        ),
    ]);
    let entered = entered_record(args.input.as_deref(), flags)?;

    let (loan_input, record): (LoanInput, Value) =
        prepare(CalculatorKind::Loan, entered, &validation::loan_rules(), &[], config)?;
    let result = payment::calculate_loan(&loan_input)?;
    persist(CalculatorKind::Loan, &record, config)?;
    Ok(serde_json::to_value(result)?)
}
