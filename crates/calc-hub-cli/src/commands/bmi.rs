use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use calc_hub_core::bmi::index::{self, BmiInput, UnitSystem};
use calc_hub_core::validation;
use calc_hub_core::CalculatorKind;

use super::{decimal_value, entered_record, flag_record, parse_amount, persist, prepare};
use crate::config::CliConfig;

/// Arguments for body mass index
#[derive(Args)]
pub struct BmiArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Weight in kilograms (metric) or pounds (imperial)
    #[arg(long, value_parser = parse_amount)]
    pub weight: Option<Decimal>,

    /// Height in centimetres (metric) or inches (imperial)
    #[arg(long, value_parser = parse_amount)]
    pub height: Option<Decimal>,

    /// Measurement units: metric (kg, cm) or imperial (lb, in); defaults to metric
    #[arg(long, value_enum)]
    pub unit: Option<UnitArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, clap::ValueEnum)]
pub enum UnitArg {
    Metric,
    Imperial,
}

impl From<UnitArg> for UnitSystem {
    fn from(arg: UnitArg) -> Self {
        match arg {
            UnitArg::Metric => UnitSystem::Metric,
            UnitArg::Imperial => UnitSystem::Imperial,
        }
    }
}

pub fn run_bmi(args: BmiArgs, config: &CliConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let unit = args
        .unit
        .map(|u| serde_json::to_value(UnitSystem::from(u)))
        .transpose()?;
    let flags = flag_record(vec![
        ("weight", decimal_value(args.weight)),
        ("height", decimal_value(args.height)),
        ("unit", unit),
    ]);
    let entered = entered_record(args.input.as_deref(), flags)?;

    let selectors = [("unit", serde_json::to_value(UnitSystem::default())?)];
    let (bmi_input, record): (BmiInput, Value) = prepare(
        CalculatorKind::Bmi,
        entered,
        &validation::bmi_rules(),
        &selectors,
        config,
    )?;
    let result = index::calculate_bmi(&bmi_input)?;
    persist(CalculatorKind::Bmi, &record, config)?;
    Ok(serde_json::to_value(result)?)
}
