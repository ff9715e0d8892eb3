pub mod bmi;
pub mod loan;
pub mod mortgage;
pub mod schedule;

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, info};

use calc_hub_core::store::{self, JsonFileStore};
use calc_hub_core::validation::{self, FieldRule};
use calc_hub_core::CalculatorKind;

use crate::config::CliConfig;
use crate::input;

/// clap value parser accepting form-style numbers such as `$300,000`.
pub fn parse_amount(text: &str) -> Result<Decimal, String> {
    validation::parse_number(text).map_err(|e| e.to_string())
}

/// Collect flag values into a parameter record, leaving unset flags as null.
pub fn flag_record(fields: Vec<(&str, Option<Value>)>) -> Value {
    let map: Map<String, Value> = fields
        .into_iter()
        .map(|(name, value)| (name.to_string(), value.unwrap_or(Value::Null)))
        .collect();
    Value::Object(map)
}

/// The record the user supplied: file first, then piped stdin, then flags.
pub fn entered_record(path: Option<&str>, flags: Value) -> Result<Value, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        input::file::read_value(path)
    } else if let Some(data) = input::stdin::read_stdin()? {
        Ok(data)
    } else {
        Ok(flags)
    }
}

/// Fields that decide how the rest of a record is read, with their defaults.
///
/// A selector the user leaves out takes its default rather than a saved value,
/// so a saved `imperial` never reinterprets metric measurements.
pub type Selectors<'a> = &'a [(&'a str, Value)];

fn apply_selectors(entered: Value, selectors: Selectors<'_>) -> Value {
    match entered {
        Value::Object(mut map) => {
            for (name, default) in selectors {
                let unset = map.get(*name).map_or(true, Value::is_null);
                if unset {
                    map.insert(name.to_string(), default.clone());
                }
            }
            Value::Object(map)
        }
        other => other,
    }
}

/// Fill in saved parameters, check required fields and deserialize.
///
/// Returns the typed input alongside the merged record so it can be saved
/// once the calculation succeeds.
pub fn prepare<T: DeserializeOwned>(
    kind: CalculatorKind,
    entered: Value,
    rules: &[&FieldRule],
    selectors: Selectors<'_>,
    config: &CliConfig,
) -> Result<(T, Value), Box<dyn std::error::Error>> {
    let entered = apply_selectors(entered, selectors);
    let merged = if config.use_saved {
        let saved = JsonFileStore::new(&config.store_dir);
        debug!(key = %kind.storage_key(), dir = %saved.dir().display(), "pre-filling from saved parameters");
        store::prefill(&saved, kind, entered)?
    } else {
        entered
    };
    // Unset fields must be absent, not null, for serde defaults to apply.
    let record = drop_nulls(merged);

    validation::validate_present(&record, rules)?;
    let typed: T = serde_json::from_value(record.clone())?;
    Ok((typed, record))
}

/// Save the record when `--save` was given.
pub fn persist(kind: CalculatorKind, record: &Value, config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    if !config.save {
        return Ok(());
    }
    let mut saved = JsonFileStore::new(&config.store_dir);
    store::remember(&mut saved, kind, record)?;
    info!(key = %kind.storage_key(), dir = %saved.dir().display(), "saved parameters");
    Ok(())
}

fn drop_nulls(record: Value) -> Value {
    match record {
        Value::Object(map) => Value::Object(map.into_iter().filter(|(_, v)| !v.is_null()).collect()),
        other => other,
    }
}

/// JSON value for an optional decimal flag.
pub fn decimal_value(value: Option<Decimal>) -> Option<Value> {
    value.map(|d| Value::String(d.to_string()))
}
