//! Key-value storage for the last parameters entered into each calculator.
//!
//! Saved values are only ever used to pre-fill fields the user left empty;
//! the calculation modules never read or write a store.

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CalcHubError;
use crate::types::CalculatorKind;
use crate::CalcHubResult;

pub trait ParameterStore {
    fn load(&self, key: &str) -> CalcHubResult<Option<Value>>;
    fn save(&mut self, key: &str, value: &Value) -> CalcHubResult<()>;
}

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ParameterStore for MemoryStore {
    fn load(&self, key: &str) -> CalcHubResult<Option<Value>> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &Value) -> CalcHubResult<()> {
        self.entries.insert(key.to_string(), value.clone());
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> CalcHubResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(CalcHubError::Storage(format!("Invalid storage key '{key}'")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl ParameterStore for JsonFileStore {
    fn load(&self, key: &str) -> CalcHubResult<Option<Value>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn save(&mut self, key: &str, value: &Value) -> CalcHubResult<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(&path, serde_json::to_string_pretty(value)?)?;
        Ok(())
    }
}

/// Fill fields missing from `entered` with the values saved for `kind`.
///
/// Fields present in `entered` always win; non-object values are returned
/// unchanged.
pub fn prefill(
    store: &dyn ParameterStore,
    kind: CalculatorKind,
    entered: Value,
) -> CalcHubResult<Value> {
    let saved = match store.load(&kind.storage_key())? {
        Some(Value::Object(map)) => map,
        _ => return Ok(entered),
    };

    match entered {
        Value::Object(mut current) => {
            for (field, value) in saved {
                let missing = current.get(&field).map_or(true, Value::is_null);
                if missing {
                    current.insert(field, value);
                }
            }
            Ok(Value::Object(current))
        }
        other => Ok(other),
    }
}

/// Persist the non-null fields of `entered` under the key for `kind`.
pub fn remember(
    store: &mut dyn ParameterStore,
    kind: CalculatorKind,
    entered: &Value,
) -> CalcHubResult<()> {
    let fields: Map<String, Value> = match entered {
        Value::Object(map) => map
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
        _ => {
            return Err(CalcHubError::Storage(
                "Only object parameters can be saved".into(),
            ))
        }
    };
    store.save(&kind.storage_key(), &Value::Object(fields))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_prefill_only_fills_missing_fields() {
        let mut store = MemoryStore::new();
        remember(
            &mut store,
            CalculatorKind::Loan,
            &json!({"loan_amount": "10000", "interest_rate": "6", "loan_term_months": 12}),
        )
        .unwrap();

        let merged = prefill(
            &store,
            CalculatorKind::Loan,
            json!({"loan_amount": "25000", "interest_rate": null}),
        )
        .unwrap();
        assert_eq!(
            merged,
            json!({"loan_amount": "25000", "interest_rate": "6", "loan_term_months": 12})
        );
    }

    #[test]
    fn test_prefill_without_saved_values() {
        let store = MemoryStore::new();
        let entered = json!({"weight": "70"});
        assert_eq!(
            prefill(&store, CalculatorKind::Bmi, entered.clone()).unwrap(),
            entered
        );
    }

    #[test]
    fn test_remember_drops_nulls() {
        let mut store = MemoryStore::new();
        remember(
            &mut store,
            CalculatorKind::Bmi,
            &json!({"weight": "70", "height": null}),
        )
        .unwrap();
        assert_eq!(
            store.load("calculator_bmi").unwrap(),
            Some(json!({"weight": "70"}))
        );
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = std::env::temp_dir().join(format!("calc-hub-store-{}", std::process::id()));
        let mut store = JsonFileStore::new(&dir);
        assert_eq!(store.load("calculator_loan").unwrap(), None);
        store
            .save("calculator_loan", &json!({"loan_amount": "5000"}))
            .unwrap();
        assert_eq!(
            store.load("calculator_loan").unwrap(),
            Some(json!({"loan_amount": "5000"}))
        );
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_file_store_rejects_path_keys() {
        let store = JsonFileStore::new(std::env::temp_dir());
        assert!(store.load("../etc/passwd").is_err());
    }
}
