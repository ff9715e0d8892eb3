use rust_decimal::Decimal;
use serde_json::Value;

use calc_hub_core::format::{format_currency_detailed, format_number};

/// How a headline field is rendered.
enum Headline {
    Currency,
    Number(u32),
}

/// Headline field of each calculator, in priority order.
const PRIORITY_KEYS: [(&str, Headline); 4] = [
    ("total_monthly", Headline::Currency),
    ("monthly_payment", Headline::Currency),
    ("monthly_principal_and_interest", Headline::Currency),
    ("bmi", Headline::Number(1)),
];

/// Print just the key answer from the output, e.g. `$860.66` or
/// `22.9 Normal weight`.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    println!("{}", headline(result_obj));
}

fn headline(result: &Value) -> String {
    let Value::Object(map) = result else {
        return format_minimal(result);
    };

    for (key, style) in &PRIORITY_KEYS {
        let Some(val) = map.get(*key).filter(|v| !v.is_null()) else {
            continue;
        };
        let rendered = match (style, as_decimal(val)) {
            (Headline::Currency, Some(d)) => format_currency_detailed(d),
            (Headline::Number(places), Some(d)) => format_number(d, *places),
            (_, None) => format_minimal(val),
        };
        return match map.get("category") {
            Some(Value::String(category)) => format!("{} {}", rendered, category),
            _ => rendered,
        };
    }

    match map.iter().next() {
        Some((key, val)) => format!("{}: {}", key, format_minimal(val)),
        None => String::new(),
    }
}

fn as_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.to_string().parse().ok(),
        _ => None,
    }
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
