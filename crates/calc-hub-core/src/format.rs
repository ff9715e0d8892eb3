//! Display formatting shared by every calculator (US locale).

use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::{Money, Rate};

/// Whole-dollar currency, e.g. `$1,619`.
pub fn format_currency(amount: Money) -> String {
    currency(amount, 0)
}

/// Currency with cents, e.g. `$1,618.79`.
pub fn format_currency_detailed(amount: Money) -> String {
    currency(amount, 2)
}

/// A percentage value with two decimals, e.g. `6.50%`.
pub fn format_percentage(rate_percent: Rate) -> String {
    format!("{}%", fixed(rate_percent, 2))
}

/// Grouped number with a fixed number of decimals, e.g. `1,234.50`.
pub fn format_number(value: Decimal, decimals: u32) -> String {
    let text = fixed(value.abs(), decimals);
    let sign = if value.is_sign_negative() && !is_zero_text(&text) {
        "-"
    } else {
        ""
    };
    format!("{sign}{}", group_thousands(&text))
}

fn currency(amount: Money, decimals: u32) -> String {
    let text = fixed(amount.abs(), decimals);
    let sign = if amount.is_sign_negative() && !is_zero_text(&text) {
        "-"
    } else {
        ""
    };
    format!("{sign}${}", group_thousands(&text))
}

fn fixed(value: Decimal, decimals: u32) -> String {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", decimals as usize, rounded)
}

fn is_zero_text(text: &str) -> bool {
    text.chars().all(|c| c == '0' || c == '.')
}

fn group_thousands(text: &str) -> String {
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac_part {
        Some(f) => format!("{grouped}.{f}"),
        None => grouped,
    }
}
