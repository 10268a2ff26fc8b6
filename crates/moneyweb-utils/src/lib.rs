//! Utility functions and helpers

use std::sync::atomic::{AtomicU64, Ordering};

use moneyweb_config::{CurrencyConfig, SymbolPosition};
use rust_decimal::{Decimal, RoundingStrategy};

/// Insert `separator` every three digits of an unsigned digit string
fn group_digits(digits: &str, separator: &str) -> String {
    let mut result = String::new();
    let mut count = 0;
    for c in digits.chars().rev() {
        if count == 3 {
            result.push_str(&separator.chars().rev().collect::<String>());
            count = 0;
        }
        result.push(c);
        count += 1;
    }
    result.chars().rev().collect()
}

/// Format a number with thousands separators
pub fn format_number<T: ToString>(n: T) -> String {
    let s = n.to_string();
    match s.strip_prefix('-') {
        Some(digits) => format!("-{}", group_digits(digits, ",")),
        None => group_digits(&s, ","),
    }
}

/// Format a decimal with a fixed number of places and custom separators
pub fn format_amount(amount: Decimal, places: u32, thousands: &str, decimal: &str) -> String {
    let rounded = amount.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.*}", places as usize, rounded.abs());
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text.as_str(), None),
    };

    let mut result = String::new();
    if negative {
        result.push('-');
    }
    result.push_str(&group_digits(whole, thousands));
    if let Some(fraction) = fraction {
        result.push_str(decimal);
        result.push_str(fraction);
    }
    result
}

/// Format an amount with the configured currency symbol
pub fn format_currency(amount: Decimal, currency: &CurrencyConfig) -> String {
    let formatted = format_amount(
        amount.abs(),
        currency.decimal_places,
        &currency.thousands_separator,
        &currency.decimal_separator,
    );
    let sign = if amount.is_sign_negative() && !amount.is_zero() { "-" } else { "" };
    match currency.symbol_position {
        SymbolPosition::Before => format!("{}{} {}", sign, currency.symbol, formatted),
        SymbolPosition::After => format!("{}{} {}", sign, formatted, currency.symbol),
    }
}

/// Escape text for inclusion in HTML content or attribute values
pub fn escape_html(content: &str) -> String {
    let mut escaped = String::with_capacity(content.len());
    for c in content.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Up to two uppercase initials: first and last word of `name`
pub fn initials(name: &str) -> String {
    let mut words = name.split_whitespace();
    let first = match words.next().and_then(|w| w.chars().next()) {
        Some(c) => c,
        None => return String::new(),
    };
    let mut result: String = first.to_uppercase().collect();
    if let Some(last) = words.last().and_then(|w| w.chars().next()) {
        result.extend(last.to_uppercase());
    }
    result
}

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Generate a process-unique element id with the given prefix
pub fn generate_id(prefix: &str) -> String {
    format!("{}-{}", prefix, NEXT_ID.fetch_add(1, Ordering::Relaxed))
}
