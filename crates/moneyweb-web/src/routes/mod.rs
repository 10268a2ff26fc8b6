//! Route modules for the front-end server
//!
//! - dashboard: Summary cards, charts, latest transactions
//! - transactions: Filter form, paginated list, CRUD forms
//! - categories: Category list and CRUD forms
//! - goals: Goal cards with progress, CRUD forms
//! - auth: Login, registration, logout
//!
//! Full pages load their lists with `hx-trigger='load'`; mutations answer
//! with a notification and an `HX-Trigger` event the list listens for.

pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod goals;
pub mod transactions;

use moneyweb_core::error::CoreError;
use moneyweb_core::url::parse_query;
use rust_decimal::Decimal;

/// Zero-based `page` parameter of a list request; anything else reads as 0
pub fn page_param(query: &str) -> u32 {
    parse_query(query)
        .into_iter()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}

/// Parse a form amount, accepting a comma as decimal separator
pub fn parse_amount(field: &str, value: &str, label: &str) -> Result<Decimal, CoreError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CoreError::validation(field, &format!("{} is required", label)));
    }
    value
        .replace(',', ".")
        .parse::<Decimal>()
        .map_err(|_| CoreError::validation(field, &format!("{} must be a number", label)))
}

/// Blank form fields become `None`
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// `selected` attribute when `condition` holds
pub fn selected(condition: bool) -> &'static str {
    if condition {
        "selected"
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_param() {
        assert_eq!(page_param("type=INCOME&page=3"), 3);
        assert_eq!(page_param("page=-1"), 0);
        assert_eq!(page_param(""), 0);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("amount", " 12,50 ", "Amount").unwrap(), "12.5".parse::<Decimal>().unwrap());
        let error = parse_amount("amount", "abc", "Amount").unwrap_err();
        assert_eq!(error.field(), Some("amount"));
        assert_eq!(error.to_string(), "Amount must be a number");
        assert_eq!(parse_amount("targetAmount", "", "Target amount").unwrap_err().to_string(), "Target amount is required");
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text(Some("  ".to_string())), None);
        assert_eq!(optional_text(Some(" rent ".to_string())), Some("rent".to_string()));
        assert_eq!(optional_text(None), None);
    }
}
