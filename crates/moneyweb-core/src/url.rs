//! Filter state to query string codec, and the address bar reconciliation
//!
//! The query string is the source of truth on page load and on history
//! navigation. Form submissions write back to it with a history push.

use crate::filter::FilterState;
use crate::models::TypeFilter;
use crate::time;

pub const START_DATE_PARAM: &str = "startDate";
pub const END_DATE_PARAM: &str = "endDate";
pub const TYPE_PARAM: &str = "type";
pub const CATEGORY_PARAM: &str = "categoryId";

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}

/// Split a query string into decoded key/value pairs, keeping order.
///
/// A leading `?` is ignored, as are empty segments.
pub fn parse_query(search: &str) -> Vec<(String, String)> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment.split_once('=') {
            Some((key, value)) => (decode_component(key), decode_component(value)),
            None => (decode_component(segment), String::new()),
        })
        .collect()
}

/// Encode pairs back into a query string, without the leading `?`
pub fn encode_query(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn first<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Read the filter parameters from a query string.
///
/// Unknown or invalid values are dropped: an unrecognised `type` reads as
/// ALL, and a `categoryId` that is not a positive integer is ignored. No
/// reduction is applied.
pub fn read_filters_from_url(search: &str) -> FilterState {
    let pairs = parse_query(search);

    let transaction_type = first(&pairs, TYPE_PARAM)
        .and_then(|value| value.parse::<TypeFilter>().ok())
        .unwrap_or_default();
    let category_id = first(&pairs, CATEGORY_PARAM)
        .and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|id| *id > 0);

    FilterState {
        start_date: first(&pairs, START_DATE_PARAM).and_then(time::parse_url_date),
        end_date: first(&pairs, END_DATE_PARAM).and_then(time::parse_url_date),
        transaction_type,
        category_id,
    }
}

fn set_or_delete(pairs: &mut Vec<(String, String)>, key: &str, value: Option<String>) {
    match value.filter(|v| !v.is_empty()) {
        Some(value) => {
            let mut seen = false;
            pairs.retain_mut(|(k, v)| {
                if k != key {
                    return true;
                }
                if seen {
                    return false;
                }
                seen = true;
                *v = value.clone();
                true
            });
            if !seen {
                pairs.push((key.to_string(), value));
            }
        }
        None => pairs.retain(|(k, _)| k != key),
    }
}

/// Build the URL to push for `filters`.
///
/// Parameters other than the four filter keys are kept in their original
/// order. Unset values and `type=ALL` are removed rather than written.
pub fn write_filters_to_url(path: &str, current_search: &str, filters: &FilterState) -> String {
    let mut pairs = parse_query(current_search);

    set_or_delete(&mut pairs, START_DATE_PARAM, filters.start_date.map(time::format_url_date));
    set_or_delete(&mut pairs, END_DATE_PARAM, filters.end_date.map(time::format_url_date));
    let transaction_type = filters
        .transaction_type
        .as_transaction_type()
        .map(|t| t.as_str().to_string());
    set_or_delete(&mut pairs, TYPE_PARAM, transaction_type);
    set_or_delete(
        &mut pairs,
        CATEGORY_PARAM,
        filters.category_id.filter(|id| *id > 0).map(|id| id.to_string()),
    );

    let query = encode_query(&pairs);
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query)
    }
}

/// Outcome of a form submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    /// Push this URL onto the history stack, then fetch
    Push(String),
    /// The reduced filter equals the synced one; nothing to write or fetch
    Unchanged,
}

/// Two-way binding between the address bar and the filter state.
///
/// Submissions produce URL writes; location changes only update the state.
/// Keeping the two directions separate means a write is never read back
/// as a new change.
#[derive(Debug, Clone)]
pub struct UrlSync {
    path: String,
    search: String,
    synced: FilterState,
}

impl UrlSync {
    /// Initialise from the location at page load
    pub fn from_location(path: &str, search: &str) -> Self {
        Self {
            path: path.to_string(),
            search: search.trim_start_matches('?').to_string(),
            synced: read_filters_from_url(search),
        }
    }

    /// Filter state currently reflected in the URL
    pub fn state(&self) -> &FilterState {
        &self.synced
    }

    /// Current URL path plus query
    pub fn current_url(&self) -> String {
        if self.search.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.search)
        }
    }

    /// UI-originated change. Reduces `filters` and returns the URL to push
    /// when the reduced state differs from the synced one.
    pub fn submit(&mut self, filters: &FilterState) -> SyncAction {
        let reduced = filters.reduced();
        if reduced == self.synced {
            return SyncAction::Unchanged;
        }
        let url = write_filters_to_url(&self.path, &self.search, &reduced);
        self.search = url
            .split_once('?')
            .map(|(_, query)| query.to_string())
            .unwrap_or_default();
        self.synced = reduced;
        SyncAction::Push(url)
    }

    /// URL-originated change, from history navigation or a pasted link.
    /// Returns the new state when it differs from the synced one.
    pub fn location_changed(&mut self, search: &str) -> Option<FilterState> {
        let state = read_filters_from_url(search);
        self.search = search.trim_start_matches('?').to_string();
        if state == self.synced {
            return None;
        }
        self.synced = state;
        Some(state)
    }
}
