//! Transaction list endpoint selection
//!
//! The backend has one list endpoint per filter family and none that
//! combines them, so the reduced filter picks exactly one.

use moneyweb_core::filter::{ActiveFilter, DateRange, FilterState};
use moneyweb_core::models::{EntityId, TransactionType};
use moneyweb_core::page::PageRequest;
use moneyweb_core::time;

use crate::api::with_query;

pub const TRANSACTIONS_PATH: &str = "/transactions";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionEndpoint {
    All,
    DateRange(DateRange),
    Type(TransactionType),
    Category(EntityId),
}

impl TransactionEndpoint {
    /// Endpoint for the winning family of `filter`
    pub fn select(filter: &FilterState) -> Self {
        match filter.active() {
            ActiveFilter::DateRange(range) => TransactionEndpoint::DateRange(range),
            ActiveFilter::Type(transaction_type) => TransactionEndpoint::Type(transaction_type),
            ActiveFilter::Category(id) => TransactionEndpoint::Category(id),
            ActiveFilter::None => TransactionEndpoint::All,
        }
    }

    pub fn path(&self) -> String {
        match self {
            TransactionEndpoint::All => TRANSACTIONS_PATH.to_string(),
            TransactionEndpoint::DateRange(_) => format!("{}/date-range", TRANSACTIONS_PATH),
            TransactionEndpoint::Type(transaction_type) => {
                format!("{}/type/{}", TRANSACTIONS_PATH, transaction_type.as_str())
            }
            TransactionEndpoint::Category(id) => format!("{}/category/{}", TRANSACTIONS_PATH, id),
        }
    }

    /// Path and query for `page`. Range bounds cover both days in full.
    pub fn url(&self, page: &PageRequest) -> String {
        let mut pairs = Vec::new();
        if let TransactionEndpoint::DateRange(range) = self {
            pairs.push(("start", time::format_wire(time::start_of_day(range.start))));
            pairs.push(("end", time::format_wire(time::end_of_day(range.end))));
        }
        pairs.extend(page.query_pairs());
        with_query(&self.path(), &pairs)
    }
}
