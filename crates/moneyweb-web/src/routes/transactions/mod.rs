//! Transaction routes - Filtered list, pagination, CRUD
//!
//! Features:
//! - Filter by date range, type or category, one family at a time
//! - Filters mirrored in the address bar through `HX-Push-Url`
//! - Stale list responses dropped with `HX-Reswap: none`
//!
//! Structure:
//! - api.rs: HTMX fragments and mutations
//! - page.rs: Full page and rendering helpers

pub mod api;
pub mod page;

pub const TRANSACTIONS_PAGE: &str = "/transactions";
pub const LIST_ID: &str = "transactions-list";
pub const PANEL_ID: &str = "transactions-panel";
pub const CHANGED_EVENT: &str = "transactions-changed";

pub use api::{
    htmx_transactions_list,
    htmx_transactions_filter,
    htmx_transactions_filter_clear,
    htmx_transaction_form,
    htmx_transaction_edit_form,
    htmx_transaction_store,
    htmx_transaction_update,
    htmx_transaction_delete,
};

pub use page::page_transactions;
