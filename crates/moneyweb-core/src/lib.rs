//! Finance domain logic: filter state, URL codec, pagination and summaries
//!
//! Everything here is synchronous and side-effect free. The HTTP client and
//! the web layer build on these types.

pub mod category;
pub mod error;
pub mod filter;
pub mod goal;
pub mod models;
pub mod page;
pub mod summary;
pub mod time;
pub mod url;

pub use category::{resolve_category_name, CategoryIndex};
pub use error::{CoreError, CoreResult, ErrorSeverity};
pub use filter::{apply_filter, reset_filter, ActiveFilter, DateRange, FilterEdit, FilterState};
pub use models::{
    Category, CategoryDraft, CategoryRef, EntityId, Goal, GoalDraft, Transaction, TransactionDraft,
    TransactionType, TypeFilter,
};
pub use page::{PageRequest, PageResponse, PageResult};
pub use url::{read_filters_from_url, write_filters_to_url, SyncAction, UrlSync};
