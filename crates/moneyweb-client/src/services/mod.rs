//! Resource services built on [`crate::api::ApiClient`]

pub mod auth;
pub mod categories;
pub mod goals;
pub mod transactions;

pub use auth::AuthService;
pub use categories::CategoryService;
pub use goals::GoalService;
pub use transactions::TransactionService;

/// Page size used when a whole collection is needed at once, for lookups
/// and dashboard aggregates
pub const LOOKUP_PAGE_SIZE: u32 = 1000;
