//! Typed client for the personal finance REST backend
//!
//! [`MoneyClient`] bundles the resource services over one authenticated
//! [`ApiClient`]. The transport and token store are trait objects so tests
//! can swap them out.

use std::sync::Arc;
use std::time::Duration;

use moneyweb_config::Config;

pub mod api;
pub mod auth;
pub mod cache;
pub mod coordinator;
pub mod endpoints;
pub mod error;
pub mod services;
pub mod transport;

pub use api::ApiClient;
pub use auth::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use coordinator::{FetchCoordinator, Fetched};
pub use endpoints::TransactionEndpoint;
pub use error::{ClientError, ClientResult};
pub use services::{AuthService, CategoryService, GoalService, TransactionService};
pub use transport::{HttpRequest, HttpResponse, HyperTransport, Method, Transport};

#[derive(Clone)]
pub struct MoneyClient {
    pub transactions: TransactionService,
    pub categories: CategoryService,
    pub goals: GoalService,
    pub auth: AuthService,
}

impl MoneyClient {
    /// Client over hyper with the token persisted at `auth.token_file`
    pub fn from_config(config: &Config) -> Self {
        let transport = Arc::new(HyperTransport::new(Duration::from_secs(
            config.backend.timeout_secs,
        )));
        let tokens = Arc::new(FileTokenStore::new(config.auth.token_file.clone()));
        Self::with_transport(config, transport, tokens)
    }

    pub fn with_transport(config: &Config, transport: Arc<dyn Transport>, tokens: Arc<dyn TokenStore>) -> Self {
        let api = ApiClient::new(transport, tokens, config.api_base(), config.backend.retries);
        log::info!("Backend API at {}", api.base_url());
        Self {
            transactions: TransactionService::new(api.clone(), config.pagination.clone()),
            categories: CategoryService::new(api.clone()),
            goals: GoalService::new(api.clone()),
            auth: AuthService::new(api),
        }
    }
}
