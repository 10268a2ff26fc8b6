//! Configuration management for moneyweb
//!
//! This module handles loading, validation, and management of
//! moneyweb configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::{ConfigError, ConfigResult};

// ==================== Configuration Types ====================

/// Front-end server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5173
}

/// REST backend the front-end talks to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL including the `/api` prefix
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// How many times an idempotent GET is retried after a network failure
    #[serde(default = "default_retries")]
    pub retries: u32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            retries: default_retries(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_retries() -> u32 {
    1
}

/// Authentication settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// File the bearer token is persisted to between restarts
    #[serde(default = "default_token_file")]
    pub token_file: PathBuf,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_file: default_token_file(),
        }
    }
}

fn default_token_file() -> PathBuf {
    PathBuf::from("./data/token")
}

/// Sort direction shared by every paginated backend query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl std::str::FromStr for SortDirection {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(format!("Invalid sort direction: {}", s)),
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

/// Pagination settings for the transactions list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Records per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Field the backend sorts by
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    /// Sort direction
    #[serde(default)]
    pub sort_dir: SortDirection,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            sort_by: default_sort_by(),
            sort_dir: SortDirection::Desc,
        }
    }
}

fn default_page_size() -> u32 {
    10
}

fn default_sort_by() -> String {
    "date".to_string()
}

/// Dashboard settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Number of months in the income/expense evolution
    #[serde(default = "default_months")]
    pub months: u32,
    /// Page size of the latest transactions card
    #[serde(default = "default_latest_page_size")]
    pub latest_page_size: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            months: default_months(),
            latest_page_size: default_latest_page_size(),
        }
    }
}

fn default_months() -> u32 {
    6
}

fn default_latest_page_size() -> u32 {
    5
}

/// Notification display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Milliseconds before a notification closes itself
    #[serde(default = "default_auto_dismiss_ms")]
    pub auto_dismiss_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            auto_dismiss_ms: default_auto_dismiss_ms(),
        }
    }
}

fn default_auto_dismiss_ms() -> u64 {
    3000
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Currency and number formatting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    /// Currency symbol shown next to amounts
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// Number of decimal places
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
    /// Thousands separator
    #[serde(default = "default_thousands_sep")]
    pub thousands_separator: String,
    /// Decimal separator
    #[serde(default = "default_decimal_sep")]
    pub decimal_separator: String,
    /// Currency symbol position ("before" or "after")
    #[serde(default)]
    pub symbol_position: SymbolPosition,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            decimal_places: 2,
            thousands_separator: ",".to_string(),
            decimal_separator: ".".to_string(),
            symbol_position: SymbolPosition::Before,
        }
    }
}

fn default_symbol() -> String {
    "R$".to_string()
}

fn default_decimal_places() -> u32 {
    2
}

fn default_thousands_sep() -> String {
    ",".to_string()
}

fn default_decimal_sep() -> String {
    ".".to_string()
}

/// Currency symbol position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SymbolPosition {
    #[default]
    Before,
    After,
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Front-end server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// REST backend settings
    #[serde(default)]
    pub backend: BackendConfig,
    /// Token persistence
    #[serde(default)]
    pub auth: AuthConfig,
    /// Pagination settings
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Dashboard settings
    #[serde(default)]
    pub dashboard: DashboardConfig,
    /// Notification settings
    #[serde(default)]
    pub notifications: NotificationConfig,
    /// Currency settings
    #[serde(default)]
    pub currency: CurrencyConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::Unreadable {
                path: path.display().to_string(),
                reason: e.to_string(),
            },
        })?;

        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_yaml::from_str(content).map_err(|e| ConfigError::InvalidYaml {
            message: e.to_string(),
        })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.port == 0 {
            return Err(ConfigError::invalid("server.port", "must be greater than 0"));
        }
        let base_url = self.backend.base_url.as_str();
        if base_url.starts_with("https://") {
            return Err(ConfigError::invalid(
                "backend.base_url",
                "https is not supported, reach the backend over http:// (e.g. through a local TLS-terminating proxy)",
            ));
        }
        if !base_url.starts_with("http://") {
            return Err(ConfigError::invalid("backend.base_url", "must start with http://"));
        }
        if self.backend.timeout_secs == 0 {
            return Err(ConfigError::invalid("backend.timeout_secs", "must be greater than 0"));
        }
        if !(1..=100).contains(&self.pagination.page_size) {
            return Err(ConfigError::invalid("pagination.page_size", "must be between 1 and 100"));
        }
        if !(1..=24).contains(&self.dashboard.months) {
            return Err(ConfigError::invalid("dashboard.months", "must be between 1 and 24"));
        }
        if self.dashboard.latest_page_size == 0 {
            return Err(ConfigError::invalid("dashboard.latest_page_size", "must be greater than 0"));
        }
        if self.currency.decimal_places > 10 {
            return Err(ConfigError::invalid("currency.decimal_places", "must be at most 10"));
        }
        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Address the front-end server binds to
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Backend base URL without a trailing slash
    pub fn api_base(&self) -> &str {
        self.backend.base_url.trim_end_matches('/')
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pagination.page_size, 10);
        assert_eq!(config.pagination.sort_dir, SortDirection::Desc);
        assert_eq!(config.notifications.auto_dismiss_ms, 3000);
    }

    #[test]
    fn test_generated_default_parses() {
        let config = Config::from_yaml(Config::generate_default()).unwrap();
        assert_eq!(config.backend.base_url, "http://localhost:8080/api");
        assert_eq!(config.dashboard.months, 6);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = Config::from_yaml("backend:\n  base_url: http://money.internal:8080/api/\n").unwrap();
        assert_eq!(config.api_base(), "http://money.internal:8080/api");
        assert_eq!(config.server.port, 5173);
        assert_eq!(config.backend.retries, 1);
    }

    #[test]
    fn test_invalid_page_size_rejected() {
        let err = Config::from_yaml("pagination:\n  page_size: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "pagination.page_size"));
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let err = Config::from_yaml("backend:\n  base_url: localhost:8080\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "backend.base_url"));
    }

    #[test]
    fn test_https_base_url_rejected() {
        let err = Config::from_yaml("backend:\n  base_url: https://127.0.0.1:9/api\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "backend.base_url"));
        assert!(err.to_string().contains("https is not supported"));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = Config::from_yaml("server: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidYaml { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load("/definitely/not/here/config.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn test_sort_direction_from_str() {
        assert_eq!("ASC".parse::<SortDirection>().unwrap(), SortDirection::Asc);
        assert_eq!("desc".parse::<SortDirection>().unwrap(), SortDirection::Desc);
        assert!("up".parse::<SortDirection>().is_err());
        assert_eq!(SortDirection::Asc.to_string(), "asc");
    }
}
