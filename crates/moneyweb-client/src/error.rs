//! Error types for moneyweb-client

use moneyweb_core::error::{CoreError, ErrorSeverity};
use thiserror::Error;

/// Errors raised while talking to the backend
#[derive(Error, Debug)]
pub enum ClientError {
    /// The backend answered 401; the stored token has been cleared
    #[error("Your session has expired. Please log in again.")]
    Unauthorized,

    #[error("Backend returned {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// The response body did not have the expected shape
    #[error("Unexpected response from backend: {0}")]
    Decode(String),

    /// Rejected locally, nothing was sent
    #[error(transparent)]
    Validation(#[from] CoreError),

    #[error("Token store error: {0}")]
    TokenStore(String),
}

impl ClientError {
    /// Stable code for logs and notifications
    pub fn code(&self) -> &'static str {
        match self {
            ClientError::Unauthorized => "UNAUTHORIZED",
            ClientError::Http { .. } => "HTTP_ERROR",
            ClientError::Network(_) => "NETWORK_ERROR",
            ClientError::Timeout(_) => "TIMEOUT",
            ClientError::Decode(_) => "DECODE_ERROR",
            ClientError::Validation(_) => "VALIDATION_ERROR",
            ClientError::TokenStore(_) => "TOKEN_STORE_ERROR",
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ClientError::Unauthorized => ErrorSeverity::Info,
            ClientError::Validation(_) => ErrorSeverity::Warning,
            ClientError::Http { status, .. } if *status < 500 => ErrorSeverity::Warning,
            ClientError::Http { .. } | ClientError::Network(_) | ClientError::Timeout(_) => {
                ErrorSeverity::Error
            }
            ClientError::Decode(_) | ClientError::TokenStore(_) => ErrorSeverity::Critical,
        }
    }

    /// Whether an idempotent request may be sent again
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::Network(_) | ClientError::Timeout(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            ClientError::Unauthorized => Some(401),
            _ => None,
        }
    }

    /// Short text suitable for an error notification
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Http { status: 404, .. } => "The requested item no longer exists.".to_string(),
            ClientError::Http { status, message } if *status < 500 => message.clone(),
            ClientError::Http { .. } => "The server failed to process the request.".to_string(),
            ClientError::Network(_) | ClientError::Timeout(_) => {
                "Could not reach the server. Please try again.".to_string()
            }
            ClientError::Decode(_) => "The server sent an unexpected response.".to_string(),
            other => other.to_string(),
        }
    }
}

/// Result type with ClientError
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(ClientError::Network("reset".to_string()).is_retryable());
        assert!(ClientError::Timeout(30).is_retryable());
        assert!(!ClientError::Unauthorized.is_retryable());
        assert!(!ClientError::Http { status: 500, message: String::new() }.is_retryable());
    }

    #[test]
    fn test_validation_is_transparent() {
        let error: ClientError = CoreError::validation("name", "Name is required").into();
        assert_eq!(error.to_string(), "Name is required");
        assert_eq!(error.code(), "VALIDATION_ERROR");
        assert_eq!(error.severity(), ErrorSeverity::Warning);
    }

    #[test]
    fn test_user_message_hides_server_details() {
        let error = ClientError::Http { status: 500, message: "NullPointerException".to_string() };
        assert!(!error.user_message().contains("NullPointer"));

        let error = ClientError::Http { status: 400, message: "Amount must be greater than zero".to_string() };
        assert_eq!(error.user_message(), "Amount must be greater than zero");
        assert_eq!(error.status(), Some(400));
    }
}
