//! Error types for moneyweb-web
//!
//! Handlers return [`ApiError`]. Its response carries an [`ErrorNotice`]
//! extension that [`crate::present_errors`] turns into a notification or an
//! error page, depending on whether the request came from HTMX.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use moneyweb_client::ClientError;
use moneyweb_core::error::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// Rejected before reaching the backend
    #[error("{message}")]
    Validation { field: Option<String>, message: String },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Upstream error: {0}")]
    Upstream(ClientError),

    #[error("Internal server error")]
    InternalError,
}

/// Message to show the user, attached to error responses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNotice(pub String);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Upstream(ClientError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text for the error notification
    pub fn user_message(&self) -> String {
        match self {
            ApiError::NotFound { .. } => "The requested item no longer exists.".to_string(),
            ApiError::BadRequest { message } | ApiError::Validation { message, .. } => message.clone(),
            ApiError::Unauthorized => ClientError::Unauthorized.to_string(),
            ApiError::Upstream(e) => e.user_message(),
            ApiError::InternalError => "Something went wrong. Please try again.".to_string(),
        }
    }

    pub fn validation(field: &str, message: &str) -> Self {
        ApiError::Validation {
            field: Some(field.to_string()),
            message: message.to_string(),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(error: CoreError) -> Self {
        ApiError::Validation {
            field: error.field().map(str::to_string),
            message: error.to_string(),
        }
    }
}

impl From<ClientError> for ApiError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::Unauthorized => ApiError::Unauthorized,
            ClientError::Validation(core) => core.into(),
            ClientError::Http { status: 404, message } => ApiError::NotFound { resource: message },
            ClientError::Http { status, message } if (400..500).contains(&status) => {
                ApiError::BadRequest { message }
            }
            other => ApiError::Upstream(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Upstream(e) => log::log!(e.severity().log_level(), "[{}] {}", e.code(), e),
            ApiError::InternalError => log::error!("{}", self),
            _ => log::debug!("{}", self),
        }
        let status = self.status();
        let message = self.user_message();
        let mut response = (status, message.clone()).into_response();
        response.extensions_mut().insert(ErrorNotice(message));
        response
    }
}

/// Result type for route handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_statuses() {
        let cases = [
            (ClientError::Unauthorized, StatusCode::UNAUTHORIZED),
            (ClientError::Http { status: 404, message: "gone".to_string() }, StatusCode::NOT_FOUND),
            (ClientError::Http { status: 409, message: "in use".to_string() }, StatusCode::BAD_REQUEST),
            (ClientError::Http { status: 500, message: "boom".to_string() }, StatusCode::BAD_GATEWAY),
            (ClientError::Timeout(30), StatusCode::GATEWAY_TIMEOUT),
            (ClientError::Decode("eof".to_string()), StatusCode::BAD_GATEWAY),
        ];
        for (client_error, status) in cases {
            assert_eq!(ApiError::from(client_error).status(), status);
        }
    }

    #[test]
    fn test_validation_keeps_field() {
        let error: ApiError = ClientError::Validation(CoreError::validation("amount", "Amount must be greater than zero")).into();
        match &error {
            ApiError::Validation { field, message } => {
                assert_eq!(field.as_deref(), Some("amount"));
                assert_eq!(message, "Amount must be greater than zero");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(error.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_response_carries_notice() {
        let response = ApiError::BadRequest { message: "Category in use".to_string() }.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.extensions().get::<ErrorNotice>(),
            Some(&ErrorNotice("Category in use".to_string()))
        );
    }
}
