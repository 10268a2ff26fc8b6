//! Login, registration and logout

use moneyweb_core::error::CoreError;
use moneyweb_core::models::{LoginRequest, LoginResponse, RegisterRequest};

use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::transport::Method;

pub const LOGIN_PATH: &str = "/auth/login";
pub const REGISTER_PATH: &str = "/auth/register";

#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Exchange credentials for a token and store it
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<LoginResponse> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(CoreError::validation("email", "Email and password are required").into());
        }
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self.api.send_json(Method::Post, LOGIN_PATH, &request).await?;
        let tokens = self.api.tokens();
        tokens.save(&response.token).await?;
        // a blank name clears the one of an earlier session
        tokens.save_user(response.name.as_deref().unwrap_or("")).await?;
        log::info!("Logged in as {}", request.email);
        Ok(response)
    }

    /// Create an account. The backend answers with plain text, which is ignored.
    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<()> {
        request.validate()?;
        self.api
            .send_json_raw(Method::Post, REGISTER_PATH, request)
            .await?;
        log::info!("Registered {}", request.email);
        Ok(())
    }

    pub async fn logout(&self) -> ClientResult<()> {
        self.api.tokens().clear().await
    }

    pub async fn is_authenticated(&self) -> ClientResult<bool> {
        Ok(self.api.tokens().load().await?.is_some())
    }

    /// Display name returned by the last login
    pub async fn current_user(&self) -> ClientResult<Option<String>> {
        self.api.tokens().load_user().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{MemoryTokenStore, TokenStore};
    use crate::error::ClientError;
    use crate::transport::test_support::RecordingTransport;
    use std::sync::Arc;

    fn service(transport: Arc<RecordingTransport>, tokens: Arc<MemoryTokenStore>) -> AuthService {
        AuthService::new(ApiClient::new(transport, tokens, "http://b/api", 0))
    }

    #[tokio::test]
    async fn test_login_stores_token() {
        let transport = Arc::new(
            RecordingTransport::new()
                .respond(200, r#"{"token": "jwt-1", "id": 1, "name": "Ana", "email": "ana@x.io"}"#),
        );
        let tokens = Arc::new(MemoryTokenStore::new());
        let auth = service(transport.clone(), tokens.clone());

        let response = auth.login("ana@x.io", "secret").await.unwrap();
        assert_eq!(response.name.as_deref(), Some("Ana"));
        assert_eq!(tokens.load().await.unwrap().as_deref(), Some("jwt-1"));
        assert_eq!(auth.current_user().await.unwrap().as_deref(), Some("Ana"));
        assert!(auth.is_authenticated().await.unwrap());
        assert_eq!(transport.requests()[0].url, "http://b/api/auth/login");

        auth.logout().await.unwrap();
        assert!(!auth.is_authenticated().await.unwrap());
        assert_eq!(auth.current_user().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_login_without_name_drops_previous_user() {
        let transport = Arc::new(RecordingTransport::new().respond(200, r#"{"token": "jwt-2"}"#));
        let tokens = Arc::new(MemoryTokenStore::with_token("old").with_user("Bruno"));
        let auth = service(transport, tokens.clone());

        auth.login("ana@x.io", "secret").await.unwrap();
        assert_eq!(tokens.load().await.unwrap().as_deref(), Some("jwt-2"));
        assert_eq!(auth.current_user().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_failed_login_keeps_no_token() {
        let transport = Arc::new(RecordingTransport::new().respond(401, ""));
        let tokens = Arc::new(MemoryTokenStore::new());
        let result = service(transport, tokens.clone()).login("ana@x.io", "wrong").await;
        assert!(matches!(result, Err(ClientError::Unauthorized)));
        assert_eq!(tokens.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_register_accepts_text_reply() {
        let transport = Arc::new(RecordingTransport::new().respond(200, "User registered successfully!"));
        let request = RegisterRequest {
            name: "Ana".to_string(),
            email: "ana@x.io".to_string(),
            password: "secret1".to_string(),
        };
        service(transport.clone(), Arc::new(MemoryTokenStore::new()))
            .register(&request)
            .await
            .unwrap();
        assert_eq!(transport.requests()[0].url, "http://b/api/auth/register");
    }
}
