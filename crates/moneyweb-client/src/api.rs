//! Authenticated JSON client for the backend
//!
//! Every request carries the stored bearer token. A 401 clears the token and
//! surfaces as [`ClientError::Unauthorized`]; other non-2xx statuses become
//! [`ClientError::Http`]. List responses are normalized to [`PageResult`]
//! here, so callers never see the wire shape.

use std::sync::Arc;

use bytes::Bytes;
use moneyweb_core::page::{PageResponse, PageResult};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::auth::TokenStore;
use crate::error::{ClientError, ClientResult};
use crate::transport::{HttpRequest, HttpResponse, Method, Transport};

const MAX_ERROR_MESSAGE_LEN: usize = 200;

#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    tokens: Arc<dyn TokenStore>,
    base_url: String,
    retries: u32,
}

impl ApiClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        tokens: Arc<dyn TokenStore>,
        base_url: &str,
        retries: u32,
    ) -> Self {
        Self {
            transport,
            tokens,
            base_url: base_url.trim_end_matches('/').to_string(),
            retries,
        }
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a path that already carries its query string
    pub fn url_for(&self, path_and_query: &str) -> String {
        format!("{}{}", self.base_url, path_and_query)
    }

    async fn build_request(&self, method: Method, path_and_query: &str, body: Option<Vec<u8>>) -> ClientResult<HttpRequest> {
        let mut request = HttpRequest::new(method, self.url_for(path_and_query))
            .header("Accept", "application/json");
        if let Some(token) = self.tokens.load().await? {
            request = request.header("Authorization", &format!("Bearer {}", token));
        }
        if let Some(body) = body {
            request = request.json_body(body);
        }
        Ok(request)
    }

    async fn send_with_retry(&self, request: HttpRequest) -> ClientResult<HttpResponse> {
        let attempts = if request.method.is_idempotent_read() {
            self.retries + 1
        } else {
            1
        };
        let mut attempt = 1;
        loop {
            match self.transport.send(request.clone()).await {
                Err(e) if e.is_retryable() && attempt < attempts => {
                    log::warn!(
                        "{} {} failed (attempt {}/{}): {}",
                        request.method,
                        request.url,
                        attempt,
                        attempts,
                        e
                    );
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    /// Send a request and return the body of a 2xx response
    pub async fn execute(&self, method: Method, path_and_query: &str, body: Option<Vec<u8>>) -> ClientResult<Bytes> {
        let request = self.build_request(method, path_and_query, body).await?;
        let url = request.url.clone();
        let response = match self.send_with_retry(request).await {
            Ok(response) => response,
            Err(e) => {
                log::error!("{} {} failed: {}", method, url, e);
                return Err(e);
            }
        };
        log::debug!("{} {} -> {}", method, url, response.status);

        if response.status == 401 {
            if let Err(e) = self.tokens.clear().await {
                log::warn!("Failed to clear token after 401: {}", e);
            }
            return Err(ClientError::Unauthorized);
        }
        if !response.is_success() {
            let message = error_message(response.status, &response.body);
            if response.status >= 500 {
                log::error!("{} {} returned {}: {}", method, url, response.status, message);
            }
            return Err(ClientError::Http {
                status: response.status,
                message,
            });
        }
        Ok(response.body)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path_and_query: &str) -> ClientResult<T> {
        let body = self.execute(Method::Get, path_and_query, None).await?;
        decode(&body)
    }

    /// GET a list endpoint and normalize either wire shape
    pub async fn get_page<T: DeserializeOwned>(&self, path_and_query: &str, requested_page: u32) -> ClientResult<PageResult<T>> {
        let response: PageResponse<T> = self.get_json(path_and_query).await?;
        Ok(response.normalize(requested_page))
    }

    /// Send `body` as JSON and decode the JSON answer
    pub async fn send_json<B: Serialize, T: DeserializeOwned>(&self, method: Method, path: &str, body: &B) -> ClientResult<T> {
        let response = self.send_json_raw(method, path, body).await?;
        decode(&response)
    }

    /// Send `body` as JSON and return the raw answer, for endpoints that reply with text
    pub async fn send_json_raw<B: Serialize>(&self, method: Method, path: &str, body: &B) -> ClientResult<Bytes> {
        let payload = serde_json::to_vec(body)
            .map_err(|e| ClientError::Decode(format!("cannot encode request: {}", e)))?;
        self.execute(method, path, Some(payload)).await
    }

    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        self.execute(Method::Delete, path, None).await.map(|_| ())
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> ClientResult<T> {
    serde_json::from_slice(body).map_err(|e| ClientError::Decode(e.to_string()))
}

/// Best-effort message from an error body: a JSON `message` or `error`
/// field, else the text itself, else a generic status line
fn error_message(status: u16, body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        for key in ["message", "error"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                if !text.trim().is_empty() {
                    return text.to_string();
                }
            }
        }
    }
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() || text.starts_with('{') || text.starts_with('<') {
        format!("request failed with status {}", status)
    } else {
        text.chars().take(MAX_ERROR_MESSAGE_LEN).collect()
    }
}

/// Join path and encoded query pairs. Colons stay literal so backend
/// date-times read naturally in logs.
pub fn with_query(path: &str, pairs: &[(&str, String)]) -> String {
    if pairs.is_empty() {
        return path.to_string();
    }
    let query = pairs
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value).replace("%3A", ":")
            )
        })
        .collect::<Vec<_>>()
        .join("&");
    format!("{}?{}", path, query)
}
