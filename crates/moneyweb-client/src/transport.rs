//! HTTP transport seam
//!
//! [`Transport`] sends one request and returns the raw response. Status
//! handling, auth headers and decoding live in [`crate::api::ApiClient`].

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use hyper::client::HttpConnector;
use hyper::{Body, Client};

use crate::error::{ClientError, ClientResult};

/// HTTP verbs used by the backend API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }

    /// Safe to repeat on a transient failure
    pub fn is_idempotent_read(&self) -> bool {
        matches!(self, Method::Get)
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<Method> for hyper::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => hyper::Method::GET,
            Method::Post => hyper::Method::POST,
            Method::Put => hyper::Method::PUT,
            Method::Delete => hyper::Method::DELETE,
        }
    }
}

/// Outgoing request with an absolute URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn json_body(mut self, body: Vec<u8>) -> Self {
        self.headers
            .push(("Content-Type".to_string(), "application/json".to_string()));
        self.body = Some(body);
        self
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Raw response: status code and body bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a single HTTP request
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> ClientResult<HttpResponse>;
}

/// Transport backed by a pooled hyper client.
///
/// Plain `http://` only; an `https://` backend must sit behind a
/// TLS-terminating proxy.
pub struct HyperTransport {
    client: Client<HttpConnector, Body>,
    timeout: Duration,
}

impl HyperTransport {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            timeout,
        }
    }

    fn timeout_error(&self) -> ClientError {
        ClientError::Timeout(self.timeout.as_secs())
    }
}

#[async_trait]
impl Transport for HyperTransport {
    async fn send(&self, request: HttpRequest) -> ClientResult<HttpResponse> {
        let mut builder = hyper::Request::builder()
            .method(hyper::Method::from(request.method))
            .uri(request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let body = match request.body {
            Some(bytes) => Body::from(bytes),
            None => Body::empty(),
        };
        let outgoing = builder
            .body(body)
            .map_err(|e| ClientError::Network(format!("invalid request: {}", e)))?;

        let response = tokio::time::timeout(self.timeout, self.client.request(outgoing))
            .await
            .map_err(|_| self.timeout_error())?
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = tokio::time::timeout(self.timeout, hyper::body::to_bytes(response.into_body()))
            .await
            .map_err(|_| self.timeout_error())?
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned responses and records every request it sees
    #[derive(Default)]
    pub struct RecordingTransport {
        responses: Mutex<VecDeque<ClientResult<HttpResponse>>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl RecordingTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(self, status: u16, body: &str) -> Self {
            self.responses
                .lock()
                .unwrap()
                .push_back(Ok(HttpResponse::new(status, body.to_string())));
            self
        }

        pub fn fail(self, error: ClientError) -> Self {
            self.responses.lock().unwrap().push_back(Err(error));
            self
        }

        pub fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn send(&self, request: HttpRequest) -> ClientResult<HttpResponse> {
            self.requests.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(HttpResponse::new(200, "[]")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = HttpRequest::new(Method::Post, "http://localhost/api/goals")
            .header("Authorization", "Bearer t")
            .json_body(b"{}".to_vec());
        assert_eq!(request.header_value("content-type"), Some("application/json"));
        assert_eq!(request.header_value("authorization"), Some("Bearer t"));
        assert_eq!(request.body.as_deref(), Some(&b"{}"[..]));
    }

    #[test]
    fn test_response_success_range() {
        assert!(HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(302, "").is_success());
        assert!(!HttpResponse::new(401, "").is_success());
    }

    #[test]
    fn test_only_get_is_retried() {
        assert!(Method::Get.is_idempotent_read());
        assert!(!Method::Delete.is_idempotent_read());
        assert_eq!(hyper::Method::from(Method::Put), hyper::Method::PUT);
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        let transport = HyperTransport::new(Duration::from_secs(2));
        // port 9 (discard) is almost never listening on loopback
        let result = transport
            .send(HttpRequest::new(Method::Get, "http://127.0.0.1:9/api/transactions"))
            .await;
        assert!(matches!(
            result,
            Err(ClientError::Network(_)) | Err(ClientError::Timeout(_))
        ));
    }
}
