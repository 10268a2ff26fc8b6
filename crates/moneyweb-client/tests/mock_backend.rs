//! End-to-end tests against an in-process axum backend over real HTTP

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use moneyweb_client::{ClientError, HyperTransport, MemoryTokenStore, MoneyClient, TokenStore};
use moneyweb_config::Config;
use moneyweb_core::filter::{FilterEdit, FilterState};
use moneyweb_core::{apply_filter, CategoryRef};
use serde_json::{json, Value};

const TOKEN: &str = "jwt-42";

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", TOKEN))
        .unwrap_or(false)
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] == "secret" {
        Json(json!({"token": TOKEN, "id": 1, "name": "Ana", "email": body["email"]})).into_response()
    } else {
        StatusCode::UNAUTHORIZED.into_response()
    }
}

async fn date_range(headers: HeaderMap, Query(params): Query<HashMap<String, String>>) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let description = format!(
        "{}|{}|{}",
        params.get("start").cloned().unwrap_or_default(),
        params.get("end").cloned().unwrap_or_default(),
        params.get("pageNo").cloned().unwrap_or_default()
    );
    Json(json!({
        "content": [{
            "id": 1, "description": description, "amount": 12.5,
            "date": "2024-03-02T00:00:00", "type": "EXPENSE",
            "category": {"id": "3", "name": "Food"}
        }],
        "totalPages": 2,
        "totalElements": 11,
        "number": 1
    }))
    .into_response()
}

async fn categories(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!([{"id": 3, "name": "Food"}, {"id": "4", "name": "Rent"}])).into_response()
}

async fn goal(headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if id != 7 {
        return (StatusCode::NOT_FOUND, Json(json!({"message": "Goal not found"}))).into_response();
    }
    Json(json!({
        "id": 7, "name": "Trip", "targetAmount": 200, "currentAmount": 250,
        "targetDate": "2030-06-01"
    }))
    .into_response()
}

async fn spawn_backend() -> String {
    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/transactions/date-range", get(date_range))
        .route("/api/categories", get(categories))
        .route("/api/goals/:id", get(goal));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api", addr)
}

fn client(base_url: &str, tokens: Arc<MemoryTokenStore>) -> MoneyClient {
    let mut config = Config::default();
    config.backend.base_url = base_url.to_string();
    let transport = Arc::new(HyperTransport::new(Duration::from_secs(5)));
    MoneyClient::with_transport(&config, transport, tokens)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn test_login_then_fetch_date_range_page() {
    let base = spawn_backend().await;
    let tokens = Arc::new(MemoryTokenStore::new());
    let client = client(&base, tokens.clone());

    client.auth.login("ana@x.io", "secret").await.unwrap();
    assert_eq!(tokens.load().await.unwrap().as_deref(), Some(TOKEN));

    let filter = apply_filter(
        &FilterState {
            category_id: Some(3),
            ..FilterState::default()
        },
        FilterEdit::new().date_range(date(2024, 3, 1), date(2024, 3, 31)),
    );
    let page = client
        .transactions
        .fetch_page(&filter, &client.transactions.page_request(1))
        .await
        .unwrap();

    assert_eq!(page.page_number, 1);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.total_elements, 11);
    let tx = &page.items[0];
    assert_eq!(tx.description, "2024-03-01T00:00:00|2024-03-31T23:59:59|1");
    assert!(matches!(&tx.category, CategoryRef::Embedded(c) if c.id == Some(3)));
}

#[tokio::test]
async fn test_bare_list_and_lenient_ids() {
    let base = spawn_backend().await;
    let client = client(&base, Arc::new(MemoryTokenStore::with_token(TOKEN)));

    let index = client.categories.index().await.unwrap();
    assert_eq!(index.name_of(4), Some("Rent"));
    assert_eq!(index.len(), 2);
}

#[tokio::test]
async fn test_expired_token_is_cleared() {
    let base = spawn_backend().await;
    let tokens = Arc::new(MemoryTokenStore::with_token("stale"));
    let client = client(&base, tokens.clone());

    let result = client.categories.all().await;
    assert!(matches!(result, Err(ClientError::Unauthorized)));
    assert_eq!(tokens.load().await.unwrap(), None);
}

#[tokio::test]
async fn test_not_found_carries_backend_message() {
    let base = spawn_backend().await;
    let client = client(&base, Arc::new(MemoryTokenStore::with_token(TOKEN)));

    let goal = client.goals.get(7).await.unwrap();
    assert_eq!(goal.name, "Trip");

    match client.goals.get(8).await {
        Err(ClientError::Http { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "Goal not found");
        }
        other => panic!("unexpected result: {:?}", other.map(|g| g.name)),
    }
}
