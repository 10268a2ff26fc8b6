//! Transaction listing and CRUD

use moneyweb_config::{PaginationConfig, SortDirection};
use moneyweb_core::filter::FilterState;
use moneyweb_core::models::{EntityId, Transaction, TransactionDraft};
use moneyweb_core::page::{PageRequest, PageResult};

use super::LOOKUP_PAGE_SIZE;
use crate::api::ApiClient;
use crate::endpoints::{TransactionEndpoint, TRANSACTIONS_PATH};
use crate::error::ClientResult;
use crate::transport::Method;

#[derive(Clone)]
pub struct TransactionService {
    api: ApiClient,
    pagination: PaginationConfig,
}

impl TransactionService {
    pub fn new(api: ApiClient, pagination: PaginationConfig) -> Self {
        Self { api, pagination }
    }

    /// Configured size and sort order for `page_number`
    pub fn page_request(&self, page_number: u32) -> PageRequest {
        PageRequest::from_config(&self.pagination, page_number)
    }

    /// One page of the list for `filter`, using the endpoint of its winning family
    pub async fn fetch_page(&self, filter: &FilterState, page: &PageRequest) -> ClientResult<PageResult<Transaction>> {
        let endpoint = TransactionEndpoint::select(filter);
        log::debug!("Fetching transactions via {:?}, page {}", endpoint, page.page_number);
        self.api
            .get_page(&endpoint.url(page), page.page_number)
            .await
    }

    /// Most recent transactions, newest first
    pub async fn latest(&self, page_number: u32, page_size: u32) -> ClientResult<PageResult<Transaction>> {
        let page = PageRequest::new(page_number, page_size, "date", SortDirection::Desc);
        self.fetch_page(&FilterState::default(), &page).await
    }

    /// Every transaction, walking pages until the last one.
    ///
    /// Pages advance from the requested number, so a backend that echoes a
    /// wrong `number` cannot keep the walk going.
    pub async fn fetch_all(&self) -> ClientResult<Vec<Transaction>> {
        let mut items = Vec::new();
        let mut page_number = 0;
        loop {
            let page = PageRequest::new(page_number, LOOKUP_PAGE_SIZE, "date", SortDirection::Desc);
            let result = self.fetch_page(&FilterState::default(), &page).await?;
            let last = result.is_empty() || page_number + 1 >= result.total_pages;
            items.extend(result.items);
            if last {
                return Ok(items);
            }
            page_number += 1;
        }
    }

    pub async fn get(&self, id: EntityId) -> ClientResult<Transaction> {
        self.api
            .get_json(&format!("{}/{}", TRANSACTIONS_PATH, id))
            .await
    }

    pub async fn create(&self, draft: &TransactionDraft) -> ClientResult<Transaction> {
        draft.validate()?;
        self.api
            .send_json(Method::Post, TRANSACTIONS_PATH, draft)
            .await
    }

    pub async fn update(&self, id: EntityId, draft: &TransactionDraft) -> ClientResult<Transaction> {
        draft.validate()?;
        self.api
            .send_json(Method::Put, &format!("{}/{}", TRANSACTIONS_PATH, id), draft)
            .await
    }

    pub async fn delete(&self, id: EntityId) -> ClientResult<()> {
        self.api
            .delete(&format!("{}/{}", TRANSACTIONS_PATH, id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryTokenStore;
    use crate::error::ClientError;
    use crate::transport::test_support::RecordingTransport;
    use chrono::NaiveDate;
    use moneyweb_core::models::{TransactionType, TypeFilter};
    use std::sync::Arc;

    fn service(transport: Arc<RecordingTransport>) -> TransactionService {
        let api = ApiClient::new(transport, Arc::new(MemoryTokenStore::new()), "http://b/api", 0);
        TransactionService::new(api, PaginationConfig::default())
    }

    fn draft() -> TransactionDraft {
        TransactionDraft {
            description: "Coffee".to_string(),
            amount: "4.5".parse().unwrap(),
            date: NaiveDate::from_ymd_opt(2024, 2, 3).unwrap(),
            transaction_type: TransactionType::Expense,
            category_id: Some(2),
        }
    }

    #[tokio::test]
    async fn test_fetch_page_uses_selected_endpoint() {
        let body = r#"{"content": [{"id": 1, "description": "Salary", "amount": 10,
            "date": "2024-01-05T00:00:00", "type": "INCOME", "categoryId": 1}],
            "totalPages": 3, "totalElements": 21, "number": 1}"#;
        let transport = Arc::new(RecordingTransport::new().respond(200, body));
        let service = service(transport.clone());
        let filter = FilterState {
            transaction_type: TypeFilter::Income,
            ..FilterState::default()
        };

        let page = service.fetch_page(&filter, &service.page_request(1)).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page_number, 1);
        assert_eq!(
            transport.requests()[0].url,
            "http://b/api/transactions/type/INCOME?pageNo=1&pageSize=10&sortBy=date&sortDir=desc"
        );
    }

    #[tokio::test]
    async fn test_fetch_all_walks_pages() {
        let tx = r#"{"amount": 1, "date": "2024-01-01", "type": "EXPENSE", "categoryId": 1}"#;
        let first = format!(r#"{{"content": [{tx}], "totalPages": 2, "totalElements": 2, "number": 0}}"#);
        let second = format!(r#"{{"content": [{tx}], "totalPages": 2, "totalElements": 2, "number": 1}}"#);
        let transport = Arc::new(RecordingTransport::new().respond(200, &first).respond(200, &second));
        let all = service(transport.clone()).fetch_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(transport.requests().len(), 2);
        assert!(transport.requests()[1].url.contains("pageNo=1"));
    }

    #[tokio::test]
    async fn test_fetch_all_ignores_echoed_page_number() {
        let tx = r#"{"amount": 1, "date": "2024-01-01", "type": "EXPENSE", "categoryId": 1}"#;
        let stuck = format!(r#"{{"content": [{tx}], "totalPages": 2, "totalElements": 2, "number": 0}}"#);
        let transport = Arc::new(
            RecordingTransport::new()
                .respond(200, &stuck)
                .respond(200, &stuck)
                .respond(200, &stuck),
        );
        let all = service(transport.clone()).fetch_all().await.unwrap();

        assert_eq!(all.len(), 2);
        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].url.contains("pageNo=0"));
        assert!(requests[1].url.contains("pageNo=1"));
    }

    #[tokio::test]
    async fn test_create_sends_wire_format() {
        let reply = r#"{"id": 9, "description": "Coffee", "amount": 4.5,
            "date": "2024-02-03T00:00:00", "type": "EXPENSE", "categoryId": 2}"#;
        let transport = Arc::new(RecordingTransport::new().respond(201, reply));
        let created = service(transport.clone()).create(&draft()).await.unwrap();
        assert_eq!(created.id, Some(9));

        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::Post);
        let body: serde_json::Value = serde_json::from_slice(request.body.as_ref().unwrap()).unwrap();
        assert_eq!(body["date"], "2024-02-03T00:00:00");
        assert_eq!(body["amount"], 4.5);
    }

    #[tokio::test]
    async fn test_invalid_draft_is_not_sent() {
        let transport = Arc::new(RecordingTransport::new());
        let mut invalid = draft();
        invalid.amount = "-1".parse().unwrap();
        let result = service(transport.clone()).update(3, &invalid).await;
        assert!(matches!(result, Err(ClientError::Validation(_))));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_delete_path() {
        let transport = Arc::new(RecordingTransport::new().respond(204, ""));
        service(transport.clone()).delete(4).await.unwrap();
        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::Delete);
        assert_eq!(request.url, "http://b/api/transactions/4");
    }
}
