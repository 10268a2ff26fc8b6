//! Category CRUD and the cached lookup list

use std::sync::Arc;

use moneyweb_config::SortDirection;
use moneyweb_core::category::CategoryIndex;
use moneyweb_core::models::{Category, CategoryDraft, EntityId};
use moneyweb_core::page::{PageRequest, PageResult};

use super::LOOKUP_PAGE_SIZE;
use crate::api::{with_query, ApiClient};
use crate::cache::ResourceCache;
use crate::error::ClientResult;
use crate::transport::Method;

pub const CATEGORIES_PATH: &str = "/categories";

#[derive(Clone)]
pub struct CategoryService {
    api: ApiClient,
    cache: Arc<ResourceCache<Vec<Category>>>,
}

impl CategoryService {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            cache: Arc::new(ResourceCache::new("categories")),
        }
    }

    /// A page of categories sorted by name
    pub async fn list_page(&self, page_number: u32, page_size: u32) -> ClientResult<PageResult<Category>> {
        let page = PageRequest::new(page_number, page_size, "name", SortDirection::Asc);
        self.api
            .get_page(&with_query(CATEGORIES_PATH, &page.query_pairs()), page_number)
            .await
    }

    /// Every category, served from cache until the next mutation
    pub async fn all(&self) -> ClientResult<Arc<Vec<Category>>> {
        self.cache
            .get_or_fetch(|| async move {
                let page = self.list_page(0, LOOKUP_PAGE_SIZE).await?;
                Ok(page.items)
            })
            .await
    }

    pub async fn index(&self) -> ClientResult<CategoryIndex> {
        Ok(CategoryIndex::new(&self.all().await?))
    }

    pub async fn get(&self, id: EntityId) -> ClientResult<Category> {
        self.api
            .get_json(&format!("{}/{}", CATEGORIES_PATH, id))
            .await
    }

    pub async fn create(&self, draft: &CategoryDraft) -> ClientResult<Category> {
        draft.validate()?;
        let created = self
            .api
            .send_json(Method::Post, CATEGORIES_PATH, draft)
            .await?;
        self.cache.invalidate().await;
        Ok(created)
    }

    pub async fn update(&self, id: EntityId, draft: &CategoryDraft) -> ClientResult<Category> {
        draft.validate()?;
        let updated = self
            .api
            .send_json(Method::Put, &format!("{}/{}", CATEGORIES_PATH, id), draft)
            .await?;
        self.cache.invalidate().await;
        Ok(updated)
    }

    pub async fn delete(&self, id: EntityId) -> ClientResult<()> {
        self.api
            .delete(&format!("{}/{}", CATEGORIES_PATH, id))
            .await?;
        self.cache.invalidate().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryTokenStore;
    use crate::error::ClientError;
    use crate::transport::test_support::RecordingTransport;

    fn service(transport: Arc<RecordingTransport>) -> CategoryService {
        CategoryService::new(ApiClient::new(
            transport,
            Arc::new(MemoryTokenStore::new()),
            "http://b/api",
            0,
        ))
    }

    #[tokio::test]
    async fn test_lookup_is_cached_until_mutation() {
        let transport = Arc::new(
            RecordingTransport::new()
                .respond(200, r#"[{"id": 1, "name": "Food"}]"#)
                .respond(201, r#"{"id": 2, "name": "Rent"}"#)
                .respond(200, r#"[{"id": 1, "name": "Food"}, {"id": 2, "name": "Rent"}]"#),
        );
        let service = service(transport.clone());

        assert_eq!(service.all().await.unwrap().len(), 1);
        assert_eq!(service.all().await.unwrap().len(), 1);
        assert_eq!(transport.requests().len(), 1);
        assert_eq!(
            transport.requests()[0].url,
            "http://b/api/categories?pageNo=0&pageSize=1000&sortBy=name&sortDir=asc"
        );

        let draft = CategoryDraft { name: "Rent".to_string(), description: None };
        service.create(&draft).await.unwrap();

        let index = service.index().await.unwrap();
        assert_eq!(index.name_of(2), Some("Rent"));
        assert_eq!(transport.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_failed_mutation_keeps_cache() {
        let transport = Arc::new(
            RecordingTransport::new()
                .respond(200, r#"[{"id": 1, "name": "Food"}]"#)
                .respond(409, "Category in use"),
        );
        let service = service(transport.clone());
        service.all().await.unwrap();

        let result = service.delete(1).await;
        assert!(matches!(result, Err(ClientError::Http { status: 409, .. })));
        service.all().await.unwrap();
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_blank_name_rejected_locally() {
        let transport = Arc::new(RecordingTransport::new());
        let draft = CategoryDraft { name: " ".to_string(), description: None };
        let result = service(transport.clone()).create(&draft).await;
        assert!(matches!(result, Err(ClientError::Validation(_))));
        assert!(transport.requests().is_empty());
    }
}
