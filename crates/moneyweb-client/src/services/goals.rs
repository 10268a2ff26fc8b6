//! Savings goal CRUD

use moneyweb_config::SortDirection;
use moneyweb_core::models::{EntityId, Goal, GoalDraft};
use moneyweb_core::page::{PageRequest, PageResult};

use super::LOOKUP_PAGE_SIZE;
use crate::api::{with_query, ApiClient};
use crate::error::ClientResult;
use crate::transport::Method;

pub const GOALS_PATH: &str = "/goals";

#[derive(Clone)]
pub struct GoalService {
    api: ApiClient,
}

impl GoalService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// A page of goals, nearest target date first
    pub async fn list_page(&self, page_number: u32, page_size: u32) -> ClientResult<PageResult<Goal>> {
        let page = PageRequest::new(page_number, page_size, "targetDate", SortDirection::Asc);
        self.api
            .get_page(&with_query(GOALS_PATH, &page.query_pairs()), page_number)
            .await
    }

    pub async fn all(&self) -> ClientResult<Vec<Goal>> {
        Ok(self.list_page(0, LOOKUP_PAGE_SIZE).await?.items)
    }

    pub async fn get(&self, id: EntityId) -> ClientResult<Goal> {
        self.api.get_json(&format!("{}/{}", GOALS_PATH, id)).await
    }

    pub async fn create(&self, draft: &GoalDraft) -> ClientResult<Goal> {
        draft.validate()?;
        self.api.send_json(Method::Post, GOALS_PATH, draft).await
    }

    pub async fn update(&self, id: EntityId, draft: &GoalDraft) -> ClientResult<Goal> {
        draft.validate()?;
        self.api
            .send_json(Method::Put, &format!("{}/{}", GOALS_PATH, id), draft)
            .await
    }

    pub async fn delete(&self, id: EntityId) -> ClientResult<()> {
        self.api.delete(&format!("{}/{}", GOALS_PATH, id)).await
    }
}
