//! Transactions HTMX endpoints
//!
//! Endpoints:
//! - htmx_transactions_list: One page of the filtered list
//! - htmx_transactions_filter: Submit the filter form
//! - htmx_transactions_filter_clear: Reset all filters
//! - htmx_transaction_form / htmx_transaction_edit_form: Modal forms
//! - htmx_transaction_store / htmx_transaction_update / htmx_transaction_delete: Mutations

use std::str::FromStr;

use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use moneyweb_client::Fetched;
use moneyweb_core::category::CategoryIndex;
use moneyweb_core::error::CoreError;
use moneyweb_core::filter::{apply_filter, reset_filter, FilterEdit, FilterState};
use moneyweb_core::models::{EntityId, Transaction, TransactionDraft, TransactionType};
use moneyweb_core::page::PageResult;
use moneyweb_core::time;
use moneyweb_core::url::{read_filters_from_url, SyncAction, UrlSync};
use serde::Deserialize;

use super::page::{filter_query, render_form, render_list, render_panel};
use super::{CHANGED_EVENT, TRANSACTIONS_PAGE};
use crate::error::ApiResult;
use crate::routes::{page_param, parse_amount};
use crate::{current_location, mutation_response, no_swap, view_id, AppState, ListKind, HX_PUSH_URL};

/// Fetch a page of `filters` together with the category lookup, under the
/// generation ticket of the list in the requesting tab
async fn fetch_list(
    state: &AppState,
    headers: &HeaderMap,
    filters: &FilterState,
    page: u32,
) -> ApiResult<Fetched<(PageResult<Transaction>, CategoryIndex)>> {
    let transactions = &state.client.transactions;
    let request = transactions.page_request(page);
    let fetched = state
        .fetches
        .coordinator(view_id(headers), ListKind::Transactions)
        .run(async {
            tokio::try_join!(
                transactions.fetch_page(filters, &request),
                state.client.categories.index()
            )
        })
        .await?;
    Ok(fetched)
}

/// HTMX: One page of the list for the filters in the query string
pub async fn htmx_transactions_list(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> ApiResult<Response> {
    let search = query.unwrap_or_default();
    let filters = read_filters_from_url(&search).reduced();
    let page = page_param(&search);

    match fetch_list(&state, &headers, &filters, page).await? {
        Fetched::Current((result, index)) => {
            Ok(Html(render_list(&state, &result, &index, &filter_query(&filters))).into_response())
        }
        Fetched::Superseded => Ok(no_swap()),
    }
}

/// Submit the filters: reduce, push the new URL, then fetch the first page
async fn submit_filters(state: &AppState, headers: &HeaderMap, submitted: FilterState) -> ApiResult<Response> {
    let (path, search) = current_location(headers)
        .unwrap_or_else(|| (TRANSACTIONS_PAGE.to_string(), String::new()));
    let mut sync = UrlSync::from_location(&path, &search);

    let reduced = apply_filter(sync.state(), FilterEdit::replace_with(&submitted));
    let url = match sync.submit(&reduced) {
        SyncAction::Push(url) => url,
        SyncAction::Unchanged => {
            log::debug!("Filters unchanged, nothing to fetch");
            return Ok((StatusCode::NO_CONTENT, [(crate::HX_RESWAP, "none")]).into_response());
        }
    };
    log::debug!("Pushing {}", url);

    let categories = state.client.categories.all().await?;
    match fetch_list(state, headers, &reduced, 0).await? {
        Fetched::Current((result, index)) => {
            let list = render_list(state, &result, &index, &filter_query(&reduced));
            let panel = render_panel(&reduced, &categories, &index, Some(&list));
            Ok(([(HX_PUSH_URL, url)], Html(panel)).into_response())
        }
        Fetched::Superseded => Ok(no_swap()),
    }
}

/// HTMX: Apply the filter form
pub async fn htmx_transactions_filter(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> ApiResult<Response> {
    let submitted = read_filters_from_url(query.as_deref().unwrap_or(""));
    submit_filters(&state, &headers, submitted).await
}

/// HTMX: Clear every filter
pub async fn htmx_transactions_filter_clear(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    submit_filters(&state, &headers, reset_filter()).await
}

/// Fields of the create/edit form
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub date: String,
    #[serde(rename = "type", default)]
    pub transaction_type: String,
    #[serde(rename = "categoryId", default)]
    pub category_id: String,
}

impl TransactionForm {
    pub fn into_draft(self) -> Result<TransactionDraft, CoreError> {
        let amount = parse_amount("amount", &self.amount, "Amount")?;
        let date = time::parse_url_date(&self.date)
            .ok_or_else(|| CoreError::validation("date", "Date is required"))?;
        let transaction_type = TransactionType::from_str(&self.transaction_type)
            .map_err(|_| CoreError::validation("type", "Type must be Income or Expense"))?;
        let category_id = match self.category_id.trim() {
            "" => None,
            raw => Some(
                raw.parse::<EntityId>()
                    .map_err(|_| CoreError::validation("categoryId", "Category is invalid"))?,
            ),
        };
        let draft = TransactionDraft {
            description: self.description.trim().to_string(),
            amount,
            date,
            transaction_type,
            category_id,
        };
        draft.validate()?;
        Ok(draft)
    }
}

/// HTMX: Empty create form
pub async fn htmx_transaction_form(State(state): State<AppState>) -> ApiResult<Html<String>> {
    let categories = state.client.categories.all().await?;
    Ok(Html(render_form(None, None, &categories)))
}

/// HTMX: Edit form prefilled from the backend
pub async fn htmx_transaction_edit_form(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> ApiResult<Html<String>> {
    let (transaction, categories) = tokio::try_join!(
        state.client.transactions.get(id),
        state.client.categories.all()
    )?;
    let draft = TransactionDraft::from_transaction(&transaction);
    Ok(Html(render_form(Some(&draft), Some(id), &categories)))
}

/// HTMX: Create a transaction
pub async fn htmx_transaction_store(
    State(state): State<AppState>,
    Form(form): Form<TransactionForm>,
) -> ApiResult<Response> {
    let draft = form.into_draft()?;
    state.client.transactions.create(&draft).await?;
    log::info!("Created transaction '{}'", draft.description);
    Ok(mutation_response(&state, "Transaction created", CHANGED_EVENT))
}

/// HTMX: Update a transaction
pub async fn htmx_transaction_update(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    Form(form): Form<TransactionForm>,
) -> ApiResult<Response> {
    let draft = form.into_draft()?;
    state.client.transactions.update(id, &draft).await?;
    log::info!("Updated transaction {}", id);
    Ok(mutation_response(&state, "Transaction updated", CHANGED_EVENT))
}

/// HTMX: Delete a transaction
pub async fn htmx_transaction_delete(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> ApiResult<Response> {
    state.client.transactions.delete(id).await?;
    log::info!("Deleted transaction {}", id);
    Ok(mutation_response(&state, "Transaction deleted", CHANGED_EVENT))
}
