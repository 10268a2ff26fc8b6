//! Category routes - list, pagination and CRUD forms

use axum::extract::{Path, RawQuery, State};
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use moneyweb_client::Fetched;
use moneyweb_core::models::{Category, CategoryDraft, EntityId};
use moneyweb_utils::escape_html;
use serde::Deserialize;

use crate::error::ApiResult;
use crate::routes::{optional_text, page_param};
use crate::{modal, mutation_response, no_swap, pagination_controls, view_id, AppState, ListKind, MODAL_ID};

const LIST_ID: &str = "categories-list";
const CHANGED_EVENT: &str = "categories-changed";

/// Categories page
pub async fn page_categories(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Html<String> {
    let inner_content = format!(
        r#"<div class='flex items-center justify-between mb-4'>
            <h2 class='text-2xl font-bold'>Categories</h2>
            <button hx-get='/categories/form' hx-target='#{}'
                class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>+ New category</button>
        </div>
        <div id='{}' hx-get='/categories/list' hx-trigger='load, {} from:body' hx-sync='this:replace'
            class='bg-white rounded-xl shadow-sm p-6'>
            <p class='text-gray-500 text-center'>Loading...</p>
        </div>"#,
        MODAL_ID, LIST_ID, CHANGED_EVENT
    );
    crate::page_response(&state, &headers, "Categories", "/categories", &inner_content).await
}

/// HTMX: One page of categories
pub async fn htmx_categories_list(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> ApiResult<Response> {
    let page = page_param(query.as_deref().unwrap_or(""));
    let page_size = state.config.pagination.page_size;
    let fetched = state
        .fetches
        .coordinator(view_id(&headers), ListKind::Categories)
        .run(state.client.categories.list_page(page, page_size))
        .await?;
    let result = match fetched {
        Fetched::Current(result) => result,
        Fetched::Superseded => return Ok(no_swap()),
    };
    if result.is_empty() {
        return Ok(Html("<div class='text-center py-12 text-gray-500'><p>No categories yet</p></div>".to_string()).into_response());
    }

    let mut html = String::from("<ul class='divide-y'>");
    for category in &result.items {
        html.push_str(&render_row(category));
    }
    html.push_str("</ul>");
    html.push_str(&pagination_controls(
        "/categories/list",
        "",
        result.page_number,
        result.total_pages,
        &format!("#{}", LIST_ID),
    ));
    Ok(Html(html).into_response())
}

fn render_row(category: &Category) -> String {
    let actions = match category.id {
        Some(id) => format!(
            r#"<button hx-get='/categories/{id}/form' hx-target='#{modal}' class='text-indigo-600 hover:underline mr-2'>Edit</button><button hx-delete='/categories/{id}' hx-confirm='Delete this category?' hx-swap='none' class='text-red-600 hover:underline'>Delete</button>"#,
            id = id,
            modal = MODAL_ID
        ),
        None => String::new(),
    };
    let description = category
        .description
        .as_deref()
        .map(|d| format!("<p class='text-sm text-gray-500'>{}</p>", escape_html(d)))
        .unwrap_or_default();
    format!(
        "<li class='flex justify-between items-center py-3'><div><p class='font-medium'>{}</p>{}</div><div class='text-sm'>{}</div></li>",
        escape_html(&category.name),
        description,
        actions
    )
}

/// Create or edit form inside the modal
pub fn render_form(draft: Option<&CategoryDraft>, id: Option<EntityId>) -> String {
    let action = match id {
        Some(id) => format!("/categories/{}", id),
        None => "/categories".to_string(),
    };
    let name = draft.map(|d| escape_html(&d.name)).unwrap_or_default();
    let description = draft
        .and_then(|d| d.description.as_deref())
        .map(escape_html)
        .unwrap_or_default();
    let body = format!(
        r#"<form hx-post='{action}' hx-target='#{modal}' class='space-y-3'>
    <label class='block text-sm text-gray-600'>Name
        <input type='text' name='name' value='{name}' maxlength='50' class='mt-1 w-full px-3 py-2 border rounded-lg'></label>
    <label class='block text-sm text-gray-600'>Description
        <textarea name='description' rows='3' class='mt-1 w-full px-3 py-2 border rounded-lg'>{description}</textarea></label>
    <div class='flex justify-end gap-2 pt-2'>
        <button type='button' onclick="document.getElementById('{modal}').innerHTML = ''" class='px-4 py-2 bg-gray-100 rounded-lg'>Cancel</button>
        <button type='submit' class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>Save</button>
    </div>
</form>"#,
        action = action,
        modal = MODAL_ID,
        name = name,
        description = description,
    );
    let title = if id.is_some() { "Edit category" } else { "New category" };
    modal(title, &body)
}

#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl CategoryForm {
    pub fn into_draft(self) -> CategoryDraft {
        CategoryDraft {
            name: self.name.trim().to_string(),
            description: optional_text(self.description),
        }
    }
}

/// HTMX: Empty create form
pub async fn htmx_category_form() -> Html<String> {
    Html(render_form(None, None))
}

/// HTMX: Edit form prefilled from the backend
pub async fn htmx_category_edit_form(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> ApiResult<Html<String>> {
    let category = state.client.categories.get(id).await?;
    let draft = CategoryDraft {
        name: category.name,
        description: category.description,
    };
    Ok(Html(render_form(Some(&draft), Some(id))))
}

/// HTMX: Create a category
pub async fn htmx_category_store(
    State(state): State<AppState>,
    Form(form): Form<CategoryForm>,
) -> ApiResult<Response> {
    let draft = form.into_draft();
    state.client.categories.create(&draft).await?;
    log::info!("Created category '{}'", draft.name);
    Ok(mutation_response(&state, "Category created", CHANGED_EVENT))
}

/// HTMX: Update a category
pub async fn htmx_category_update(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    Form(form): Form<CategoryForm>,
) -> ApiResult<Response> {
    state.client.categories.update(id, &form.into_draft()).await?;
    log::info!("Updated category {}", id);
    Ok(mutation_response(&state, "Category updated", CHANGED_EVENT))
}

/// HTMX: Delete a category
pub async fn htmx_category_delete(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> ApiResult<Response> {
    state.client.categories.delete(id).await?;
    log::info!("Deleted category {}", id);
    Ok(mutation_response(&state, "Category deleted", CHANGED_EVENT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_trims_and_drops_blank_description() {
        let draft = CategoryForm { name: " Food ".to_string(), description: Some(" ".to_string()) }.into_draft();
        assert_eq!(draft.name, "Food");
        assert_eq!(draft.description, None);
    }

    #[test]
    fn test_row_without_id_has_no_actions() {
        let html = render_row(&Category { id: None, name: "<Misc>".to_string(), description: None });
        assert!(html.contains("&lt;Misc&gt;"));
        assert!(!html.contains("hx-delete"));
    }
}
