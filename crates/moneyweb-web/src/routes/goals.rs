//! Goal routes - goal cards with progress, CRUD forms

use axum::extract::{Path, RawQuery, State};
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use chrono::NaiveDateTime;
use moneyweb_client::Fetched;
use moneyweb_core::error::CoreError;
use moneyweb_core::goal::{self, ProgressTier, Urgency};
use moneyweb_core::models::{EntityId, Goal, GoalDraft};
use moneyweb_core::time;
use moneyweb_utils::escape_html;
use serde::Deserialize;

use crate::error::ApiResult;
use crate::routes::{optional_text, page_param, parse_amount};
use crate::{modal, mutation_response, no_swap, pagination_controls, view_id, AppState, ListKind, MODAL_ID};

const LIST_ID: &str = "goals-list";
const CHANGED_EVENT: &str = "goals-changed";

/// Goals page
pub async fn page_goals(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Html<String> {
    let inner_content = format!(
        r#"<div class='flex items-center justify-between mb-4'>
            <h2 class='text-2xl font-bold'>Goals</h2>
            <button hx-get='/goals/form' hx-target='#{}'
                class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>+ New goal</button>
        </div>
        <div id='{}' hx-get='/goals/list' hx-trigger='load, {} from:body' hx-sync='this:replace'>
            <p class='text-gray-500 text-center'>Loading...</p>
        </div>"#,
        MODAL_ID, LIST_ID, CHANGED_EVENT
    );
    crate::page_response(&state, &headers, "Goals", "/goals", &inner_content).await
}

/// HTMX: One page of goal cards
pub async fn htmx_goals_list(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> ApiResult<Response> {
    let page = page_param(query.as_deref().unwrap_or(""));
    let page_size = state.config.pagination.page_size;
    let fetched = state
        .fetches
        .coordinator(view_id(&headers), ListKind::Goals)
        .run(state.client.goals.list_page(page, page_size))
        .await?;
    let result = match fetched {
        Fetched::Current(result) => result,
        Fetched::Superseded => return Ok(no_swap()),
    };
    if result.is_empty() {
        return Ok(Html("<div class='text-center py-12 text-gray-500 bg-white rounded-xl'><p>No goals yet</p></div>".to_string()).into_response());
    }

    let now = chrono::Local::now().naive_local();
    let mut html = String::from("<div class='grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-4'>");
    for goal in &result.items {
        html.push_str(&render_card(&state, goal, now));
    }
    html.push_str("</div>");
    html.push_str(&pagination_controls(
        "/goals/list",
        "",
        result.page_number,
        result.total_pages,
        &format!("#{}", LIST_ID),
    ));
    Ok(Html(html).into_response())
}

/// Goal card: progress bar, amounts and time left
pub fn render_card(state: &AppState, goal: &Goal, now: NaiveDateTime) -> String {
    let percent = goal::progress_percent(goal);
    let tier = ProgressTier::for_percent(percent);
    let urgency = Urgency::of(goal, now);

    let to_go = match goal::amount_to_go(goal) {
        Some(amount) => format!("<span>{} to go</span>", state.money(amount)),
        None => "<span class='text-green-600 font-medium'>Goal reached!</span>".to_string(),
    };
    let actions = match goal.id {
        Some(id) => format!(
            r#"<button hx-get='/goals/{id}/form' hx-target='#{modal}' class='text-indigo-600 hover:underline mr-2'>Edit</button><button hx-delete='/goals/{id}' hx-confirm='Delete this goal?' hx-swap='none' class='text-red-600 hover:underline'>Delete</button>"#,
            id = id,
            modal = MODAL_ID
        ),
        None => String::new(),
    };
    let description = goal
        .description
        .as_deref()
        .map(|d| format!("<p class='text-sm text-gray-500 mb-3'>{}</p>", escape_html(d)))
        .unwrap_or_default();

    format!(
        r#"<div class='bg-white rounded-xl shadow-sm p-5'>
    <div class='flex justify-between items-start mb-2'>
        <h3 class='font-semibold'>{name}</h3>
        <span class='text-sm {urgency_class}'>{urgency}</span>
    </div>
    {description}
    <div class='h-3 bg-gray-100 rounded-full mb-2'><div class='h-3 rounded-full {tier}' style='width: {width}%'></div></div>
    <div class='flex justify-between text-sm text-gray-600 mb-1'>
        <span>{current} of {target}</span><span class='font-medium'>{label}</span>
    </div>
    <div class='flex justify-between text-xs text-gray-500'>{to_go}<span>Target date {date}</span></div>
    <div class='mt-3 text-sm text-right'>{actions}</div>
</div>"#,
        name = escape_html(&goal.name),
        urgency_class = urgency.css_class(),
        urgency = urgency.label(),
        description = description,
        tier = tier.css_class(),
        width = percent.round(),
        current = state.money(goal.current_amount),
        target = state.money(goal.target_amount),
        label = goal::progress_label(goal),
        to_go = to_go,
        date = time::format_url_date(goal.target_date),
        actions = actions,
    )
}

/// Create or edit form inside the modal
pub fn render_form(draft: Option<&GoalDraft>, id: Option<EntityId>) -> String {
    let action = match id {
        Some(id) => format!("/goals/{}", id),
        None => "/goals".to_string(),
    };
    let name = draft.map(|d| escape_html(&d.name)).unwrap_or_default();
    let description = draft
        .and_then(|d| d.description.as_deref())
        .map(escape_html)
        .unwrap_or_default();
    let target_amount = draft.map(|d| d.target_amount.to_string()).unwrap_or_default();
    let current_amount = draft
        .map(|d| d.current_amount.to_string())
        .unwrap_or_else(|| "0".to_string());
    let target_date = draft
        .and_then(|d| d.target_date)
        .map(time::format_url_date)
        .unwrap_or_default();

    let body = format!(
        r#"<form hx-post='{action}' hx-target='#{modal}' class='space-y-3'>
    <label class='block text-sm text-gray-600'>Name
        <input type='text' name='name' value='{name}' class='mt-1 w-full px-3 py-2 border rounded-lg'></label>
    <label class='block text-sm text-gray-600'>Description
        <textarea name='description' rows='2' class='mt-1 w-full px-3 py-2 border rounded-lg'>{description}</textarea></label>
    <div class='grid grid-cols-2 gap-3'>
        <label class='block text-sm text-gray-600'>Target amount
            <input type='text' inputmode='decimal' name='targetAmount' value='{target_amount}' class='mt-1 w-full px-3 py-2 border rounded-lg'></label>
        <label class='block text-sm text-gray-600'>Saved so far
            <input type='text' inputmode='decimal' name='currentAmount' value='{current_amount}' class='mt-1 w-full px-3 py-2 border rounded-lg'></label>
    </div>
    <label class='block text-sm text-gray-600'>Target date
        <input type='date' name='targetDate' value='{target_date}' class='mt-1 w-full px-3 py-2 border rounded-lg'></label>
    <div class='flex justify-end gap-2 pt-2'>
        <button type='button' onclick="document.getElementById('{modal}').innerHTML = ''" class='px-4 py-2 bg-gray-100 rounded-lg'>Cancel</button>
        <button type='submit' class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>Save</button>
    </div>
</form>"#,
        action = action,
        modal = MODAL_ID,
        name = name,
        description = description,
        target_amount = target_amount,
        current_amount = current_amount,
        target_date = target_date,
    );
    let title = if id.is_some() { "Edit goal" } else { "New goal" };
    modal(title, &body)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub target_amount: String,
    #[serde(default)]
    pub current_amount: String,
    #[serde(default)]
    pub target_date: String,
}

impl GoalForm {
    pub fn into_draft(self) -> Result<GoalDraft, CoreError> {
        let current_amount = if self.current_amount.trim().is_empty() {
            rust_decimal::Decimal::ZERO
        } else {
            parse_amount("currentAmount", &self.current_amount, "Current amount")?
        };
        let draft = GoalDraft {
            name: self.name.trim().to_string(),
            description: optional_text(self.description),
            target_amount: parse_amount("targetAmount", &self.target_amount, "Target amount")?,
            current_amount,
            target_date: time::parse_url_date(&self.target_date),
        };
        draft.validate()?;
        Ok(draft)
    }
}

/// HTMX: Empty create form
pub async fn htmx_goal_form() -> Html<String> {
    Html(render_form(None, None))
}

/// HTMX: Edit form prefilled from the backend
pub async fn htmx_goal_edit_form(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> ApiResult<Html<String>> {
    let goal = state.client.goals.get(id).await?;
    Ok(Html(render_form(Some(&GoalDraft::from_goal(&goal)), Some(id))))
}

/// HTMX: Create a goal
pub async fn htmx_goal_store(
    State(state): State<AppState>,
    Form(form): Form<GoalForm>,
) -> ApiResult<Response> {
    let draft = form.into_draft()?;
    state.client.goals.create(&draft).await?;
    log::info!("Created goal '{}'", draft.name);
    Ok(mutation_response(&state, "Goal created", CHANGED_EVENT))
}

/// HTMX: Update a goal
pub async fn htmx_goal_update(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    Form(form): Form<GoalForm>,
) -> ApiResult<Response> {
    let draft = form.into_draft()?;
    state.client.goals.update(id, &draft).await?;
    log::info!("Updated goal {}", id);
    Ok(mutation_response(&state, "Goal updated", CHANGED_EVENT))
}

/// HTMX: Delete a goal
pub async fn htmx_goal_delete(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> ApiResult<Response> {
    state.client.goals.delete(id).await?;
    log::info!("Deleted goal {}", id);
    Ok(mutation_response(&state, "Goal deleted", CHANGED_EVENT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_requires_target_date() {
        let form = GoalForm {
            name: "Trip".to_string(),
            description: None,
            target_amount: "1000".to_string(),
            current_amount: String::new(),
            target_date: String::new(),
        };
        let error = form.into_draft().unwrap_err();
        assert_eq!(error.field(), Some("targetDate"));
    }

    #[test]
    fn test_form_defaults_current_amount() {
        let form = GoalForm {
            name: "Trip".to_string(),
            description: Some("Lisbon".to_string()),
            target_amount: "1000".to_string(),
            current_amount: " ".to_string(),
            target_date: "2030-05-01".to_string(),
        };
        let draft = form.into_draft().unwrap();
        assert_eq!(draft.current_amount, rust_decimal::Decimal::ZERO);
        assert_eq!(draft.description.as_deref(), Some("Lisbon"));
    }
}
