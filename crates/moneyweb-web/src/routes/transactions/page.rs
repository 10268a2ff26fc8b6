//! Transactions page rendering
//!
//! Endpoints:
//! - page_transactions: Main page, filters read from the address bar
//!
//! Helper functions:
//! - render_panel: Filter form, active filter chips and list container
//! - render_list: Transaction table with pagination
//! - render_form: Create/edit modal

use axum::extract::{RawQuery, State};
use axum::http::HeaderMap;
use axum::response::Html;
use moneyweb_core::category::CategoryIndex;
use moneyweb_core::filter::FilterState;
use moneyweb_core::models::{Category, Transaction, TransactionDraft, TransactionType, TypeFilter};
use moneyweb_core::page::PageResult;
use moneyweb_core::time;
use moneyweb_core::url::{write_filters_to_url, UrlSync};
use moneyweb_utils::escape_html;

use super::{CHANGED_EVENT, LIST_ID, PANEL_ID, TRANSACTIONS_PAGE};
use crate::error::ApiResult;
use crate::routes::selected;
use crate::{modal, pagination_controls, AppState, MODAL_ID};

/// Transactions page - filter state comes from the query string
pub async fn page_transactions(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> ApiResult<Html<String>> {
    let sync = UrlSync::from_location(TRANSACTIONS_PAGE, query.as_deref().unwrap_or(""));
    // a shared link may name several families; only the winning one applies
    let filters = sync.state().reduced();
    let categories = state.client.categories.all().await?;
    let index = CategoryIndex::new(&categories);

    let inner_content = format!(
        r#"<div class='flex items-center justify-between mb-4'>
            <h2 class='text-2xl font-bold'>Transactions</h2>
            <button hx-get='/transactions/form' hx-target='#{}'
                class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>+ New transaction</button>
        </div>
        {}"#,
        MODAL_ID,
        render_panel(&filters, &categories, &index, None)
    );

    Ok(crate::page_response(&state, &headers, "Transactions", TRANSACTIONS_PAGE, &inner_content).await)
}

/// Query string of the list request for `filters`, without `page`
pub fn filter_query(filters: &FilterState) -> String {
    write_filters_to_url("", "", filters)
        .trim_start_matches('?')
        .to_string()
}

/// Filter form, chips and list container.
///
/// Without `list_html` the container loads itself on render.
pub fn render_panel(filters: &FilterState, categories: &[Category], index: &CategoryIndex, list_html: Option<&str>) -> String {
    let category_options: String = categories
        .iter()
        .filter_map(|c| c.id.map(|id| (id, &c.name)))
        .map(|(id, name)| {
            format!(
                "<option value='{}' {}>{}</option>",
                id,
                selected(filters.category_id == Some(id)),
                escape_html(name)
            )
        })
        .collect();

    let chips: String = filters
        .chips(index)
        .into_iter()
        .map(|chip| {
            format!(
                "<span data-chip='{}' class='px-2 py-1 text-xs rounded-full bg-indigo-100 text-indigo-700'>{}</span>",
                chip.key,
                escape_html(&chip.label)
            )
        })
        .collect();
    let chips_row = if filters.has_active_filters() {
        format!("<div class='flex flex-wrap gap-2 mb-4'>{}</div>", chips)
    } else {
        String::new()
    };

    let date_value = |date: Option<chrono::NaiveDate>| date.map(time::format_url_date).unwrap_or_default();
    let (trigger, content) = match list_html {
        Some(html) => (format!("{} from:body", CHANGED_EVENT), html.to_string()),
        None => (
            format!("load, {} from:body", CHANGED_EVENT),
            "<p class='text-gray-500 text-center'>Loading...</p>".to_string(),
        ),
    };

    format!(
        r#"<div id='{panel}'>
    <form hx-get='/transactions/filter' hx-target='#{panel}' hx-swap='outerHTML' hx-sync='#{list}:replace'
        class='bg-white rounded-xl shadow-sm p-4 mb-4 grid grid-cols-1 md:grid-cols-5 gap-3 items-end'>
        <label class='text-sm text-gray-600'>From
            <input type='date' name='startDate' value='{start}' class='mt-1 w-full px-3 py-2 border rounded-lg'></label>
        <label class='text-sm text-gray-600'>To
            <input type='date' name='endDate' value='{end}' class='mt-1 w-full px-3 py-2 border rounded-lg'></label>
        <label class='text-sm text-gray-600'>Type
            <select name='type' class='mt-1 w-full px-3 py-2 border rounded-lg'>
                <option value='ALL' {all}>All</option>
                <option value='INCOME' {income}>Income</option>
                <option value='EXPENSE' {expense}>Expense</option>
            </select></label>
        <label class='text-sm text-gray-600'>Category
            <select name='categoryId' class='mt-1 w-full px-3 py-2 border rounded-lg'>
                <option value=''>All categories</option>{options}
            </select></label>
        <div class='flex gap-2'>
            <button type='submit' class='flex-1 px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>Apply</button>
            <button type='button' hx-get='/transactions/filter/clear' hx-target='#{panel}' hx-swap='outerHTML' hx-sync='#{list}:replace'
                class='px-4 py-2 bg-gray-100 text-gray-700 rounded-lg hover:bg-gray-200'>Clear</button>
        </div>
    </form>
    {chips}
    <div id='{list}' hx-get='/transactions/list?{query}' hx-trigger='{trigger}' hx-sync='this:replace'
        class='bg-white rounded-xl shadow-sm p-6'>{content}</div>
</div>"#,
        panel = PANEL_ID,
        list = LIST_ID,
        start = date_value(filters.start_date),
        end = date_value(filters.end_date),
        all = selected(filters.transaction_type == TypeFilter::All),
        income = selected(filters.transaction_type == TypeFilter::Income),
        expense = selected(filters.transaction_type == TypeFilter::Expense),
        options = category_options,
        chips = chips_row,
        query = escape_html(&filter_query(&filters.reduced())),
        trigger = trigger,
        content = content,
    )
}

/// Table of one page of transactions
pub fn render_list(state: &AppState, page: &PageResult<Transaction>, index: &CategoryIndex, query: &str) -> String {
    if page.is_empty() {
        return "<div class='text-center py-12 text-gray-500'><p>No transactions found</p></div>".to_string();
    }

    let mut html = String::from(
        "<table class='w-full text-sm'><thead><tr class='text-left text-gray-500 border-b'>\
         <th class='py-2'>Date</th><th>Description</th><th>Category</th><th>Type</th>\
         <th class='text-right'>Amount</th><th></th></tr></thead><tbody>",
    );
    for tx in &page.items {
        let (badge, amount_color) = match tx.transaction_type {
            TransactionType::Income => ("bg-green-100 text-green-700", "text-green-600"),
            TransactionType::Expense => ("bg-red-100 text-red-700", "text-red-600"),
        };
        let actions = match tx.id {
            Some(id) => format!(
                r#"<button hx-get='/transactions/{id}/form' hx-target='#{modal}' class='text-indigo-600 hover:underline mr-2'>Edit</button><button hx-delete='/transactions/{id}' hx-confirm='Delete this transaction?' hx-swap='none' class='text-red-600 hover:underline'>Delete</button>"#,
                id = id,
                modal = MODAL_ID
            ),
            None => String::new(),
        };
        html.push_str(&format!(
            "<tr class='border-b last:border-0'><td class='py-2'>{}</td><td>{}</td><td>{}</td>\
             <td><span class='px-2 py-0.5 rounded text-xs {}'>{}</span></td>\
             <td class='text-right font-medium {}'>{}</td><td class='text-right'>{}</td></tr>",
            time::format_url_date(tx.date),
            escape_html(&tx.description),
            escape_html(&index.resolve(tx)),
            badge,
            tx.transaction_type.label(),
            amount_color,
            state.money(tx.signed_amount()),
            actions
        ));
    }
    html.push_str("</tbody></table>");
    html.push_str(&format!(
        "<p class='mt-3 text-xs text-gray-400'>{} transactions</p>",
        moneyweb_utils::format_number(page.total_elements)
    ));
    html.push_str(&pagination_controls(
        "/transactions/list",
        query,
        page.page_number,
        page.total_pages,
        &format!("#{}", LIST_ID),
    ));
    html
}

/// Create or edit form inside the modal
pub fn render_form(draft: Option<&TransactionDraft>, id: Option<i64>, categories: &[Category]) -> String {
    let action = match id {
        Some(id) => format!("/transactions/{}", id),
        None => "/transactions".to_string(),
    };
    let description = draft.map(|d| escape_html(&d.description)).unwrap_or_default();
    let amount = draft.map(|d| d.amount.to_string()).unwrap_or_default();
    let date = draft
        .map(|d| time::format_url_date(d.date))
        .unwrap_or_else(|| time::format_url_date(chrono::Local::now().date_naive()));
    let transaction_type = draft.map(|d| d.transaction_type).unwrap_or(TransactionType::Expense);
    let category_id = draft.and_then(|d| d.category_id);

    let options: String = categories
        .iter()
        .filter_map(|c| c.id.map(|cid| (cid, &c.name)))
        .map(|(cid, name)| {
            format!(
                "<option value='{}' {}>{}</option>",
                cid,
                selected(category_id == Some(cid)),
                escape_html(name)
            )
        })
        .collect();

    let body = format!(
        r#"<form hx-post='{action}' hx-target='#{modal}' class='space-y-3'>
    <label class='block text-sm text-gray-600'>Description
        <input type='text' name='description' value='{description}' class='mt-1 w-full px-3 py-2 border rounded-lg'></label>
    <label class='block text-sm text-gray-600'>Amount
        <input type='text' inputmode='decimal' name='amount' value='{amount}' class='mt-1 w-full px-3 py-2 border rounded-lg'></label>
    <label class='block text-sm text-gray-600'>Date
        <input type='date' name='date' value='{date}' class='mt-1 w-full px-3 py-2 border rounded-lg'></label>
    <label class='block text-sm text-gray-600'>Type
        <select name='type' class='mt-1 w-full px-3 py-2 border rounded-lg'>
            <option value='INCOME' {income}>Income</option>
            <option value='EXPENSE' {expense}>Expense</option>
        </select></label>
    <label class='block text-sm text-gray-600'>Category
        <select name='categoryId' class='mt-1 w-full px-3 py-2 border rounded-lg'>
            <option value=''>Select a category</option>{options}
        </select></label>
    <div class='flex justify-end gap-2 pt-2'>
        <button type='button' onclick="document.getElementById('{modal}').innerHTML = ''" class='px-4 py-2 bg-gray-100 rounded-lg'>Cancel</button>
        <button type='submit' class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>Save</button>
    </div>
</form>"#,
        action = action,
        modal = MODAL_ID,
        description = description,
        amount = amount,
        date = date,
        income = selected(transaction_type == TransactionType::Income),
        expense = selected(transaction_type == TransactionType::Expense),
        options = options,
    );

    let title = if id.is_some() { "Edit transaction" } else { "New transaction" };
    modal(title, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn categories() -> Vec<Category> {
        vec![Category { id: Some(3), name: "Food".to_string(), description: None }]
    }

    #[test]
    fn test_filter_query_omits_all() {
        assert_eq!(filter_query(&FilterState::default()), "");
        let filters = FilterState {
            start_date: Some(date(2024, 3, 1)),
            end_date: Some(date(2024, 3, 31)),
            ..FilterState::default()
        };
        assert_eq!(filter_query(&filters), "startDate=2024-03-01&endDate=2024-03-31");
    }

    #[test]
    fn test_panel_reflects_filters() {
        let filters = FilterState {
            category_id: Some(3),
            ..FilterState::default()
        };
        let categories = categories();
        let html = render_panel(&filters, &categories, &CategoryIndex::new(&categories), None);
        assert!(html.contains("<option value='3' selected>Food</option>"));
        assert!(html.contains("data-chip='category'"));
        assert!(html.contains("hx-get='/transactions/list?categoryId=3'"));
        assert!(html.contains("hx-trigger='load, transactions-changed from:body'"));
    }

    #[test]
    fn test_panel_with_inline_list_does_not_reload() {
        let html = render_panel(&FilterState::default(), &[], &CategoryIndex::default(), Some("<table></table>"));
        assert!(html.contains("hx-trigger='transactions-changed from:body'"));
        assert!(html.contains("<table></table>"));
        assert!(!html.contains("data-chip"));
    }

    #[test]
    fn test_edit_form_prefilled() {
        let draft = TransactionDraft {
            description: "Rent & bills".to_string(),
            amount: "800".parse().unwrap(),
            date: date(2024, 2, 1),
            transaction_type: TransactionType::Expense,
            category_id: Some(3),
        };
        let html = render_form(Some(&draft), Some(12), &categories());
        assert!(html.contains("hx-post='/transactions/12'"));
        assert!(html.contains("value='Rent &amp; bills'"));
        assert!(html.contains("value='2024-02-01'"));
        assert!(html.contains("<option value='EXPENSE' selected>"));
        assert!(html.contains("Edit transaction"));
    }
}
