//! Dashboard - summary cards, monthly chart, expenses by category and the
//! latest transactions

use axum::extract::{RawQuery, State};
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Response};
use moneyweb_client::Fetched;
use moneyweb_core::summary::{CategorySlice, DashboardSummary, MonthBucket};
use moneyweb_core::time;
use moneyweb_utils::escape_html;
use rust_decimal::Decimal;

use crate::error::ApiResult;
use crate::routes::page_param;
use crate::routes::transactions::CHANGED_EVENT;
use crate::{no_swap, pagination_controls, view_id, AppState, ListKind};

const LATEST_ID: &str = "dashboard-latest";

/// Dashboard page
pub async fn page_dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Html<String>> {
    let (transactions, index) = tokio::try_join!(
        state.client.transactions.fetch_all(),
        state.client.categories.index()
    )?;
    let today = chrono::Local::now().date_naive();
    let summary = DashboardSummary::build(&transactions, &index, today, state.config.dashboard.months);

    let balance_color = if summary.totals.balance < Decimal::ZERO { "text-red-700" } else { "text-indigo-700" };
    let inner_content = format!(
        r#"<div class='mb-6'><h2 class='text-2xl font-bold'>Dashboard</h2></div>
        <div class='grid grid-cols-1 md:grid-cols-3 gap-4 mb-6'>
            <div class='bg-green-50 p-4 rounded-lg border border-green-200'><p class='text-sm text-green-600'>Income</p><p class='text-2xl font-bold text-green-700'>{}</p></div>
            <div class='bg-red-50 p-4 rounded-lg border border-red-200'><p class='text-sm text-red-600'>Expenses</p><p class='text-2xl font-bold text-red-700'>{}</p></div>
            <div class='bg-indigo-50 p-4 rounded-lg border border-indigo-200'><p class='text-sm text-indigo-600'>Balance</p><p class='text-2xl font-bold {}'>{}</p></div>
        </div>
        <div class='grid grid-cols-1 lg:grid-cols-2 gap-6 mb-6'>
            <div class='bg-white rounded-xl shadow-sm p-6'>
                <h3 class='text-lg font-semibold mb-4'>Monthly evolution</h3>
                {}
            </div>
            <div class='bg-white rounded-xl shadow-sm p-6'>
                <h3 class='text-lg font-semibold mb-4'>Expenses by category</h3>
                {}
            </div>
        </div>
        <div class='bg-white rounded-xl shadow-sm p-6'>
            <h3 class='text-lg font-semibold mb-4'>Latest transactions</h3>
            <div id='{}' hx-get='/dashboard/latest' hx-trigger='load, {} from:body' hx-sync='this:replace'>
                <p class='text-gray-500 text-center'>Loading...</p>
            </div>
        </div>"#,
        state.money(summary.totals.income),
        state.money(summary.totals.expenses),
        balance_color,
        state.money(summary.totals.balance),
        render_monthly_chart(&state, &summary.months),
        render_category_chart(&state, &summary.categories),
        LATEST_ID,
        CHANGED_EVENT
    );

    Ok(crate::page_response(&state, &headers, "Dashboard", "/dashboard", &inner_content).await)
}

/// Width of a bar relative to `max`, in whole percent
fn bar_width(value: Decimal, max: Decimal) -> Decimal {
    if max <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (value / max * Decimal::ONE_HUNDRED).round()
}

/// Paired income/expense bars per month
pub fn render_monthly_chart(state: &AppState, months: &[MonthBucket]) -> String {
    let max = months
        .iter()
        .flat_map(|m| [m.income, m.expenses])
        .max()
        .unwrap_or(Decimal::ZERO);
    if max <= Decimal::ZERO {
        return "<p class='text-gray-500 text-center py-8'>No data for this period</p>".to_string();
    }

    let mut html = String::from("<div class='space-y-3'>");
    for month in months {
        html.push_str(&format!(
            r#"<div><div class='flex justify-between text-xs text-gray-500 mb-1'><span>{}</span><span>{} / {}</span></div>
            <div class='h-2 bg-gray-100 rounded mb-1'><div class='h-2 rounded bg-green-500' style='width: {}%'></div></div>
            <div class='h-2 bg-gray-100 rounded'><div class='h-2 rounded bg-red-500' style='width: {}%'></div></div></div>"#,
            month.label,
            state.money(month.income),
            state.money(month.expenses),
            bar_width(month.income, max),
            bar_width(month.expenses, max)
        ));
    }
    html.push_str("</div>");
    html
}

/// Horizontal bars, one colour per category
pub fn render_category_chart(state: &AppState, slices: &[CategorySlice]) -> String {
    let max = match slices.first() {
        Some(slice) => slice.total,
        None => return "<p class='text-gray-500 text-center py-8'>No expenses recorded</p>".to_string(),
    };

    let mut html = String::from("<div class='space-y-3'>");
    for slice in slices {
        html.push_str(&format!(
            r#"<div><div class='flex justify-between text-sm mb-1'><span>{}</span><span class='font-medium'>{}</span></div>
            <div class='h-3 bg-gray-100 rounded'><div class='h-3 rounded' style='width: {}%; background-color: {}'></div></div></div>"#,
            escape_html(&slice.label),
            state.money(slice.total),
            bar_width(slice.total, max),
            slice.color
        ));
    }
    html.push_str("</div>");
    html
}

/// HTMX: Latest transactions, newest first
pub async fn htmx_dashboard_latest(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> ApiResult<Response> {
    let page = page_param(query.as_deref().unwrap_or(""));
    let page_size = state.config.dashboard.latest_page_size;
    let fetched = state
        .fetches
        .coordinator(view_id(&headers), ListKind::Latest)
        .run(async {
            tokio::try_join!(
                state.client.transactions.latest(page, page_size),
                state.client.categories.index()
            )
        })
        .await?;

    let (result, index) = match fetched {
        Fetched::Current(value) => value,
        Fetched::Superseded => return Ok(no_swap()),
    };
    if result.is_empty() {
        return Ok(Html("<p class='text-gray-500 text-center py-4'>No transactions yet</p>".to_string()).into_response());
    }

    let mut html = String::from("<ul class='divide-y'>");
    for tx in &result.items {
        html.push_str(&format!(
            "<li class='flex justify-between py-2'><div><p class='font-medium'>{}</p><p class='text-xs text-gray-500'>{} · {}</p></div><span class='{}'>{}</span></li>",
            escape_html(&tx.description),
            time::format_url_date(tx.date),
            escape_html(&index.resolve(tx)),
            if tx.signed_amount() < Decimal::ZERO { "text-red-600" } else { "text-green-600" },
            state.money(tx.signed_amount())
        ));
    }
    html.push_str("</ul>");
    html.push_str(&pagination_controls(
        "/dashboard/latest",
        "",
        result.page_number,
        result.total_pages,
        &format!("#{}", LATEST_ID),
    ));
    Ok(Html(html).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_width() {
        assert_eq!(bar_width(Decimal::from(50), Decimal::from(200)), Decimal::from(25));
        assert_eq!(bar_width(Decimal::from(5), Decimal::ZERO), Decimal::ZERO);
    }
}
