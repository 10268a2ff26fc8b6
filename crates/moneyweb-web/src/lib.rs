//! HTMX front-end server for the personal finance API
//!
//! Routes are organized into modules:
//! - routes::dashboard: Summary cards, charts and latest transactions
//! - routes::transactions: Filtered, paginated transaction list and CRUD
//! - routes::categories: Category list and CRUD
//! - routes::goals: Savings goals with progress
//! - routes::auth: Login, registration and logout
//!
//! Pages are server-rendered HTML. Full requests get the whole layout,
//! HTMX requests only the fragment.

pub mod error;
pub mod notification;
pub mod routes;

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;
use moneyweb_client::{FetchCoordinator, MoneyClient};
use moneyweb_config::Config;
use moneyweb_core::page::{page_window, MAX_PAGE_BUTTONS};
use rust_decimal::Decimal;
use tokio::net::TcpListener;

pub use error::{ApiError, ApiResult, ErrorNotice};
use notification::{NotificationCenter, NotificationLevel, REGION_ID};

pub const HX_REQUEST: &str = "HX-Request";
pub const HX_CURRENT_URL: &str = "HX-Current-URL";
pub const HX_PUSH_URL: &str = "HX-Push-Url";
pub const HX_REDIRECT: &str = "HX-Redirect";
pub const HX_RESWAP: &str = "HX-Reswap";
pub const HX_RETARGET: &str = "HX-Retarget";
pub const HX_TRIGGER: &str = "HX-Trigger";

/// Sent by every HTMX request of a page, naming the browser tab it came from
pub const VIEW_HEADER: &str = "X-Moneyweb-View";

pub const LOGIN_PATH: &str = "/login";
pub const MODAL_ID: &str = "modal";

const MAX_TRACKED_VIEWS: usize = 1024;

/// Lists whose fetches are coordinated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Transactions,
    Latest,
    Categories,
    Goals,
}

/// Fetch coordinators keyed by browser tab and list.
///
/// A slow page never overwrites a newer one of the same list in the same
/// tab, while requests from other tabs never supersede each other.
#[derive(Debug, Default)]
pub struct ListFetches {
    views: Mutex<TrackedViews>,
}

#[derive(Debug, Default)]
struct TrackedViews {
    coordinators: HashMap<(String, ListKind), Arc<FetchCoordinator>>,
    // insertion order, oldest first
    order: VecDeque<(String, ListKind)>,
}

impl ListFetches {
    /// Coordinator for `kind` in the tab named `view`.
    ///
    /// Requests without a view id get a coordinator of their own, so they are
    /// never superseded.
    pub fn coordinator(&self, view: Option<&str>, kind: ListKind) -> Arc<FetchCoordinator> {
        let view = match view {
            Some(view) => view,
            None => return Arc::new(FetchCoordinator::new()),
        };
        let mut views = self.views.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let key = (view.to_string(), kind);
        if let Some(existing) = views.coordinators.get(&key) {
            return existing.clone();
        }
        if views.order.len() >= MAX_TRACKED_VIEWS {
            if let Some(oldest) = views.order.pop_front() {
                log::debug!("Forgetting fetches of view {}", oldest.0);
                views.coordinators.remove(&oldest);
            }
        }
        let coordinator = Arc::new(FetchCoordinator::new());
        views.coordinators.insert(key.clone(), coordinator.clone());
        views.order.push_back(key);
        coordinator
    }

    /// Number of (view, list) pairs currently tracked
    pub fn tracked(&self) -> usize {
        self.views.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).order.len()
    }
}

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub client: MoneyClient,
    pub fetches: Arc<ListFetches>,
    pub notifications: NotificationCenter,
}

impl AppState {
    pub fn new(config: Config, client: MoneyClient) -> Self {
        let notifications = NotificationCenter::new(&config.notifications);
        Self {
            config,
            client,
            fetches: Arc::new(ListFetches::default()),
            notifications,
        }
    }

    /// Amount with the configured currency symbol and separators
    pub fn money(&self, amount: Decimal) -> String {
        moneyweb_utils::format_currency(amount, &self.config.currency)
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::auth::{page_login, page_register, htmx_login, htmx_register, logout};
    use routes::categories::{
        page_categories, htmx_categories_list, htmx_category_form, htmx_category_edit_form,
        htmx_category_store, htmx_category_update, htmx_category_delete,
    };
    use routes::dashboard::{page_dashboard, htmx_dashboard_latest};
    use routes::goals::{
        page_goals, htmx_goals_list, htmx_goal_form, htmx_goal_edit_form, htmx_goal_store,
        htmx_goal_update, htmx_goal_delete,
    };
    use routes::transactions::{
        page_transactions, htmx_transactions_list, htmx_transactions_filter,
        htmx_transactions_filter_clear, htmx_transaction_form, htmx_transaction_edit_form,
        htmx_transaction_store, htmx_transaction_update, htmx_transaction_delete,
    };

    let protected = Router::new()
        .route("/", get(page_dashboard))
        .route("/dashboard", get(page_dashboard))
        .route("/dashboard/latest", get(htmx_dashboard_latest))
        .route("/transactions", get(page_transactions).post(htmx_transaction_store))
        .route("/transactions/list", get(htmx_transactions_list))
        .route("/transactions/filter", get(htmx_transactions_filter))
        .route("/transactions/filter/clear", get(htmx_transactions_filter_clear))
        .route("/transactions/form", get(htmx_transaction_form))
        .route("/transactions/:id/form", get(htmx_transaction_edit_form))
        .route("/transactions/:id", post(htmx_transaction_update).delete(htmx_transaction_delete))
        .route("/categories", get(page_categories).post(htmx_category_store))
        .route("/categories/list", get(htmx_categories_list))
        .route("/categories/form", get(htmx_category_form))
        .route("/categories/:id/form", get(htmx_category_edit_form))
        .route("/categories/:id", post(htmx_category_update).delete(htmx_category_delete))
        .route("/goals", get(page_goals).post(htmx_goal_store))
        .route("/goals/list", get(htmx_goals_list))
        .route("/goals/form", get(htmx_goal_form))
        .route("/goals/:id/form", get(htmx_goal_edit_form))
        .route("/goals/:id", post(htmx_goal_update).delete(htmx_goal_delete))
        .route("/logout", get(logout).post(logout))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    let public = Router::new()
        .route("/api/health", get(health_check))
        .route(LOGIN_PATH, get(page_login).post(htmx_login))
        .route("/register", get(page_register).post(htmx_register));

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(middleware::from_fn_with_state(state.clone(), present_errors))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

// ==================== Middleware ====================

/// Send the user to the login page, as a client-side redirect for HTMX
pub fn login_redirect(htmx: bool) -> Response {
    if htmx {
        (StatusCode::OK, [(HX_REDIRECT, LOGIN_PATH)]).into_response()
    } else {
        Redirect::to(LOGIN_PATH).into_response()
    }
}

/// Reject requests without a stored token
async fn require_session(State(state): State<AppState>, request: Request, next: Next) -> Response {
    match state.client.auth.is_authenticated().await {
        Ok(true) => next.run(request).await,
        Ok(false) => login_redirect(is_htmx_request(request.headers())),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Turn error responses into notifications or an error page, and expired
/// sessions into a redirect to the login page
async fn present_errors(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let htmx = is_htmx_request(request.headers());
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;
    let status = response.status();
    log::debug!("{} {} -> {}", method, path, status.as_u16());

    if status == StatusCode::UNAUTHORIZED {
        return login_redirect(htmx);
    }
    let notice = match response.extensions().get::<ErrorNotice>() {
        Some(notice) => notice.clone(),
        None => return response,
    };

    if htmx {
        let toast = state.notifications.render(NotificationLevel::Error, &notice.0);
        (
            status,
            [(HX_RETARGET, format!("#{}", REGION_ID)), (HX_RESWAP, "beforeend".to_string())],
            Html(toast),
        )
            .into_response()
    } else {
        let inner = format!(
            r#"<div class='max-w-lg mx-auto mt-12 bg-white rounded-xl shadow-sm p-6 text-center'>
                <p class='text-4xl font-bold text-gray-300 mb-2'>{}</p>
                <p class='text-gray-700 mb-4'>{}</p>
                <a href='/dashboard' class='text-indigo-600 hover:underline'>Back to dashboard</a>
            </div>"#,
            status.as_u16(),
            moneyweb_utils::escape_html(&notice.0)
        );
        let user = session_user(&state).await;
        (status, Html(full_page(&state.notifications, user.as_deref(), "Error", &path, &inner))).into_response()
    }
}

// ==================== HTMX Helpers ====================

/// Check if request is from HTMX (partial page update)
pub fn is_htmx_request(headers: &HeaderMap) -> bool {
    headers.get(HX_REQUEST).is_some()
}

/// Tab id sent by pages rendered with [`full_page`]
pub fn view_id(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(VIEW_HEADER)?
        .to_str()
        .ok()
        .filter(|view| !view.is_empty())
}

/// Path and query of the browser location, from the `HX-Current-URL` header
pub fn current_location(headers: &HeaderMap) -> Option<(String, String)> {
    let url = headers.get(HX_CURRENT_URL)?.to_str().ok()?;
    let without_scheme = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    let path_and_query = match without_scheme.find('/') {
        Some(index) => &without_scheme[index..],
        None => "/",
    };
    let path_and_query = path_and_query.split('#').next().unwrap_or("/");
    Some(match path_and_query.split_once('?') {
        Some((path, query)) => (path.to_string(), query.to_string()),
        None => (path_and_query.to_string(), String::new()),
    })
}

/// Empty response that tells HTMX to leave the page alone
pub fn no_swap() -> Response {
    (StatusCode::OK, [(HX_RESWAP, "none")]).into_response()
}

/// Success notification plus an event that makes the affected list reload
pub fn mutation_response(state: &AppState, message: &str, event: &str) -> Response {
    (
        StatusCode::OK,
        [(HX_TRIGGER, event)],
        Html(state.notifications.success(message)),
    )
        .into_response()
}

// ==================== Template Functions ====================

/// Base HTML template
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - Moneyweb</title>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <script src="https://cdn.tailwindcss.com"></script>
    <style>
        .htmx-indicator {{ opacity: 0; transition: opacity 0.3s; }}
        .htmx-request .htmx-indicator {{ opacity: 1; }}
        .htmx-request.htmx-indicator {{ opacity: 1; }}
        .progress-complete {{ background-color: #10B981; }}
        .progress-high {{ background-color: #3B82F6; }}
        .progress-medium {{ background-color: #F59E0B; }}
        .progress-low {{ background-color: #F97316; }}
        .progress-minimal {{ background-color: #EF4444; }}
        .urgency-overdue {{ color: #DC2626; font-weight: 600; }}
        .urgency-imminent {{ color: #EA580C; }}
        .urgency-soon {{ color: #D97706; }}
        .urgency-later {{ color: #6B7280; }}
    </style>
</head>
<body class="bg-gray-50 text-gray-900">
    {}
    <script>
    document.addEventListener('htmx:beforeSwap', function(evt) {{
        if (evt.detail.xhr.status >= 400 && evt.detail.xhr.getResponseHeader('HX-Retarget')) {{
            evt.detail.shouldSwap = true;
            evt.detail.isError = false;
        }}
    }});
    htmx.onLoad(function(elt) {{
        const toasts = elt.matches && elt.matches('[data-dismiss-after]')
            ? [elt] : elt.querySelectorAll('[data-dismiss-after]');
        toasts.forEach(function(toast) {{
            setTimeout(function() {{ toast.remove(); }}, parseInt(toast.dataset.dismissAfter, 10));
        }});
    }});
    </script>
</body>
</html>"#,
        title, content
    )
}

/// Navigation sidebar, with the logged-in user at the bottom when known
pub fn nav_sidebar(current_path: &str, user: Option<&str>) -> String {
    let links = [
        ("/dashboard", "Dashboard", "📊"),
        ("/transactions", "Transactions", "📋"),
        ("/categories", "Categories", "🏷️"),
        ("/goals", "Goals", "🎯"),
    ];

    let mut nav = String::from("<div class='bg-white border-r h-screen flex flex-col'><div class='p-4 border-b'><h1 class='text-xl font-bold text-indigo-600'>Moneyweb</h1></div><ul class='flex-1 py-2 space-y-1 px-2'>");

    for (path, label, icon) in &links {
        let is_active = current_path.starts_with(path) || (current_path == "/" && *path == "/dashboard");
        let active_class = if is_active { "bg-indigo-50 text-indigo-600" } else { "text-gray-600 hover:bg-gray-50" };
        nav.push_str(&format!(
            r#"<li><a href='{}' class='flex items-center gap-2 px-3 py-2 rounded-lg {}'>{}<span>{}</span></a></li>"#,
            path, active_class, icon, label
        ));
    }
    nav.push_str("</ul><div class='p-4 border-t flex items-center gap-3'>");
    if let Some(name) = user {
        nav.push_str(&format!(
            "<div data-user-initials class='h-10 w-10 flex-shrink-0 rounded-full bg-indigo-500 text-white font-medium flex items-center justify-center'>{}</div>",
            moneyweb_utils::escape_html(&moneyweb_utils::initials(name))
        ));
    }
    nav.push_str(&format!(
        "<div class='min-w-0'>{}<a href='/logout' class='text-sm text-gray-500 hover:text-red-600'>Log out</a></div></div></div>",
        user.map(|name| format!(
            "<p data-user-name class='text-sm font-medium truncate'>{}</p>",
            moneyweb_utils::escape_html(name)
        ))
        .unwrap_or_default()
    ));
    nav
}

/// Full layout: sidebar, main area, modal slot and notification region.
///
/// Each rendering names a new browser view, sent back with every HTMX
/// request made from the page.
pub fn full_page(notifications: &NotificationCenter, user: Option<&str>, title: &str, current_path: &str, inner_content: &str) -> String {
    base_html(
        title,
        &format!(
            r#"<div id='view' hx-headers='{{"{}": "{}"}}'>
<div class='flex flex-col h-screen'>
    <div class='flex flex-1 overflow-hidden'>
        <aside class='w-64 flex-shrink-0'>{}</aside>
        <main id='main' class='flex-1 overflow-auto bg-gray-50 p-6'>{}</main>
    </div>
</div>
<div id='{}'></div>
{}
</div>"#,
            VIEW_HEADER,
            moneyweb_utils::generate_id("view"),
            nav_sidebar(current_path, user),
            inner_content,
            MODAL_ID,
            notifications.region()
        ),
    )
}

/// Name of the logged-in user for the sidebar. A store failure only hides it.
pub async fn session_user(state: &AppState) -> Option<String> {
    match state.client.auth.current_user().await {
        Ok(user) => user,
        Err(e) => {
            log::warn!("Cannot read the session user: {}", e);
            None
        }
    }
}

/// Wrap content for full page or HTMX partial
pub async fn page_response(state: &AppState, headers: &HeaderMap, title: &str, current_path: &str, inner_content: &str) -> Html<String> {
    if is_htmx_request(headers) {
        Html(inner_content.to_string())
    } else {
        let user = session_user(state).await;
        Html(full_page(&state.notifications, user.as_deref(), title, current_path, inner_content))
    }
}

/// Centered card layout for the login and registration pages
pub fn auth_page(notifications: &NotificationCenter, title: &str, inner_content: &str) -> String {
    base_html(
        title,
        &format!(
            r#"<div class='min-h-screen flex items-center justify-center'>
    <div class='w-full max-w-sm bg-white rounded-xl shadow-sm p-8'>
        <h1 class='text-2xl font-bold text-indigo-600 mb-6 text-center'>Moneyweb</h1>
        {}
    </div>
</div>
{}"#,
            inner_content,
            notifications.region()
        ),
    )
}

/// Modal wrapper for create and edit forms
pub fn modal(title: &str, body: &str) -> String {
    format!(
        r#"<div class='fixed inset-0 bg-black bg-opacity-40 flex items-center justify-center z-40'>
    <div class='bg-white rounded-xl shadow-lg w-full max-w-md p-6'>
        <div class='flex justify-between items-center mb-4'>
            <h3 class='text-lg font-semibold'>{}</h3>
            <button type='button' onclick="document.getElementById('{}').innerHTML = ''" class='text-gray-400 hover:text-gray-600'>&times;</button>
        </div>
        {}
    </div>
</div>"#,
        moneyweb_utils::escape_html(title),
        MODAL_ID,
        body
    )
}

/// Previous/next and numbered page buttons for a zero-based page list.
///
/// `query` holds the other parameters of the list request, without `page`.
pub fn pagination_controls(endpoint: &str, query: &str, current: u32, total_pages: u32, target: &str) -> String {
    if total_pages <= 1 {
        return String::new();
    }
    let url = |page: u32| {
        if query.is_empty() {
            format!("{}?page={}", endpoint, page)
        } else {
            format!("{}?{}&page={}", endpoint, query, page)
        }
    };
    let button = |page: u32, label: &str, enabled: bool, active: bool| {
        let class = if active {
            "bg-indigo-600 text-white"
        } else if enabled {
            "bg-white text-gray-700 hover:bg-gray-100"
        } else {
            "bg-gray-100 text-gray-400 cursor-not-allowed"
        };
        if enabled && !active {
            format!(
                "<button hx-get='{}' hx-target='{}' hx-sync='{}:replace' class='px-3 py-1 border rounded {}'>{}</button>",
                url(page), target, target, class, label
            )
        } else {
            format!("<button disabled class='px-3 py-1 border rounded {}'>{}</button>", class, label)
        }
    };

    let mut html = String::from("<div class='flex items-center justify-center gap-1 mt-4'>");
    html.push_str(&button(current.saturating_sub(1), "&laquo;", current > 0, false));
    for page in page_window(current, total_pages, MAX_PAGE_BUTTONS) {
        html.push_str(&button(page, &(page + 1).to_string(), true, page == current));
    }
    html.push_str(&button(current + 1, "&raquo;", current + 1 < total_pages, false));
    html.push_str(&format!(
        "<span class='ml-3 text-sm text-gray-500'>Page {} of {}</span></div>",
        current + 1,
        total_pages
    ));
    html
}

/// Start the HTTP server
///
/// Binds the configured address and serves until Ctrl-C.
pub async fn start_server(config: Config, client: MoneyClient) -> std::io::Result<()> {
    let addr = config.listen_addr();
    let state = AppState::new(config, client);
    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting Moneyweb server on http://{}", addr);
    log::info!("Available routes: /dashboard, /transactions, /categories, /goals, /login");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log::info!("Server stopped gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
    }
}
