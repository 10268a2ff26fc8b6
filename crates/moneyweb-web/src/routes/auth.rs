//! Login, registration and logout

use axum::extract::{RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use moneyweb_client::ClientError;
use moneyweb_core::models::RegisterRequest;
use moneyweb_core::url::parse_query;
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::notification::NotificationLevel;
use crate::{auth_page, is_htmx_request, login_redirect, AppState, HX_REDIRECT, LOGIN_PATH};

const HOME_PATH: &str = "/dashboard";

/// Client-side redirect for HTMX, 303 otherwise
fn redirect(headers: &HeaderMap, to: &'static str) -> Response {
    if is_htmx_request(headers) {
        (StatusCode::OK, [(HX_REDIRECT, to)]).into_response()
    } else {
        Redirect::to(to).into_response()
    }
}

/// Login page
pub async fn page_login(State(state): State<AppState>, RawQuery(query): RawQuery) -> Html<String> {
    let registered = parse_query(query.as_deref().unwrap_or(""))
        .iter()
        .any(|(key, _)| key == "registered");
    let notice = if registered {
        state.notifications.render(NotificationLevel::Success, "Account created. You can log in now.")
    } else {
        String::new()
    };

    let inner = format!(
        r#"{}
<form hx-post='{}' class='space-y-4'>
    <label class='block text-sm text-gray-600'>Email
        <input type='email' name='email' required class='mt-1 w-full px-3 py-2 border rounded-lg'></label>
    <label class='block text-sm text-gray-600'>Password
        <input type='password' name='password' required class='mt-1 w-full px-3 py-2 border rounded-lg'></label>
    <button type='submit' class='w-full px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>Log in</button>
</form>
<p class='mt-4 text-sm text-center text-gray-500'>No account? <a href='/register' class='text-indigo-600 hover:underline'>Register</a></p>"#,
        notice, LOGIN_PATH
    );
    Html(auth_page(&state.notifications, "Log in", &inner))
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Log in and go to the dashboard
pub async fn htmx_login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> ApiResult<Response> {
    match state.client.auth.login(&form.email, &form.password).await {
        Ok(_) => Ok(redirect(&headers, HOME_PATH)),
        Err(ClientError::Unauthorized) | Err(ClientError::Http { status: 400..=403, .. }) => {
            Err(ApiError::BadRequest {
                message: "Invalid email or password".to_string(),
            })
        }
        Err(e) => Err(e.into()),
    }
}

/// Registration page
pub async fn page_register(State(state): State<AppState>) -> Html<String> {
    let inner = r#"<form hx-post='/register' class='space-y-4'>
    <label class='block text-sm text-gray-600'>Name
        <input type='text' name='name' required class='mt-1 w-full px-3 py-2 border rounded-lg'></label>
    <label class='block text-sm text-gray-600'>Email
        <input type='email' name='email' required class='mt-1 w-full px-3 py-2 border rounded-lg'></label>
    <label class='block text-sm text-gray-600'>Password
        <input type='password' name='password' minlength='6' required class='mt-1 w-full px-3 py-2 border rounded-lg'></label>
    <button type='submit' class='w-full px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>Create account</button>
</form>
<p class='mt-4 text-sm text-center text-gray-500'>Already registered? <a href='/login' class='text-indigo-600 hover:underline'>Log in</a></p>"#;
    Html(auth_page(&state.notifications, "Register", inner))
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Create an account, then continue to the login page
pub async fn htmx_register(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<RegisterForm>,
) -> ApiResult<Response> {
    let request = RegisterRequest {
        name: form.name.trim().to_string(),
        email: form.email.trim().to_string(),
        password: form.password,
    };
    state.client.auth.register(&request).await?;
    Ok(redirect(&headers, "/login?registered=1"))
}

/// Forget the stored token
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Response> {
    state.client.auth.logout().await?;
    log::info!("Logged out");
    Ok(login_redirect(is_htmx_request(&headers)))
}
