//! Login and logout pages

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use tera::Context;

use super::{render, AppState, CookieSessionStore, WebError};
use crate::models::LoginRequest;
use crate::routing::ADMIN_ROOT;
use crate::session::LoginError;

fn login_response(
    state: &AppState,
    status: StatusCode,
    email: &str,
    error: Option<String>,
) -> Result<Response, WebError> {
    let mut context = Context::new();
    context.insert("site_name", &state.config.server.site_name);
    context.insert("email", email);
    context.insert("error", &error);
    Ok((status, render(state, "admin/login.html", &context)?).into_response())
}

/// GET /admin/login
pub async fn login_page(State(state): State<AppState>) -> Result<Response, WebError> {
    login_response(&state, StatusCode::OK, "", None)
}

/// POST /admin/login
///
/// Success stores the session cookies and moves on to the dashboard; failure
/// shows the login form again with the error and the email kept.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(credentials): Form<LoginRequest>,
) -> Result<Response, WebError> {
    let store = CookieSessionStore::from_headers(&headers, &state.config.session);

    match state.auth.login(&store, &credentials).await {
        Ok(_) => Ok(store.apply(Redirect::to(ADMIN_ROOT))),
        Err(e) => {
            let status = match e {
                LoginError::Rejected(_) => StatusCode::UNAUTHORIZED,
                LoginError::Network => StatusCode::BAD_GATEWAY,
                LoginError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            login_response(&state, status, &credentials.email, Some(e.to_string()))
        }
    }
}

/// POST /admin/logout
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let store = CookieSessionStore::from_headers(&headers, &state.config.session);
    let next = state.auth.logout(&store);
    tracing::info!("Admin logged out");
    store.apply(Redirect::to(next))
}
