//! HTTP surface
//!
//! Public marketing pages, the login page and the guarded admin pages, all
//! rendered server-side. Every admin path is registered behind the
//! [`require_admin`](session::require_admin) route layer; unknown admin paths
//! reach the fallback, which applies the same guard before answering 404.

pub mod admin;
pub mod auth;
pub mod error;
pub mod form;
pub mod public;
pub mod session;
pub mod state;
pub mod static_files;
pub mod templates;


pub use error::WebError;
pub use session::{AdminSession, CookieSessionStore};
pub use state::AppState;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, StatusCode, Uri},
    middleware as axum_middleware,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post, MethodRouter},
    Router,
};
use chrono::Datelike;
use tera::Context;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::models::{BlogPost, ContactMessage, GalleryEntry, Testimonial};
use crate::resource::Resource;
use crate::routing::{public_nav, Access, Route, RouteGuard, ADMIN_ROOT};

/// One-line message shown above a form or list
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Notice {
    pub kind: &'static str,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: "success",
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: "error",
            text: text.into(),
        }
    }
}

/// Context shared by every public page
pub(crate) fn page_context(state: &AppState, path: &str) -> Context {
    let mut context = Context::new();
    context.insert("site_name", &state.config.server.site_name);
    context.insert("nav", &public_nav(path));
    context.insert("year", &chrono::Utc::now().year());
    context
}

/// Render a template into an HTML response body
pub(crate) fn render(state: &AppState, name: &str, context: &Context) -> Result<Html<String>, WebError> {
    Ok(Html(state.templates.render(name, context)?))
}

/// The public 404 page
pub(crate) fn not_found_page(state: &AppState, path: &str) -> Response {
    let mut context = page_context(state, path);
    context.insert("path", path);
    match render(state, "not_found.html", &context) {
        Ok(html) => (StatusCode::NOT_FOUND, html).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Routes of one admin resource
///
/// Kinds without create or update support get no route for them at all, so
/// such requests fall through to 405 or the fallback.
fn resource_routes<R: Resource>() -> Router<AppState> {
    let base = R::KIND.admin_path();

    let collection: MethodRouter<AppState> = if R::KIND.supports_create() {
        get(admin::list::<R>).post(admin::create::<R>)
    } else {
        get(admin::list::<R>)
    };
    let item: MethodRouter<AppState> = if R::KIND.supports_update() {
        get(admin::show::<R>).post(admin::update::<R>)
    } else {
        get(admin::show::<R>)
    };

    let mut router = Router::new()
        .route(base, collection)
        .route(&format!("{}/{{id}}", base), item)
        .route(
            &format!("{}/{{id}}/delete", base),
            get(admin::confirm_delete::<R>).post(admin::delete::<R>),
        );
    if R::KIND.supports_create() {
        router = router.route(&format!("{}/new", base), get(admin::new::<R>));
    }
    if R::KIND.supports_update() {
        router = router.route(&format!("{}/{{id}}/edit", base), get(admin::edit::<R>));
    }
    router
}

/// Build the complete router
pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.server.max_upload_bytes;

    let admin_routes = Router::new()
        .route(ADMIN_ROOT, get(admin::dashboard))
        .merge(resource_routes::<BlogPost>())
        .merge(resource_routes::<GalleryEntry>())
        .merge(resource_routes::<Testimonial>())
        .merge(resource_routes::<ContactMessage>())
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            session::require_admin,
        ))
        .layer(DefaultBodyLimit::max(upload_limit));

    Router::new()
        .route("/", get(public::home))
        .route("/portfolio", get(public::portfolio))
        .route("/about", get(public::about))
        .route("/blog", get(public::blog_list))
        .route("/blog/{id}", get(public::blog_detail))
        .route("/contact", get(public::contact_page).post(public::submit_contact))
        .route("/admin/login", get(auth::login_page).post(auth::login))
        .route("/admin/logout", post(auth::logout))
        .route("/static/{*path}", get(static_files::serve_static))
        .merge(admin_routes)
        .fallback(fallback)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Unknown paths: guarded like admin pages when under `/admin`, else 404
async fn fallback(State(state): State<AppState>, uri: Uri, headers: HeaderMap) -> Response {
    let path = uri.path();
    let route = Route::parse(path);
    if route.requires_auth() {
        let auth = session::auth_state(&state, &headers);
        if let Access::Redirect(to) = RouteGuard::evaluate(&route, &auth) {
            return Redirect::to(to).into_response();
        }
    }
    not_found_page(&state, path)
}
