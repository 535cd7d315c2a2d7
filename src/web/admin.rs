//! Admin pages
//!
//! One set of generic handlers serves all four resource kinds. Each request
//! builds a [`ResourcePanel`] bound to the admin's token and drives it: list
//! pages refresh it, form posts submit through it, deletes confirm through it.
//! After a successful mutation the page is rendered from the panel's
//! refreshed list, so every mutation costs exactly one re-fetch.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use tera::Context;

use super::{render, AdminSession, AppState, Notice, WebError};
use crate::dashboard::DashboardStats;
use crate::models::{BlogPost, ContactMessage, GalleryEntry, Testimonial};
use crate::resource::{
    FieldKind, FormInput, FormModal, PanelError, Resource, ResourceKind, ResourcePanel,
    CATEGORY_OPTIONS,
};
use crate::routing::{admin_nav, ADMIN_ROOT};

/// Resource kind as the templates see it
#[derive(Debug, Serialize)]
struct KindView {
    label: &'static str,
    plural: &'static str,
    path: &'static str,
    has_search: bool,
    has_category: bool,
    supports_create: bool,
    supports_update: bool,
}

impl KindView {
    fn of(kind: ResourceKind) -> Self {
        Self {
            label: kind.label(),
            plural: kind.plural(),
            path: kind.admin_path(),
            has_search: kind.has_search(),
            has_category: kind.has_category(),
            supports_create: kind.supports_create(),
            supports_update: kind.supports_update(),
        }
    }
}

#[derive(Debug, Serialize)]
struct RowView {
    id: String,
    cells: Vec<String>,
    thumbnail: Option<String>,
}

#[derive(Debug, Serialize)]
struct FieldView {
    name: &'static str,
    label: &'static str,
    kind: FieldKind,
    required: bool,
    value: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    q: Option<String>,
    category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    confirm: Option<String>,
}

fn admin_context(state: &AppState, session: &AdminSession, path: &str) -> Context {
    let mut context = Context::new();
    context.insert("site_name", &state.config.server.site_name);
    context.insert("admin_nav", &admin_nav(path));
    context.insert("admin_name", session.session().admin.display_name());
    context.insert("year", &chrono::Utc::now().year());
    context
}

fn panel<R: Resource>(state: &AppState, session: &AdminSession) -> ResourcePanel<R> {
    ResourcePanel::new(state.admin_backend::<R>(session.token()))
}

fn not_found<R: Resource>(id: &str) -> WebError {
    WebError::NotFound(format!("{} '{}' was not found.", R::KIND.label(), id))
}

fn render_list<R: Resource>(
    state: &AppState,
    session: &AdminSession,
    panel: &ResourcePanel<R>,
    notice: Option<Notice>,
) -> Result<Response, WebError> {
    let rows: Vec<RowView> = panel
        .visible()
        .into_iter()
        .map(|item| RowView {
            id: item.id().to_string(),
            cells: item.cells(),
            thumbnail: item.thumbnail().map(|file| state.client.image_url(file)),
        })
        .collect();

    let mut context = admin_context(state, session, R::KIND.admin_path());
    context.insert("kind", &KindView::of(R::KIND));
    context.insert("columns", R::COLUMNS);
    context.insert("rows", &rows);
    context.insert("total", &panel.items().map_or(0, |items| items.len()));
    context.insert("search", panel.filter().search());
    context.insert("category", panel.filter().category().unwrap_or("all"));
    context.insert("categories", CATEGORY_OPTIONS);
    context.insert("notice", &notice);
    Ok(render(state, "admin/list.html", &context)?.into_response())
}

fn render_form<R: Resource>(
    state: &AppState,
    session: &AdminSession,
    modal: &FormModal<R::Form>,
    status: StatusCode,
) -> Result<Response, WebError> {
    let values = R::form_values(&modal.form);
    let fields: Vec<FieldView> = R::FIELDS
        .iter()
        .map(|spec| FieldView {
            name: spec.name,
            label: spec.label,
            kind: spec.kind,
            required: spec.required,
            value: values
                .iter()
                .find(|(name, _)| *name == spec.name)
                .map(|(_, value)| value.clone())
                .unwrap_or_default(),
        })
        .collect();

    let base = R::KIND.admin_path();
    let (title, action) = match &modal.editing {
        Some(id) => (
            format!("Edit {}", R::KIND.label()),
            format!("{}/{}", base, urlencoding::encode(id)),
        ),
        None => (format!("New {}", R::KIND.label()), base.to_string()),
    };
    let multipart = R::FIELDS.iter().any(|spec| spec.is_file());

    let mut context = admin_context(state, session, base);
    context.insert("kind", &KindView::of(R::KIND));
    context.insert("title", &title);
    context.insert("action", &action);
    context.insert("editing", &modal.editing.is_some());
    context.insert("multipart", &multipart);
    context.insert("fields", &fields);
    context.insert("error", &modal.error);
    Ok((status, render(state, "admin/form.html", &context)?).into_response())
}

/// Submit the panel's open form and render the outcome
async fn submit<R: Resource>(
    state: &AppState,
    session: &AdminSession,
    mut panel: ResourcePanel<R>,
) -> Result<Response, WebError> {
    let status = match panel.submit().await {
        Ok(()) => {
            state.cache.invalidate(R::KIND).await;
            let notice = Notice::success(format!("{} saved.", R::KIND.label()));
            return render_list(state, session, &panel, Some(notice));
        }
        Err(PanelError::Invalid(_)) => StatusCode::UNPROCESSABLE_ENTITY,
        Err(PanelError::Client(_)) => StatusCode::BAD_GATEWAY,
        Err(e) => {
            tracing::error!(kind = R::KIND.label(), error = %e, "Form submit failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    match panel.modal() {
        Some(modal) => render_form::<R>(state, session, modal, status),
        None => Err(WebError::BadRequest("No form was submitted.".to_string())),
    }
}

/// GET /admin
pub async fn dashboard(
    State(state): State<AppState>,
    session: AdminSession,
) -> Result<Response, WebError> {
    let token = session.token();
    let blogs = state.admin_backend::<BlogPost>(token);
    let gallery = state.admin_backend::<GalleryEntry>(token);
    let testimonials = state.admin_backend::<Testimonial>(token);
    let contacts = state.admin_backend::<ContactMessage>(token);

    let stats = DashboardStats::collect(&*blogs, &*gallery, &*testimonials, &*contacts).await;

    let mut context = admin_context(&state, &session, ADMIN_ROOT);
    context.insert("cards", &stats.cards());
    context.insert("total", &stats.total());
    Ok(render(&state, "admin/dashboard.html", &context)?.into_response())
}

/// GET /admin/{kind}?q=&category=
pub async fn list<R: Resource>(
    State(state): State<AppState>,
    session: AdminSession,
    Query(query): Query<ListQuery>,
) -> Result<Response, WebError> {
    let mut panel = panel::<R>(&state, &session);
    panel.refresh().await;
    if let Some(term) = &query.q {
        panel.set_search(term);
    }
    panel.set_category(query.category.as_deref());
    render_list(&state, &session, &panel, None)
}

/// GET /admin/{kind}/new
pub async fn new<R: Resource>(
    State(state): State<AppState>,
    session: AdminSession,
) -> Result<Response, WebError> {
    let mut panel = panel::<R>(&state, &session);
    panel
        .open_create()
        .map_err(|e| WebError::NotFound(e.to_string()))?;
    match panel.modal() {
        Some(modal) => render_form::<R>(&state, &session, modal, StatusCode::OK),
        None => Err(WebError::NotFound("No form available.".to_string())),
    }
}

/// GET /admin/{kind}/{id}/edit
pub async fn edit<R: Resource>(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<String>,
) -> Result<Response, WebError> {
    let mut panel = panel::<R>(&state, &session);
    panel.refresh().await;
    panel.open_edit(&id).map_err(|_| not_found::<R>(&id))?;
    match panel.modal() {
        Some(modal) => render_form::<R>(&state, &session, modal, StatusCode::OK),
        None => Err(not_found::<R>(&id)),
    }
}

/// POST /admin/{kind}
pub async fn create<R: Resource>(
    State(state): State<AppState>,
    session: AdminSession,
    input: FormInput,
) -> Result<Response, WebError> {
    let mut panel = panel::<R>(&state, &session);
    panel
        .open_create()
        .map_err(|e| WebError::BadRequest(e.to_string()))?;
    if let Some(form) = panel.form_mut() {
        *form = R::read_form(&input);
    }
    submit(&state, &session, panel).await
}

/// POST /admin/{kind}/{id}
pub async fn update<R: Resource>(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<String>,
    input: FormInput,
) -> Result<Response, WebError> {
    let mut panel = panel::<R>(&state, &session);
    panel
        .edit_with(&id, R::read_form(&input))
        .map_err(|e| WebError::BadRequest(e.to_string()))?;
    submit(&state, &session, panel).await
}

/// GET /admin/{kind}/{id}
pub async fn show<R: Resource>(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<String>,
) -> Result<Response, WebError> {
    let mut panel = panel::<R>(&state, &session);
    panel.refresh().await;
    let item = panel.select(&id).ok_or_else(|| not_found::<R>(&id))?;

    let mut context = admin_context(&state, &session, R::KIND.admin_path());
    context.insert("kind", &KindView::of(R::KIND));
    context.insert("id", &id);
    context.insert("details", &item.details());
    context.insert(
        "thumbnail",
        &item.thumbnail().map(|file| state.client.image_url(file)),
    );
    Ok(render(&state, "admin/detail.html", &context)?.into_response())
}

/// GET /admin/{kind}/{id}/delete
///
/// Confirmation page only; nothing is sent to the backend.
pub async fn confirm_delete<R: Resource>(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<String>,
) -> Result<Response, WebError> {
    let mut context = admin_context(&state, &session, R::KIND.admin_path());
    context.insert("kind", &KindView::of(R::KIND));
    context.insert("id", &id);
    context.insert(
        "action",
        &format!("{}/{}/delete", R::KIND.admin_path(), urlencoding::encode(&id)),
    );
    Ok(render(&state, "admin/confirm_delete.html", &context)?.into_response())
}

/// POST /admin/{kind}/{id}/delete
///
/// Deletes only with `confirm=yes`; anything else cancels without a call.
pub async fn delete<R: Resource>(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<String>,
    Form(form): Form<DeleteForm>,
) -> Result<Response, WebError> {
    let mut panel = panel::<R>(&state, &session);
    panel.request_delete(&id);

    if form.confirm.as_deref() != Some("yes") {
        panel.cancel_delete();
        return Ok(Redirect::to(R::KIND.admin_path()).into_response());
    }

    match panel.confirm_delete().await {
        Ok(()) => {
            state.cache.invalidate(R::KIND).await;
            let notice = Notice::success(format!("{} deleted.", R::KIND.label()));
            render_list(&state, &session, &panel, Some(notice))
        }
        Err(_) => {
            panel.refresh().await;
            render_list(&state, &session, &panel, None)
        }
    }
}
