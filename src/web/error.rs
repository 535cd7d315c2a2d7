//! HTTP error responses

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use super::templates::TemplateError;
use crate::client::ClientError;

/// Failure of a page handler
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Backend(#[from] ClientError),

    #[error(transparent)]
    Template(#[from] TemplateError),
}

impl WebError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::NotFound(_) => StatusCode::NOT_FOUND,
            WebError::BadRequest(_) => StatusCode::BAD_REQUEST,
            WebError::Backend(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            WebError::Backend(ClientError::Network(_)) => StatusCode::BAD_GATEWAY,
            WebError::Backend(_) => StatusCode::BAD_GATEWAY,
            WebError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text safe to show to a visitor
    pub fn public_message(&self) -> String {
        match self {
            WebError::NotFound(message) | WebError::BadRequest(message) => message.clone(),
            WebError::Backend(e) => e.user_message(),
            WebError::Template(_) => "Something went wrong. Please try again later.".to_string(),
        }
    }
}

/// Minimal HTML escaping for text placed in element content
pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let title = status.canonical_reason().unwrap_or("Error");
        let body = format!(
            "<!doctype html><html><head><meta charset=\"utf-8\"><title>{title}</title>\
             <link rel=\"stylesheet\" href=\"/static/site.css\"></head>\
             <body class=\"error-page\"><main><h1>{code} {title}</h1><p>{message}</p>\
             <p><a href=\"/\">Back to the home page</a></p></main></body></html>",
            code = status.as_u16(),
            title = title,
            message = escape_html(&self.public_message()),
        );
        (status, Html(body)).into_response()
    }
}
