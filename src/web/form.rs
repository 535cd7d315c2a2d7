//! Reading submitted admin forms
//!
//! Forms arrive either multipart (any form with a file input) or URL-encoded.
//! Both end up as a [`FormInput`]; file inputs left empty by the browser are
//! dropped there, so they never reach the backend.

use axum::{
    extract::{FromRequest, Multipart, Request},
    http::header,
    Form,
};

use super::WebError;
use crate::resource::{FilePart, FormInput};

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"))
}

async fn read_multipart(mut multipart: Multipart) -> Result<FormInput, WebError> {
    let mut input = FormInput::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| WebError::BadRequest(e.body_text()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| WebError::BadRequest(e.body_text()))?;
                input.push_file(&name, FilePart::new(file_name, content_type, bytes.to_vec()));
            }
            None => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| WebError::BadRequest(e.body_text()))?;
                input.set_text(&name, text);
            }
        }
    }
    Ok(input)
}

impl<S: Send + Sync> FromRequest<S> for FormInput {
    type Rejection = WebError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_multipart(&request) {
            let multipart = Multipart::from_request(request, state)
                .await
                .map_err(|e| WebError::BadRequest(e.body_text()))?;
            return read_multipart(multipart).await;
        }

        let Form(fields) = Form::<Vec<(String, String)>>::from_request(request, state)
            .await
            .map_err(|e| WebError::BadRequest(e.body_text()))?;
        let mut input = FormInput::new();
        for (name, value) in fields {
            input.set_text(&name, value);
        }
        Ok(input)
    }
}
