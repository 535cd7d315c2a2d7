//! Backend API client
//!
//! Thin wrapper around `reqwest` that knows the backend's base URLs, attaches
//! the session token when one is given, and decodes the response envelope.

mod envelope;
mod error;

pub use envelope::{decode, Envelope};
pub use error::ClientError;

use reqwest::Method;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::BackendConfig;
use crate::models::{LoginData, LoginRequest};
use crate::resource::{Part, PartValue, Payload};

/// HTTP client for the content backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    api_url: String,
    uploads_url: String,
}

impl ApiClient {
    /// Create a client from backend configuration
    pub fn new(config: &BackendConfig) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            api_url: config.api_url(),
            uploads_url: config.uploads_url(),
        })
    }

    /// Base URL of the REST API
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Base URL of uploaded files
    pub fn uploads_url(&self) -> &str {
        &self.uploads_url
    }

    /// Absolute URL of an API path such as `blogs/42`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    /// Absolute URL of an uploaded file, referenced by filename only
    pub fn image_url(&self, filename: &str) -> String {
        format!("{}/{}", self.uploads_url, filename.trim_start_matches('/'))
    }

    /// GET a single envelope
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<Option<T>, ClientError> {
        self.send(Method::GET, path, None, token).await
    }

    /// GET a list envelope; a missing `data` is an empty list
    ///
    /// Items are decoded one by one; an item that does not decode is logged
    /// and skipped so the rest of the collection still shows.
    pub async fn list<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<Vec<T>, ClientError> {
        let values = self
            .get::<Vec<serde_json::Value>>(path, token)
            .await?
            .unwrap_or_default();
        Ok(decode_items(path, values))
    }

    /// DELETE a resource
    pub async fn delete(&self, path: &str, token: Option<&str>) -> Result<(), ClientError> {
        self.send::<serde_json::Value>(Method::DELETE, path, None, token)
            .await
            .map(|_| ())
    }

    /// Issue a request with an optional JSON or multipart body
    pub async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        payload: Option<Payload>,
        token: Option<&str>,
    ) -> Result<Option<T>, ClientError> {
        let url = self.endpoint(path);
        tracing::debug!(%method, %url, "Backend request");

        let mut request = self.http.request(method, &url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request = match payload {
            Some(Payload::Json(value)) => request.json(&value),
            Some(Payload::Multipart(parts)) => request.multipart(multipart_form(parts)?),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        decode(status, &body)
    }

    /// POST credentials to the login endpoint
    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginData, ClientError> {
        let body = serde_json::to_value(credentials)
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        self.send::<LoginData>(Method::POST, "auth/login", Some(Payload::Json(body)), None)
            .await?
            .ok_or_else(|| ClientError::Decode("login response carried no data".to_string()))
    }
}

/// Decode list items, skipping the ones that do not match `T`
fn decode_items<T: DeserializeOwned>(path: &str, values: Vec<serde_json::Value>) -> Vec<T> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(%path, index, error = %e, "Skipping undecodable list item");
                None
            }
        })
        .collect()
}

/// Build a reqwest multipart form, keeping part order
fn multipart_form(parts: Vec<Part>) -> Result<reqwest::multipart::Form, ClientError> {
    let mut form = reqwest::multipart::Form::new();
    for part in parts {
        form = match part.value {
            PartValue::Text(text) => form.text(part.name, text),
            PartValue::File(file) => {
                let body = reqwest::multipart::Part::bytes(file.bytes)
                    .file_name(file.file_name)
                    .mime_str(&file.content_type)
                    .map_err(|e| ClientError::Decode(format!("invalid content type: {}", e)))?;
                form.part(part.name, body)
            }
        };
    }
    Ok(form)
}
