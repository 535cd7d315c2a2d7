//! Resource backends
//!
//! `ResourceBackend` is the seam between the admin workflow and the network.
//! The HTTP implementation talks to the real backend; tests plug in an
//! in-memory one.

use async_trait::async_trait;
use reqwest::Method;
use std::marker::PhantomData;
use std::sync::Arc;

use super::{Payload, Resource};
use crate::client::{ApiClient, ClientError};
use crate::session::Session;

/// CRUD operations on one resource collection
#[async_trait]
pub trait ResourceBackend<R: Resource>: Send + Sync {
    /// Fetch the whole collection
    async fn list(&self) -> Result<Vec<R>, ClientError>;

    /// Fetch one record
    async fn get(&self, id: &str) -> Result<R, ClientError>;

    /// Create a record; any echoed record is ignored
    async fn create(&self, payload: Payload) -> Result<(), ClientError>;

    /// Update a record by id; any echoed record is ignored
    async fn update(&self, id: &str, payload: Payload) -> Result<(), ClientError>;

    /// Delete a record by id
    async fn delete(&self, id: &str) -> Result<(), ClientError>;
}

/// Backend reached over HTTP through [`ApiClient`]
pub struct HttpResourceBackend<R> {
    client: Arc<ApiClient>,
    token: Option<String>,
    _marker: PhantomData<fn() -> R>,
}

impl<R: Resource> HttpResourceBackend<R> {
    /// Create a backend; calls carry the session token when a session is given
    pub fn new(client: Arc<ApiClient>, session: Option<&Session>) -> Self {
        Self {
            client,
            token: session.map(|s| s.token.clone()),
            _marker: PhantomData,
        }
    }

    /// Create a backend authenticated with a bare token
    pub fn with_token(client: Arc<ApiClient>, token: &str) -> Self {
        Self {
            client,
            token: Some(token.to_string()),
            _marker: PhantomData,
        }
    }

    /// Create a boxed backend for use with dependency injection
    pub fn boxed(client: Arc<ApiClient>, session: Option<&Session>) -> Arc<dyn ResourceBackend<R>> {
        Arc::new(Self::new(client, session))
    }

    fn item_path(id: &str) -> String {
        format!("{}/{}", R::KIND.endpoint(), urlencoding::encode(id))
    }
}

#[async_trait]
impl<R: Resource> ResourceBackend<R> for HttpResourceBackend<R> {
    async fn list(&self) -> Result<Vec<R>, ClientError> {
        self.client
            .list(R::KIND.endpoint(), self.token.as_deref())
            .await
    }

    async fn get(&self, id: &str) -> Result<R, ClientError> {
        self.client
            .get::<R>(&Self::item_path(id), self.token.as_deref())
            .await?
            .ok_or_else(|| ClientError::NotFound(format!("{} {}", R::KIND.label(), id)))
    }

    async fn create(&self, payload: Payload) -> Result<(), ClientError> {
        self.client
            .send::<serde_json::Value>(Method::POST, R::KIND.endpoint(), Some(payload), self.token.as_deref())
            .await
            .map(|_| ())
    }

    async fn update(&self, id: &str, payload: Payload) -> Result<(), ClientError> {
        self.client
            .send::<serde_json::Value>(Method::PUT, &Self::item_path(id), Some(payload), self.token.as_deref())
            .await
            .map(|_| ())
    }

    async fn delete(&self, id: &str) -> Result<(), ClientError> {
        self.client
            .delete(&Self::item_path(id), self.token.as_deref())
            .await
    }
}
