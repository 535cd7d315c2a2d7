//! Shared application state

use anyhow::{Context, Result};
use std::sync::Arc;

use super::templates::Templates;
use crate::cache::PublicCache;
use crate::client::ApiClient;
use crate::config::Config;
use crate::resource::{HttpResourceBackend, Resource, ResourceBackend};
use crate::session::{validator_from_config, AuthGate, SystemClock};

/// State handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub client: Arc<ApiClient>,
    pub templates: Arc<Templates>,
    pub cache: Arc<PublicCache>,
    pub auth: AuthGate,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let client = Arc::new(ApiClient::new(&config.backend).context("Failed to build HTTP client")?);
        let templates = Arc::new(Templates::load().context("Failed to load templates")?);
        let cache = Arc::new(PublicCache::new(&config.cache));
        let auth = AuthGate::new(
            client.clone(),
            validator_from_config(&config.session),
            Arc::new(SystemClock),
        );

        Ok(Self {
            config: Arc::new(config),
            client,
            templates,
            cache,
            auth,
        })
    }

    /// Anonymous backend for public reads
    pub fn public_backend<R: Resource>(&self) -> Arc<dyn ResourceBackend<R>> {
        HttpResourceBackend::boxed(self.client.clone(), None)
    }

    /// Backend carrying the admin's token
    pub fn admin_backend<R: Resource>(&self, token: &str) -> Arc<dyn ResourceBackend<R>> {
        Arc::new(HttpResourceBackend::with_token(self.client.clone(), token))
    }
}
