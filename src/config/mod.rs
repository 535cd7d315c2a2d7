//! Configuration management
//!
//! Configuration is read from `config.yml` and can be overridden with
//! `WEDSITE_*` environment variables. Missing values fall back to defaults,
//! so a missing or empty file yields a runnable configuration pointing at a
//! backend on `localhost:5000`.

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Content backend the site reads from and writes to
    #[serde(default)]
    pub backend: BackendConfig,
    /// Admin session cookies and validation
    #[serde(default)]
    pub session: SessionConfig,
    /// Public page read cache
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// Name shown in page titles and the footer
    #[serde(default = "default_site_name")]
    pub site_name: String,
    /// Largest accepted admin upload request, in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            site_name: default_site_name(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_site_name() -> String {
    "RK Events".to_string()
}

fn default_max_upload_bytes() -> usize {
    25 * 1024 * 1024
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Scheme, host and port of the backend, without a trailing slash
    #[serde(default = "default_origin")]
    pub origin: String,
    /// Path prefix of the REST API
    #[serde(default = "default_api_path")]
    pub api_path: String,
    /// Path prefix under which uploaded files are served
    #[serde(default = "default_uploads_path")]
    pub uploads_path: String,
    /// Request timeout in seconds. No timeout when unset.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            api_path: default_api_path(),
            uploads_path: default_uploads_path(),
            timeout_secs: None,
        }
    }
}

fn default_origin() -> String {
    "http://localhost:5000".to_string()
}

fn default_api_path() -> String {
    "/api/v1".to_string()
}

fn default_uploads_path() -> String {
    "/uploads".to_string()
}

impl BackendConfig {
    /// Base URL of every REST call, e.g. `http://localhost:5000/api/v1`
    pub fn api_url(&self) -> String {
        join_url(&self.origin, &self.api_path)
    }

    /// Base URL of uploaded assets, e.g. `http://localhost:5000/uploads`
    pub fn uploads_url(&self) -> String {
        join_url(&self.origin, &self.uploads_path)
    }
}

fn join_url(origin: &str, path: &str) -> String {
    let origin = origin.trim_end_matches('/');
    let path = path.trim_matches('/');
    if path.is_empty() {
        origin.to_string()
    } else {
        format!("{}/{}", origin, path)
    }
}

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Cookie holding the session token
    #[serde(default = "default_token_cookie")]
    pub token_cookie: String,
    /// Cookie holding the admin identity payload
    #[serde(default = "default_admin_cookie")]
    pub admin_cookie: String,
    /// How a stored session is judged valid
    #[serde(default)]
    pub validator: ValidatorKind,
    /// Maximum session age in seconds (only used by the expiry validator)
    #[serde(default = "default_max_age")]
    pub max_age_secs: u64,
    /// Mark cookies `Secure`
    #[serde(default)]
    pub secure_cookies: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_cookie: default_token_cookie(),
            admin_cookie: default_admin_cookie(),
            validator: ValidatorKind::default(),
            max_age_secs: default_max_age(),
            secure_cookies: false,
        }
    }
}

fn default_token_cookie() -> String {
    "adminToken".to_string()
}

fn default_admin_cookie() -> String {
    "adminData".to_string()
}

fn default_max_age() -> u64 {
    86400
}

/// Session validator type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValidatorKind {
    /// Any stored token counts as logged in (default)
    #[default]
    Presence,
    /// Tokens older than `max_age_secs` are rejected
    Expiry,
}

/// Public read cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether public pages cache backend lists
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    /// Cache TTL in seconds
    #[serde(default = "default_ttl")]
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            ttl_seconds: default_ttl(),
        }
    }
}

fn default_cache_enabled() -> bool {
    true
}

fn default_ttl() -> u64 {
    60
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError {
        path: String,
        message: String,
    },
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

impl Config {
    /// Load configuration from file
    ///
    /// If the file doesn't exist or is empty, returns default configuration.
    /// If the file exists but is invalid YAML, returns an error with details.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                path: path.display().to_string(),
                message: format_yaml_error(&e),
            }
        })?;

        Ok(config)
    }

    /// Load configuration from file, apply environment overrides and validate
    ///
    /// Environment variables follow the pattern:
    /// - WEDSITE_SERVER_HOST
    /// - WEDSITE_SERVER_PORT
    /// - WEDSITE_SERVER_SITE_NAME
    /// - WEDSITE_SERVER_MAX_UPLOAD_BYTES
    /// - WEDSITE_BACKEND_ORIGIN
    /// - WEDSITE_BACKEND_API_PATH
    /// - WEDSITE_BACKEND_UPLOADS_PATH
    /// - WEDSITE_BACKEND_TIMEOUT_SECS
    /// - WEDSITE_SESSION_VALIDATOR
    /// - WEDSITE_SESSION_MAX_AGE_SECS
    /// - WEDSITE_SESSION_SECURE_COOKIES
    /// - WEDSITE_CACHE_ENABLED
    /// - WEDSITE_CACHE_TTL_SECONDS
    pub fn load_with_env(path: &std::path::Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Check values that would otherwise only fail at request time
    pub fn validate(&self) -> Result<(), ConfigError> {
        let origin = &self.backend.origin;
        if !(origin.starts_with("http://") || origin.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "backend.origin must start with http:// or https://, got '{}'",
                origin
            )));
        }
        if self.session.token_cookie.trim().is_empty() || self.session.admin_cookie.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "session cookie names must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply environment variable overrides to the configuration
    fn apply_env_overrides(&mut self) {
        // Server configuration
        if let Ok(host) = std::env::var("WEDSITE_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("WEDSITE_SERVER_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.server.port = port;
            }
        }
        if let Ok(name) = std::env::var("WEDSITE_SERVER_SITE_NAME") {
            self.server.site_name = name;
        }
        if let Ok(limit) = std::env::var("WEDSITE_SERVER_MAX_UPLOAD_BYTES") {
            if let Ok(limit) = limit.parse::<usize>() {
                self.server.max_upload_bytes = limit;
            }
        }

        // Backend configuration
        if let Ok(origin) = std::env::var("WEDSITE_BACKEND_ORIGIN") {
            self.backend.origin = origin;
        }
        if let Ok(api_path) = std::env::var("WEDSITE_BACKEND_API_PATH") {
            self.backend.api_path = api_path;
        }
        if let Ok(uploads_path) = std::env::var("WEDSITE_BACKEND_UPLOADS_PATH") {
            self.backend.uploads_path = uploads_path;
        }
        if let Ok(timeout) = std::env::var("WEDSITE_BACKEND_TIMEOUT_SECS") {
            if let Ok(timeout) = timeout.parse::<u64>() {
                self.backend.timeout_secs = Some(timeout);
            }
        }

        // Session configuration
        if let Ok(validator) = std::env::var("WEDSITE_SESSION_VALIDATOR") {
            match validator.to_lowercase().as_str() {
                "presence" => self.session.validator = ValidatorKind::Presence,
                "expiry" => self.session.validator = ValidatorKind::Expiry,
                _ => {} // Ignore invalid values
            }
        }
        if let Ok(max_age) = std::env::var("WEDSITE_SESSION_MAX_AGE_SECS") {
            if let Ok(max_age) = max_age.parse::<u64>() {
                self.session.max_age_secs = max_age;
            }
        }
        if let Ok(secure) = std::env::var("WEDSITE_SESSION_SECURE_COOKIES") {
            if let Ok(secure) = secure.parse::<bool>() {
                self.session.secure_cookies = secure;
            }
        }

        // Cache configuration
        if let Ok(enabled) = std::env::var("WEDSITE_CACHE_ENABLED") {
            if let Ok(enabled) = enabled.parse::<bool>() {
                self.cache.enabled = enabled;
            }
        }
        if let Ok(ttl) = std::env::var("WEDSITE_CACHE_TTL_SECONDS") {
            if let Ok(ttl) = ttl.parse::<u64>() {
                self.cache.ttl_seconds = ttl;
            }
        }
    }
}

/// Format YAML parsing error with location and context
fn format_yaml_error(e: &serde_yaml::Error) -> String {
    if let Some(location) = e.location() {
        format!(
            "at line {}, column {}: {}",
            location.line(),
            location.column(),
            e
        )
    } else {
        e.to_string()
    }
}

// Shared mutex for config tests that modify environment variables.
#[cfg(test)]
static CONFIG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());
