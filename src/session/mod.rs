//! Admin session
//!
//! A session is the token handed out by the backend on login plus the admin
//! identity that came with it. Where it is kept is up to a [`SessionStore`];
//! whether it still counts is up to a [`SessionValidator`]. [`AuthGate`] ties
//! both together with the login call.

mod gate;
mod store;
mod validator;

pub use gate::{AuthGate, AuthState, Authenticator, LoginError};
pub use store::{MemorySessionStore, SessionError, SessionStore};
pub use validator::{
    validator_from_config, Clock, ExpiryValidator, ManualClock, PresenceValidator,
    SessionValidator, SystemClock,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::AdminIdentity;

/// A logged-in admin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    #[serde(default)]
    pub admin: AdminIdentity,
    /// When the token was stored; absent for sessions saved without it
    #[serde(default)]
    pub issued_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(token: impl Into<String>, admin: AdminIdentity, issued_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            admin,
            issued_at: Some(issued_at),
        }
    }

    /// Bearer token for authenticated calls
    pub fn token(&self) -> &str {
        &self.token
    }
}
