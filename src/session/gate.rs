//! Authentication gate
//!
//! Two states: anonymous and authenticated. The state is never cached; it is
//! derived from the store every time it is asked for, so clearing the store
//! is enough to log out.

use async_trait::async_trait;
use std::sync::Arc;

use super::{Clock, Session, SessionError, SessionStore, SessionValidator};
use crate::client::{ApiClient, ClientError};
use crate::models::{LoginData, LoginRequest};
use crate::routing::LOGIN_PATH;

/// Exchanges credentials for a token
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, credentials: &LoginRequest) -> Result<LoginData, ClientError>;
}

#[async_trait]
impl Authenticator for ApiClient {
    async fn authenticate(&self, credentials: &LoginRequest) -> Result<LoginData, ClientError> {
        self.login(credentials).await
    }
}

/// Whether a visitor is logged in
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Anonymous,
    Authenticated(Session),
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthState::Authenticated(session) => Some(session),
            AuthState::Anonymous => None,
        }
    }
}

/// Login failure, worded for the login form
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    /// Backend refused the credentials; carries its message
    #[error("{0}")]
    Rejected(String),

    #[error("Network error. Please try again.")]
    Network,

    #[error("Could not store session: {0}")]
    Storage(#[from] SessionError),
}

impl From<ClientError> for LoginError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::Network(_) | ClientError::Decode(_) => LoginError::Network,
            ClientError::Backend {
                message: Some(message),
                ..
            } => LoginError::Rejected(message),
            _ => LoginError::Rejected("Login failed".to_string()),
        }
    }
}

/// Login, logout and state checks over an injected store
#[derive(Clone)]
pub struct AuthGate {
    authenticator: Arc<dyn Authenticator>,
    validator: Arc<dyn SessionValidator>,
    clock: Arc<dyn Clock>,
}

impl AuthGate {
    pub fn new(
        authenticator: Arc<dyn Authenticator>,
        validator: Arc<dyn SessionValidator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            authenticator,
            validator,
            clock,
        }
    }

    /// Current state as stored in `store`
    ///
    /// Unreadable session data counts as anonymous.
    pub fn state(&self, store: &dyn SessionStore) -> AuthState {
        match store.load() {
            Ok(Some(session)) if self.validator.is_valid(&session, self.clock.now()) => {
                AuthState::Authenticated(session)
            }
            Ok(_) => AuthState::Anonymous,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable session");
                AuthState::Anonymous
            }
        }
    }

    /// Exchange credentials for a session and persist it
    ///
    /// On failure nothing is written and the state stays anonymous.
    pub async fn login(
        &self,
        store: &dyn SessionStore,
        credentials: &LoginRequest,
    ) -> Result<Session, LoginError> {
        let data = self.authenticator.authenticate(credentials).await.map_err(|e| {
            tracing::info!(email = %credentials.email, error = %e, "Login rejected");
            LoginError::from(e)
        })?;

        let session = Session::new(data.token, data.admin, self.clock.now());
        store.save(&session)?;
        tracing::info!(admin = %session.admin.display_name(), "Admin logged in");
        Ok(session)
    }

    /// Forget the stored session; returns where to navigate next
    pub fn logout(&self, store: &dyn SessionStore) -> &'static str {
        if let Err(e) = store.clear() {
            tracing::warn!(error = %e, "Failed to clear session");
        }
        LOGIN_PATH
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AdminIdentity;
    use crate::routing::{Access, Route, RouteGuard};
    use crate::session::{MemorySessionStore, PresenceValidator, SystemClock};
    use std::sync::Mutex;

    /// Answers every login with a fixed result and counts calls
    struct StubAuthenticator {
        result: Result<LoginData, ClientError>,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Authenticator for StubAuthenticator {
        async fn authenticate(&self, credentials: &LoginRequest) -> Result<LoginData, ClientError> {
            self.calls.lock().unwrap().push(credentials.email.clone());
            self.result.clone()
        }
    }

    fn gate(result: Result<LoginData, ClientError>) -> AuthGate {
        let authenticator = StubAuthenticator {
            result,
            calls: Mutex::new(Vec::new()),
        };
        AuthGate::new(
            Arc::new(authenticator),
            Arc::new(PresenceValidator),
            Arc::new(SystemClock),
        )
    }

    fn credentials(password: &str) -> LoginRequest {
        LoginRequest {
            email: "admin@x.com".into(),
            password: password.into(),
        }
    }

    fn accepted() -> Result<LoginData, ClientError> {
        Ok(LoginData {
            token: "tok-1".into(),
            admin: AdminIdentity {
                email: Some("admin@x.com".into()),
                ..AdminIdentity::default()
            },
        })
    }

    #[tokio::test]
    async fn test_successful_login_persists_session() {
        let gate = gate(accepted());
        let store = MemorySessionStore::new();

        let session = gate.login(&store, &credentials("right")).await.unwrap();
        assert_eq!(session.token, "tok-1");
        assert!(session.issued_at.is_some());
        assert_eq!(gate.state(&store), AuthState::Authenticated(session));
    }

    #[tokio::test]
    async fn test_invalid_credentials_stay_anonymous() {
        let gate = gate(Err(ClientError::Backend {
            status: 401,
            message: Some("Invalid credentials".into()),
        }));
        let store = MemorySessionStore::new();

        let err = gate.login(&store, &credentials("wrong")).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");
        assert_eq!(gate.state(&store), AuthState::Anonymous);
        assert!(store.load().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rejection_without_message() {
        let gate = gate(Err(ClientError::Backend {
            status: 400,
            message: None,
        }));
        let err = gate
            .login(&MemorySessionStore::new(), &credentials("wrong"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Login failed");
    }

    #[tokio::test]
    async fn test_network_failure_message() {
        let gate = gate(Err(ClientError::Network("refused".into())));
        let err = gate
            .login(&MemorySessionStore::new(), &credentials("x"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Network error. Please try again.");
    }

    #[tokio::test]
    async fn test_unreadable_response_reads_as_network_error() {
        let body: &[u8] = b"<html>502 Bad Gateway</html>";
        let gate = gate(Err(crate::client::decode::<LoginData>(
            reqwest::StatusCode::BAD_GATEWAY,
            body,
        )
        .unwrap_err()));
        let err = gate
            .login(&MemorySessionStore::new(), &credentials("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, LoginError::Network));
        assert_eq!(err.to_string(), "Network error. Please try again.");
    }

    #[tokio::test]
    async fn test_logout_then_guard_redirects() {
        let gate = gate(accepted());
        let store = MemorySessionStore::new();
        gate.login(&store, &credentials("right")).await.unwrap();

        let route = Route::parse("/admin/blogs");
        assert_eq!(RouteGuard::evaluate(&route, &gate.state(&store)), Access::Render);

        assert_eq!(gate.logout(&store), LOGIN_PATH);
        assert_eq!(
            RouteGuard::evaluate(&route, &gate.state(&store)),
            Access::Redirect(LOGIN_PATH)
        );
    }
}
