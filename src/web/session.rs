//! Cookie-backed sessions and the admin guard middleware
//!
//! The token, the admin identity and the issue time each live in their own
//! cookie. A store is built per request from the incoming `Cookie` header;
//! writes are collected and turned into `Set-Cookie` headers on the response.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

use super::AppState;
use crate::config::{SessionConfig, ValidatorKind};
use crate::models::AdminIdentity;
use crate::routing::{Access, Route, RouteGuard, LOGIN_PATH};
use crate::session::{AuthState, Session, SessionError, SessionStore};

/// Cookie lifetime when sessions never expire (400 days, the browser cap)
const PERSISTENT_MAX_AGE: u64 = 400 * 24 * 60 * 60;

/// Session store reading request cookies and queueing response cookies
pub struct CookieSessionStore {
    config: SessionConfig,
    incoming: HashMap<String, String>,
    outgoing: Mutex<Vec<String>>,
}

fn parse_cookies(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            Some((name.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}

impl CookieSessionStore {
    pub fn from_headers(headers: &HeaderMap, config: &SessionConfig) -> Self {
        Self {
            config: config.clone(),
            incoming: parse_cookies(headers),
            outgoing: Mutex::new(Vec::new()),
        }
    }

    fn issued_cookie(&self) -> String {
        format!("{}IssuedAt", self.config.token_cookie)
    }

    fn cookie_value(&self, name: &str) -> Option<String> {
        let raw = self.incoming.get(name)?;
        let decoded = urlencoding::decode(raw).ok()?.into_owned();
        (!decoded.is_empty()).then_some(decoded)
    }

    fn max_age(&self) -> u64 {
        match self.config.validator {
            ValidatorKind::Presence => PERSISTENT_MAX_AGE,
            ValidatorKind::Expiry => self.config.max_age_secs,
        }
    }

    fn set_cookie(&self, name: &str, value: &str, max_age: u64) -> Result<(), SessionError> {
        let mut cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            name,
            urlencoding::encode(value),
            max_age
        );
        if self.config.secure_cookies {
            cookie.push_str("; Secure");
        }
        self.outgoing
            .lock()
            .map_err(|e| SessionError::Unavailable(e.to_string()))?
            .push(cookie);
        Ok(())
    }

    /// `Set-Cookie` header values queued by `save` and `clear`
    pub fn set_cookie_headers(&self) -> Vec<HeaderValue> {
        let outgoing = self.outgoing.lock().unwrap_or_else(|e| e.into_inner());
        outgoing
            .iter()
            .filter_map(|cookie| HeaderValue::from_str(cookie).ok())
            .collect()
    }

    /// Attach queued cookies to a response
    pub fn apply(&self, response: impl IntoResponse) -> Response {
        let mut response = response.into_response();
        for value in self.set_cookie_headers() {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
        response
    }
}

impl SessionStore for CookieSessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        let Some(token) = self.cookie_value(&self.config.token_cookie) else {
            return Ok(None);
        };

        let admin = match self.cookie_value(&self.config.admin_cookie) {
            Some(json) => serde_json::from_str::<AdminIdentity>(&json).unwrap_or_else(|e| {
                tracing::debug!(error = %e, "Ignoring malformed admin cookie");
                AdminIdentity::default()
            }),
            None => AdminIdentity::default(),
        };
        let issued_at = self
            .cookie_value(&self.issued_cookie())
            .and_then(|value| DateTime::parse_from_rfc3339(&value).ok())
            .map(|t| t.with_timezone(&Utc));

        Ok(Some(Session {
            token,
            admin,
            issued_at,
        }))
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        let admin = serde_json::to_string(&session.admin)
            .map_err(|e| SessionError::Malformed(e.to_string()))?;
        let max_age = self.max_age();

        self.set_cookie(&self.config.token_cookie, &session.token, max_age)?;
        self.set_cookie(&self.config.admin_cookie, &admin, max_age)?;
        if let Some(issued) = session.issued_at {
            self.set_cookie(&self.issued_cookie(), &issued.to_rfc3339(), max_age)?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        self.set_cookie(&self.config.token_cookie, "", 0)?;
        self.set_cookie(&self.config.admin_cookie, "", 0)?;
        self.set_cookie(&self.issued_cookie(), "", 0)
    }
}

/// Session of the admin making the request
#[derive(Debug, Clone)]
pub struct AdminSession(pub Session);

impl AdminSession {
    pub fn token(&self) -> &str {
        &self.0.token
    }

    pub fn session(&self) -> &Session {
        &self.0
    }
}

impl<S: Send + Sync> FromRequestParts<S> for AdminSession {
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AdminSession>()
            .cloned()
            .ok_or_else(|| Redirect::to(LOGIN_PATH))
    }
}

/// Current auth state of a request
pub fn auth_state(state: &AppState, headers: &HeaderMap) -> AuthState {
    let store = CookieSessionStore::from_headers(headers, &state.config.session);
    state.auth.state(&store)
}

/// Admin guard middleware
///
/// Anonymous requests for protected paths are redirected to the login page;
/// authenticated ones carry an [`AdminSession`] to the handler.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let route = Route::parse(request.uri().path());
    let auth = auth_state(&state, request.headers());

    match RouteGuard::evaluate(&route, &auth) {
        Access::Redirect(to) => {
            tracing::debug!(path = %request.uri().path(), "Redirecting anonymous request");
            Redirect::to(to).into_response()
        }
        Access::Render => {
            if let AuthState::Authenticated(session) = auth {
                request.extensions_mut().insert(AdminSession(session));
            }
            next.run(request).await
        }
    }
}
