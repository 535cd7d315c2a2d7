//! Path classification and the admin guard
//!
//! Public pages never consult the session. Everything under `/admin` except
//! the login page is protected: an authenticated visitor gets the page, an
//! anonymous one is sent to the login page. Only token presence is checked
//! here; the backend is not asked whether the token is still good.

mod nav;

pub use nav::{admin_nav, public_nav, AdminSection, NavItem};

use crate::session::AuthState;

/// Login page path
pub const LOGIN_PATH: &str = "/admin/login";

/// Admin dashboard path
pub const ADMIN_ROOT: &str = "/admin";

/// What a request path points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Portfolio,
    About,
    Blog,
    BlogPost(String),
    Contact,
    Login,
    /// A protected admin path; `None` when no section claims it
    Admin(Option<AdminSection>),
    NotFound,
}

/// Outcome of the guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Render,
    Redirect(&'static str),
}

/// Whether `path` equals `base` or continues it with a new segment
pub(crate) fn has_segment_prefix(path: &str, base: &str) -> bool {
    match path.strip_prefix(base) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

impl Route {
    /// Classify a request path; query strings must already be stripped
    pub fn parse(path: &str) -> Route {
        let trimmed = path.trim_end_matches('/');
        let path = if trimmed.is_empty() { "/" } else { trimmed };

        if path == LOGIN_PATH {
            return Route::Login;
        }
        if has_segment_prefix(path, ADMIN_ROOT) {
            return Route::Admin(AdminSection::from_path(path));
        }

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Route::Home,
            ["portfolio"] => Route::Portfolio,
            ["about"] => Route::About,
            ["blog"] => Route::Blog,
            ["blog", id] => Route::BlogPost((*id).to_string()),
            ["contact"] => Route::Contact,
            _ => Route::NotFound,
        }
    }

    pub fn requires_auth(&self) -> bool {
        matches!(self, Route::Admin(_))
    }
}

/// The admin gate as a pure function of route and auth state
pub struct RouteGuard;

impl RouteGuard {
    pub fn evaluate(route: &Route, state: &AuthState) -> Access {
        if route.requires_auth() && !state.is_authenticated() {
            Access::Redirect(LOGIN_PATH)
        } else {
            Access::Render
        }
    }
}
