//! Session persistence

use std::sync::Mutex;

use super::Session;

/// Failure to read or write stored session data
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Stored session is malformed: {0}")]
    Malformed(String),

    #[error("Session storage unavailable: {0}")]
    Unavailable(String),
}

/// Durable storage for at most one session
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<Session>, SessionError>;

    fn save(&self, session: &Session) -> Result<(), SessionError>;

    fn clear(&self) -> Result<(), SessionError>;
}

/// Process-local store, used by tests and tools
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        self.session
            .lock()
            .map(|s| s.clone())
            .map_err(|e| SessionError::Unavailable(e.to_string()))
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        let mut slot = self
            .session
            .lock()
            .map_err(|e| SessionError::Unavailable(e.to_string()))?;
        *slot = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        let mut slot = self
            .session
            .lock()
            .map_err(|e| SessionError::Unavailable(e.to_string()))?;
        *slot = None;
        Ok(())
    }
}
