//! Client error taxonomy

/// Failure of a backend call
///
/// Mirrors the three ways a call can go wrong: the request never completed,
/// the backend answered `success: false`, or the resource is not there.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// Transport failure (connection refused, timeout, broken body)
    #[error("Network error: {0}")]
    Network(String),

    /// Backend answered with `success: false`
    #[error("{}", message.as_deref().unwrap_or("Request failed"))]
    Backend {
        status: u16,
        message: Option<String>,
    },

    /// Backend reported the resource missing, or returned no data for it
    #[error("Not found: {0}")]
    NotFound(String),

    /// Response body did not match the envelope shape
    #[error("Invalid response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Message suitable for showing next to a form
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Network(_) => "Network error. Please try again.".to_string(),
            ClientError::Backend { .. } => self.to_string(),
            ClientError::NotFound(_) => "The requested item no longer exists.".to_string(),
            ClientError::Decode(_) => "Unexpected response from the server.".to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Network(e.to_string())
        }
    }
}
