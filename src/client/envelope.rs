//! Response envelope decoding
//!
//! Every backend response is wrapped as `{success, data?, error?}`. The
//! envelope is decoded once here so call sites only ever see
//! `Result<Option<T>, ClientError>`.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::ClientError;

/// Wire shape of every backend response
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    /// Some endpoints put their failure text here instead of `error`
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// Turn the envelope into a result, given the HTTP status it came with
    pub fn into_result(self, status: StatusCode) -> Result<Option<T>, ClientError> {
        if self.success {
            return Ok(self.data);
        }

        let message = self.error.or(self.message);
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(
                message.unwrap_or_else(|| "Resource not found".to_string()),
            ));
        }

        Err(ClientError::Backend {
            status: status.as_u16(),
            message,
        })
    }
}

/// Decode a raw response body
pub fn decode<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<Option<T>, ClientError> {
    match serde_json::from_slice::<Envelope<T>>(body) {
        Ok(envelope) => envelope.into_result(status),
        Err(e) if status == StatusCode::NOT_FOUND => Err(ClientError::NotFound(e.to_string())),
        Err(e) if !status.is_success() => Err(ClientError::Decode(format!(
            "{} with a non-envelope body: {}",
            status, e
        ))),
        Err(e) => Err(ClientError::Decode(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        name: String,
    }

    #[test]
    fn test_success_with_data() {
        let body = br#"{"success": true, "data": [{"name": "a"}, {"name": "b"}]}"#;
        let items: Option<Vec<Item>> = decode(StatusCode::OK, body).unwrap();
        assert_eq!(items.unwrap().len(), 2);
    }

    #[test]
    fn test_success_without_data() {
        let body = br#"{"success": true}"#;
        let item: Option<Item> = decode(StatusCode::OK, body).unwrap();
        assert!(item.is_none());
    }

    #[test]
    fn test_backend_failure_carries_error_text() {
        let body = br#"{"success": false, "error": "Invalid credentials"}"#;
        let err = decode::<Item>(StatusCode::UNAUTHORIZED, body).unwrap_err();
        assert_eq!(
            err,
            ClientError::Backend {
                status: 401,
                message: Some("Invalid credentials".to_string())
            }
        );
        assert_eq!(err.to_string(), "Invalid credentials");
    }

    #[test]
    fn test_backend_failure_falls_back_to_message_field() {
        let body = br#"{"success": false, "message": "Title is required"}"#;
        let err = decode::<Item>(StatusCode::BAD_REQUEST, body).unwrap_err();
        assert_eq!(err.to_string(), "Title is required");
    }

    #[test]
    fn test_backend_failure_without_text() {
        let body = br#"{"success": false}"#;
        let err = decode::<Item>(StatusCode::OK, body).unwrap_err();
        assert_eq!(err.to_string(), "Request failed");
    }

    #[test]
    fn test_not_found_status() {
        let body = br#"{"success": false, "error": "Blog not found"}"#;
        let err = decode::<Item>(StatusCode::NOT_FOUND, body).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_non_json_error_page() {
        let err = decode::<Item>(StatusCode::BAD_GATEWAY, b"<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
        assert_eq!(err.user_message(), "Unexpected response from the server.");
    }

    #[test]
    fn test_malformed_success_body() {
        let err = decode::<Item>(StatusCode::OK, b"not json").unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }
}
