//! Error types for the inventory SDK.

use serde::{Deserialize, Serialize};

/// Result type for SDK operations.
pub type InventoryResult<T> = Result<T, InventoryError>;

/// Error types that can occur when talking to the inventory API.
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error (status {status}): {message}")]
    Api {
        status: u16,
        message: String,
        code: Option<String>,
    },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Connection timeout.
    #[error("Request timed out")]
    Timeout,

    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Resource not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl InventoryError {
    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) | Self::Timeout => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Create an error from a status code and response body.
    pub fn from_response(status: u16, body: &str) -> Self {
        let (message, code) = match serde_json::from_str::<ErrorResponse>(body) {
            Ok(error_response) => (error_response.message, error_response.code),
            Err(_) => (body.to_string(), None),
        };

        match status {
            401 | 403 => Self::Authentication(message),
            404 => Self::NotFound(message),
            _ => Self::Api {
                status,
                message,
                code,
            },
        }
    }
}

/// Error body returned by the inventory API.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_response_parses_json_body() {
        let err = InventoryError::from_response(
            422,
            r#"{"code":"API_INVALID_INPUT","message":"Unknown column"}"#,
        );
        match err {
            InventoryError::Api {
                status,
                message,
                code,
            } => {
                assert_eq!(status, 422);
                assert_eq!(message, "Unknown column");
                assert_eq!(code.as_deref(), Some("API_INVALID_INPUT"));
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_response_plain_body() {
        let err = InventoryError::from_response(500, "boom");
        assert!(matches!(err, InventoryError::Api { status: 500, ref message, .. } if message == "boom"));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_auth_and_not_found_statuses() {
        assert!(matches!(
            InventoryError::from_response(401, "{\"message\":\"bad token\"}"),
            InventoryError::Authentication(m) if m == "bad token"
        ));
        assert!(matches!(
            InventoryError::from_response(404, "missing"),
            InventoryError::NotFound(_)
        ));
    }

    #[test]
    fn test_client_errors_not_retryable() {
        assert!(!InventoryError::from_response(400, "bad").is_retryable());
        assert!(InventoryError::from_response(429, "slow down").is_retryable());
        assert!(!InventoryError::Config("x".to_string()).is_retryable());
    }
}
