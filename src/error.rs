//! Request-level errors and their HTTP mapping.

use axum::http::StatusCode;
use thiserror::Error;

use crate::stream::StreamError;

/// Errors surfaced by the router and publisher.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Body absent, unparseable, or missing `message`.
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// Selector names no configured destination.
    #[error("unknown destination: {0}")]
    UnknownDestination(String),

    /// The stream service failed; not retried.
    #[error("publish failed: {0}")]
    PublishFailed(#[from] StreamError),

    #[error("unsupported method: {0}")]
    UnsupportedMethod(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            RelayError::UnknownDestination(_) => StatusCode::BAD_REQUEST,
            RelayError::PublishFailed(_) => StatusCode::BAD_GATEWAY,
            RelayError::UnsupportedMethod(_) => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON error body.
    pub fn body(&self) -> String {
        serde_json::json!({ "error": self.to_string() }).to_string()
    }
}

/// Result type for relay operations.
pub type RelayResult<T> = Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(RelayError::MalformedRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(RelayError::UnknownDestination("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            RelayError::from(StreamError::Transport("down".into())).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(RelayError::UnsupportedMethod("PUT".into()).status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn test_error_body_is_json() {
        let body = RelayError::UnknownDestination("rust".into()).body();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["error"], "unknown destination: rust");
    }
}
