//! API error taxonomy.

use crate::transport::TransportError;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Message used when the error body carries no recognizable field.
const DEFAULT_ERROR_MESSAGE: &str = "Request failed";

/// Errors surfaced by the request layer.
#[derive(Error, Debug)]
pub enum ApiError {
    /// No session, no access token, or an expired token. Raised before
    /// any network call; the session has already been cleared and the
    /// sign-in redirect fired.
    #[error("Unauthorized")]
    Unauthorized,

    /// Non-2xx response from the backend. `payload` is the raw response
    /// body as parsed (or text-wrapped) by the executor.
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        payload: serde_json::Value,
    },

    /// The transport could not complete the call at all.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A payload did not deserialize into the expected model.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The fallback orchestrator was handed an empty candidate list.
    #[error("No candidate paths supplied")]
    NoCandidates,
}

/// Result type alias using ApiError.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// HTTP status carried by this error, when there is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for the "this route does not exist on this backend" class of
    /// failures (404 / 405) that the fallback orchestrator skips past.
    pub fn is_route_miss(&self) -> bool {
        matches!(self.status(), Some(404) | Some(405))
    }

    /// Raw response payload, when the backend produced one.
    pub fn payload(&self) -> Option<&serde_json::Value> {
        match self {
            ApiError::Api { payload, .. } => Some(payload),
            _ => None,
        }
    }
}

/// Derive a human-readable message from an error response payload.
///
/// The backend has carried three error shapes across versions; this is
/// the one place that knows about all of them.
pub(crate) fn error_message(payload: &serde_json::Value) -> String {
    if let Some(message) = payload
        .get("errors")
        .and_then(|errors| errors.get(0))
        .and_then(|first| first.get("message"))
        .and_then(|message| message.as_str())
    {
        return message.to_string();
    }
    if let Some(message) = payload.get("message").and_then(|m| m.as_str()) {
        return message.to_string();
    }
    if let Some(message) = payload.get("error").and_then(|m| m.as_str()) {
        return message.to_string();
    }
    DEFAULT_ERROR_MESSAGE.to_string()
}

/// Length + digest summary of a response body, for logging. Bodies can
/// carry operator PII, so logs never get the raw text.
pub(crate) fn summarize_body(body: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    body.hash(&mut hasher);
    format!("len={},digest={:016x}", body.len(), hasher.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_structured_errors_win() {
        let payload = json!({
            "errors": [{ "message": "name is taken" }, { "message": "second" }],
            "message": "validation failed",
            "error": "bad request"
        });
        assert_eq!(error_message(&payload), "name is taken");
    }

    #[test]
    fn test_message_beats_error() {
        let payload = json!({ "message": "validation failed", "error": "bad request" });
        assert_eq!(error_message(&payload), "validation failed");
    }

    #[test]
    fn test_error_field_fallback() {
        let payload = json!({ "error": "bad request" });
        assert_eq!(error_message(&payload), "bad request");
    }

    #[test]
    fn test_default_message() {
        assert_eq!(error_message(&json!({})), DEFAULT_ERROR_MESSAGE);
        assert_eq!(error_message(&json!({ "errors": [] })), DEFAULT_ERROR_MESSAGE);
        assert_eq!(error_message(&json!("plain string")), DEFAULT_ERROR_MESSAGE);
    }

    #[test]
    fn test_route_miss_classification() {
        let miss = ApiError::Api {
            status: 404,
            message: "not found".into(),
            payload: json!({}),
        };
        let denied = ApiError::Api {
            status: 403,
            message: "forbidden".into(),
            payload: json!({}),
        };
        assert!(miss.is_route_miss());
        assert!(!denied.is_route_miss());
        assert!(!ApiError::Unauthorized.is_route_miss());
        assert_eq!(ApiError::Unauthorized.status(), Some(401));
    }
}
