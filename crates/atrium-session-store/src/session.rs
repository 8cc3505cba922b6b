//! The persisted session model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authentication state held by the console client.
///
/// Created on sign-in and persisted until sign-out or until the backend
/// rejects the credentials. `created_at` is stamped by the store on `set`;
/// callers never supply it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Operator email used at sign-in.
    pub email: String,
    /// Bearer access token attached to authenticated requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Refresh token, when the backend issued one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Cached operator profile as returned by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<serde_json::Value>,
    /// When the session was stored.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Create a session with just an email and access token.
    pub fn new(email: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            access_token: Some(access_token.into()),
            refresh_token: None,
            profile: None,
            created_at: None,
        }
    }
}
