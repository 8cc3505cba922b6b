//! Sign-in and sign-out.
//!
//! Signing in is the one unauthenticated call the console makes; the
//! returned tokens become the stored [`Session`] that gates everything
//! else.

use atrium_api_client::{ApiClient, ApiError, ApiResult, RequestOptions};
use atrium_session_store::{Session, SessionStore};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::envelope::unwrap_data;

const SIGN_IN: &[&str] = &["/auth/sign-in", "/auth/login"];
const SIGN_OUT: &[&str] = &["/auth/sign-out", "/auth/logout"];

#[derive(Debug, Deserialize)]
struct TokenGrant {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    user: Option<serde_json::Value>,
}

/// Authentication operations.
pub struct AuthApi {
    client: Arc<ApiClient>,
}

impl AuthApi {
    pub(crate) fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Exchange credentials for tokens and persist the session.
    pub async fn sign_in(&self, email: &str, password: &str) -> ApiResult<Session> {
        let payload = self
            .client
            .request_with_fallback(
                SIGN_IN,
                RequestOptions::post(json!({ "email": email, "password": password }))
                    .unauthenticated(),
            )
            .await?;

        let grant: TokenGrant = unwrap_data(payload)?;
        let session = Session {
            email: email.to_string(),
            access_token: Some(grant.access_token),
            refresh_token: grant.refresh_token,
            profile: grant.user,
            created_at: None,
        };

        if let Err(e) = self.client.session().set(&session) {
            tracing::warn!(error = %e, "Failed to persist session");
        }
        info!(email, "Operator signed in");
        Ok(session)
    }

    /// Clear the stored session, telling the backend on a best-effort
    /// basis first.
    pub async fn sign_out(&self) -> ApiResult<()> {
        let result = if self.client.session().is_authenticated() {
            self.client
                .request_with_fallback(SIGN_OUT, RequestOptions::post(json!({})))
                .await
                .map(|_| ())
        } else {
            Ok(())
        };
        // The local session goes away regardless of what the backend said.
        self.client.session().clear();
        info!("Operator signed out");
        match result {
            // Older deployments have no sign-out route at all, and a
            // token the backend already rejects still means signed out.
            Err(err) if err.is_route_miss() => Ok(()),
            Err(ApiError::Unauthorized) => Ok(()),
            other => other,
        }
    }
}
