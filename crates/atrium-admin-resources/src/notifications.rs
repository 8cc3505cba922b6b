//! Operator-sent notifications.

use atrium_api_client::{ApiClient, ApiResult, RequestOptions};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::envelope::{unwrap_data, unwrap_unit};
use crate::{fill_candidates, ListQuery};

const NOTIFICATIONS: &[&str] = &["/admin/notifications", "/notifications"];
const NOTIFICATION_READ: &[&str] = &["/admin/notifications/:id/read", "/notifications/:id/read"];
const BROADCAST: &[&str] = &["/admin/notifications/broadcast", "/notifications/broadcast"];

/// A notification delivered to one user or broadcast to all.
#[derive(Debug, Clone, Deserialize)]
pub struct Notification {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    /// Absent for broadcasts.
    #[serde(default)]
    pub user_id: Option<u64>,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Notification operations.
pub struct NotificationsApi {
    client: Arc<ApiClient>,
}

impl NotificationsApi {
    pub(crate) fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn list(&self, list: &ListQuery) -> ApiResult<Vec<Notification>> {
        let payload = self
            .client
            .request_with_fallback(
                NOTIFICATIONS,
                RequestOptions::get().with_query(list.to_query()),
            )
            .await?;
        unwrap_data(payload)
    }

    /// Send a notification to a single user.
    pub async fn send_to_user(&self, user_id: u64, title: &str, body: &str) -> ApiResult<Notification> {
        let payload = self
            .client
            .request_with_fallback(
                NOTIFICATIONS,
                RequestOptions::post(json!({ "user_id": user_id, "title": title, "body": body })),
            )
            .await?;
        unwrap_data(payload)
    }

    /// Send a notification to every user.
    pub async fn broadcast(&self, title: &str, body: &str) -> ApiResult<()> {
        let payload = self
            .client
            .request_with_fallback(
                BROADCAST,
                RequestOptions::post(json!({ "title": title, "body": body })),
            )
            .await?;
        unwrap_unit(payload)
    }

    /// Mark a notification as read.
    pub async fn mark_read(&self, id: u64) -> ApiResult<()> {
        let candidates = fill_candidates(NOTIFICATION_READ, &[("id", &id.to_string())]);
        let payload = self
            .client
            .request_with_fallback(&candidates, RequestOptions::put(json!({})))
            .await?;
        unwrap_unit(payload)
    }
}
