//! Event creator application review.

use atrium_api_client::{ApiClient, ApiResult, RequestOptions};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::envelope::unwrap_data;
use crate::{fill_candidates, ListQuery};

const CREATORS: &[&str] = &["/admin/event-creators", "/event-creators", "/creators"];
const CREATOR_APPROVE: &[&str] = &["/admin/event-creators/:id/approve", "/event-creators/:id/approve"];
const CREATOR_REJECT: &[&str] = &["/admin/event-creators/:id/reject", "/event-creators/:id/reject"];

/// Review state of a creator application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreatorStatus {
    Pending,
    Approved,
    Rejected,
    #[serde(other)]
    Unknown,
}

/// A user applying to host events on the platform.
#[derive(Debug, Clone, Deserialize)]
pub struct EventCreator {
    pub id: u64,
    pub user_id: u64,
    pub display_name: String,
    #[serde(default = "default_status")]
    pub status: CreatorStatus,
    #[serde(default)]
    pub applied_at: Option<String>,
}

fn default_status() -> CreatorStatus {
    CreatorStatus::Pending
}

/// Creator review operations.
pub struct CreatorsApi {
    client: Arc<ApiClient>,
}

impl CreatorsApi {
    pub(crate) fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn list(&self, list: &ListQuery, status: Option<CreatorStatus>) -> ApiResult<Vec<EventCreator>> {
        let mut query = list.to_query();
        if let Some(status) = status {
            query.push("status", status_param(status));
        }
        let payload = self
            .client
            .request_with_fallback(CREATORS, RequestOptions::get().with_query(query))
            .await?;
        unwrap_data(payload)
    }

    /// Approve a creator application.
    pub async fn approve(&self, id: u64) -> ApiResult<EventCreator> {
        let candidates = fill_candidates(CREATOR_APPROVE, &[("id", &id.to_string())]);
        let payload = self
            .client
            .request_with_fallback(&candidates, RequestOptions::post(json!({})))
            .await?;
        unwrap_data(payload)
    }

    /// Reject a creator application with a reason shown to the applicant.
    pub async fn reject(&self, id: u64, reason: &str) -> ApiResult<EventCreator> {
        let candidates = fill_candidates(CREATOR_REJECT, &[("id", &id.to_string())]);
        let payload = self
            .client
            .request_with_fallback(&candidates, RequestOptions::post(json!({ "reason": reason })))
            .await?;
        unwrap_data(payload)
    }
}

fn status_param(status: CreatorStatus) -> &'static str {
    match status {
        CreatorStatus::Pending => "pending",
        CreatorStatus::Approved => "approved",
        CreatorStatus::Rejected => "rejected",
        CreatorStatus::Unknown => "unknown",
    }
}
