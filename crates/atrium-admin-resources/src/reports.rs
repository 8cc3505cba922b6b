//! Abuse report triage.

use atrium_api_client::{ApiClient, ApiError, ApiResult, RequestOptions};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

use crate::envelope::unwrap_data;
use crate::{fill_candidates, ListQuery};

const REPORTS: &[&str] = &["/admin/reports", "/reports"];
const REPORT: &[&str] = &["/admin/reports/:id", "/reports/:id"];
const REPORT_STATE: &[&str] = &["/admin/reports/:id/state", "/admin/reports/:id/status", "/reports/:id/status"];

/// Triage state of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportState {
    Open,
    Resolved,
    Dismissed,
    #[serde(other)]
    Unknown,
}

/// An abuse report filed against some piece of content.
#[derive(Debug, Clone, Deserialize)]
pub struct Report {
    pub id: u64,
    pub reporter_id: u64,
    pub subject_type: String,
    pub subject_id: u64,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default = "default_state")]
    pub state: ReportState,
    #[serde(default)]
    pub created_at: Option<String>,
}

fn default_state() -> ReportState {
    ReportState::Open
}

/// Filter for the reports list.
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub list: ListQuery,
    pub state: Option<ReportState>,
}

/// Report triage operations.
pub struct ReportsApi {
    client: Arc<ApiClient>,
}

impl ReportsApi {
    pub(crate) fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn list(&self, filter: &ReportFilter) -> ApiResult<Vec<Report>> {
        let mut query = filter.list.to_query();
        if let Some(state) = filter.state {
            query.push("state", state_param(state));
        }
        let payload = self
            .client
            .request_with_fallback(REPORTS, RequestOptions::get().with_query(query))
            .await?;
        unwrap_data(payload)
    }

    pub async fn get(&self, id: u64) -> ApiResult<Report> {
        let candidates = fill_candidates(REPORT, &[("id", &id.to_string())]);
        let payload = self
            .client
            .request_with_fallback(&candidates, RequestOptions::get())
            .await?;
        unwrap_data(payload)
    }

    /// Mark a report handled.
    pub async fn resolve(&self, id: u64, note: Option<&str>) -> ApiResult<Report> {
        self.set_state(id, ReportState::Resolved, note).await
    }

    /// Discard a report without action.
    pub async fn dismiss(&self, id: u64, note: Option<&str>) -> ApiResult<Report> {
        self.set_state(id, ReportState::Dismissed, note).await
    }

    /// Transition a report, probing the body key different backend
    /// versions expect (`state` vs `status`) around the path fallback.
    async fn set_state(&self, id: u64, state: ReportState, note: Option<&str>) -> ApiResult<Report> {
        let candidates = fill_candidates(REPORT_STATE, &[("id", &id.to_string())]);

        let mut last_err: Option<ApiError> = None;
        for body in state_bodies(state, note) {
            match self
                .client
                .request_with_fallback(&candidates, RequestOptions::put(body))
                .await
            {
                Ok(payload) => return unwrap_data(payload),
                Err(err) if err.is_route_miss() => {
                    debug!(id, status = ?err.status(), "Report transition shape rejected, trying next");
                    last_err = Some(err);
                }
                Err(err) => return Err(err),
            }
        }
        Err(last_err.expect("at least one body shape was attempted"))
    }
}

fn state_param(state: ReportState) -> &'static str {
    match state {
        ReportState::Open => "open",
        ReportState::Resolved => "resolved",
        ReportState::Dismissed => "dismissed",
        ReportState::Unknown => "unknown",
    }
}

/// Body shapes for a state transition, preferred shape first.
fn state_bodies(state: ReportState, note: Option<&str>) -> Vec<Value> {
    let state = state_param(state);
    vec![
        json!({ "state": state, "note": note }),
        json!({ "status": state, "note": note }),
    ]
}
