//! Subscription plan and subscriber administration.

use atrium_api_client::{ApiClient, ApiResult, RequestOptions};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::envelope::{unwrap_data, unwrap_unit};
use crate::{fill_candidates, ListQuery};

const PLANS: &[&str] = &["/admin/subscription-plans", "/subscription-plans", "/plans"];
const PLAN: &[&str] = &["/admin/subscription-plans/:id", "/subscription-plans/:id", "/plans/:id"];
const SUBSCRIBERS: &[&str] = &["/admin/subscriptions", "/subscriptions"];
const CANCEL: &[&str] = &["/admin/subscriptions/:id/cancel", "/subscriptions/:id/cancel"];

/// A purchasable subscription plan.
#[derive(Debug, Clone, Deserialize)]
pub struct Plan {
    pub id: u64,
    pub name: String,
    /// Price in the smallest currency unit.
    pub price_cents: u64,
    #[serde(default)]
    pub interval: Option<String>,
    #[serde(default)]
    pub active: bool,
}

/// One user's subscription to a plan.
#[derive(Debug, Clone, Deserialize)]
pub struct Subscriber {
    pub id: u64,
    pub user_id: u64,
    pub plan_id: u64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub started_at: Option<String>,
}

/// Editable plan fields.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlanUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_cents: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// Subscription administration operations.
pub struct SubscriptionsApi {
    client: Arc<ApiClient>,
}

impl SubscriptionsApi {
    pub(crate) fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn list_plans(&self) -> ApiResult<Vec<Plan>> {
        let payload = self
            .client
            .request_with_fallback(PLANS, RequestOptions::get())
            .await?;
        unwrap_data(payload)
    }

    pub async fn update_plan(&self, id: u64, update: &PlanUpdate) -> ApiResult<Plan> {
        let candidates = fill_candidates(PLAN, &[("id", &id.to_string())]);
        let payload = self
            .client
            .request_with_fallback(&candidates, RequestOptions::put(serde_json::to_value(update)?))
            .await?;
        unwrap_data(payload)
    }

    pub async fn list_subscribers(&self, list: &ListQuery) -> ApiResult<Vec<Subscriber>> {
        let payload = self
            .client
            .request_with_fallback(
                SUBSCRIBERS,
                RequestOptions::get().with_query(list.to_query()),
            )
            .await?;
        unwrap_data(payload)
    }

    /// Cancel a subscription on the subscriber's behalf.
    pub async fn cancel(&self, id: u64) -> ApiResult<()> {
        let candidates = fill_candidates(CANCEL, &[("id", &id.to_string())]);
        let payload = self
            .client
            .request_with_fallback(&candidates, RequestOptions::post(serde_json::json!({})))
            .await?;
        unwrap_unit(payload)
    }
}
