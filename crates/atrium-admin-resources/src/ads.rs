//! Ad placement administration.

use atrium_api_client::{ApiClient, ApiResult, MultipartForm, RequestOptions};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::envelope::{unwrap_data, unwrap_unit};
use crate::{fill_candidates, ListQuery};

const ADS: &[&str] = &["/admin/ads", "/ads"];
const AD: &[&str] = &["/admin/ads/:id", "/ads/:id"];
const AD_STATUS: &[&str] = &["/admin/ads/:id/status", "/ads/:id/status"];

/// Run state of an ad placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdStatus {
    Draft,
    Active,
    Paused,
    #[serde(other)]
    Unknown,
}

/// An ad placement.
#[derive(Debug, Clone, Deserialize)]
pub struct Ad {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub placement: Option<String>,
    #[serde(default = "default_status")]
    pub status: AdStatus,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub target_url: Option<String>,
}

fn default_status() -> AdStatus {
    AdStatus::Draft
}

/// The creative file uploaded with a new ad.
#[derive(Debug, Clone)]
pub struct Creative {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A new ad placement.
#[derive(Debug, Clone)]
pub struct NewAd {
    pub title: String,
    pub placement: String,
    pub target_url: Option<String>,
    pub creative: Option<Creative>,
}

/// Editable ad fields.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AdUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_url: Option<String>,
}

/// Ad administration operations.
pub struct AdsApi {
    client: Arc<ApiClient>,
}

impl AdsApi {
    pub(crate) fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn list(&self, list: &ListQuery) -> ApiResult<Vec<Ad>> {
        let payload = self
            .client
            .request_with_fallback(ADS, RequestOptions::get().with_query(list.to_query()))
            .await?;
        unwrap_data(payload)
    }

    /// Create an ad. A creative upload switches the body to multipart;
    /// the transport owns the boundary header.
    pub async fn create(&self, ad: &NewAd) -> ApiResult<Ad> {
        let options = match &ad.creative {
            Some(creative) => {
                let mut form = MultipartForm::new()
                    .text("title", ad.title.clone())
                    .text("placement", ad.placement.clone());
                if let Some(target_url) = &ad.target_url {
                    form = form.text("target_url", target_url.clone());
                }
                form = form.file(
                    "creative",
                    creative.file_name.clone(),
                    creative.content_type.clone(),
                    creative.bytes.clone(),
                );
                RequestOptions::multipart(form)
            }
            None => RequestOptions::post(json!({
                "title": ad.title,
                "placement": ad.placement,
                "target_url": ad.target_url,
            })),
        };

        let payload = self.client.request_with_fallback(ADS, options).await?;
        unwrap_data(payload)
    }

    pub async fn update(&self, id: u64, update: &AdUpdate) -> ApiResult<Ad> {
        let candidates = fill_candidates(AD, &[("id", &id.to_string())]);
        let payload = self
            .client
            .request_with_fallback(&candidates, RequestOptions::put(serde_json::to_value(update)?))
            .await?;
        unwrap_data(payload)
    }

    /// Transition an ad between draft, active and paused.
    pub async fn set_status(&self, id: u64, status: AdStatus) -> ApiResult<Ad> {
        let candidates = fill_candidates(AD_STATUS, &[("id", &id.to_string())]);
        let payload = self
            .client
            .request_with_fallback(&candidates, RequestOptions::put(json!({ "status": status })))
            .await?;
        unwrap_data(payload)
    }

    pub async fn delete(&self, id: u64) -> ApiResult<()> {
        let candidates = fill_candidates(AD, &[("id", &id.to_string())]);
        let payload = self
            .client
            .request_with_fallback(&candidates, RequestOptions::delete())
            .await?;
        unwrap_unit(payload)
    }
}
