//! Static page (CMS) administration.

use atrium_api_client::{ApiClient, ApiResult, RequestOptions};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::envelope::unwrap_data;
use crate::fill_candidates;

const PAGES: &[&str] = &["/admin/pages", "/pages"];
const PAGE: &[&str] = &["/admin/pages/:slug", "/pages/:slug"];
const PAGE_PUBLISH: &[&str] = &["/admin/pages/:slug/publish", "/pages/:slug/publish"];

/// A static content page (terms, privacy, FAQ, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct CmsPage {
    pub id: u64,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Editable page fields.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// CMS page operations.
pub struct CmsApi {
    client: Arc<ApiClient>,
}

impl CmsApi {
    pub(crate) fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> ApiResult<Vec<CmsPage>> {
        let payload = self
            .client
            .request_with_fallback(PAGES, RequestOptions::get())
            .await?;
        unwrap_data(payload)
    }

    pub async fn get(&self, slug: &str) -> ApiResult<CmsPage> {
        let candidates = fill_candidates(PAGE, &[("slug", slug)]);
        let payload = self
            .client
            .request_with_fallback(&candidates, RequestOptions::get())
            .await?;
        unwrap_data(payload)
    }

    pub async fn update(&self, slug: &str, update: &PageUpdate) -> ApiResult<CmsPage> {
        let candidates = fill_candidates(PAGE, &[("slug", slug)]);
        let payload = self
            .client
            .request_with_fallback(&candidates, RequestOptions::put(serde_json::to_value(update)?))
            .await?;
        unwrap_data(payload)
    }

    /// Publish or unpublish a page.
    pub async fn set_published(&self, slug: &str, published: bool) -> ApiResult<CmsPage> {
        let candidates = fill_candidates(PAGE_PUBLISH, &[("slug", slug)]);
        let payload = self
            .client
            .request_with_fallback(&candidates, RequestOptions::put(json!({ "published": published })))
            .await?;
        unwrap_data(payload)
    }
}
