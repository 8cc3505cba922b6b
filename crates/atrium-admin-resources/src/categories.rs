//! Content category administration.

use atrium_api_client::{ApiClient, ApiResult, RequestOptions};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::envelope::{unwrap_data, unwrap_unit};
use crate::fill_candidates;

const CATEGORIES: &[&str] = &["/admin/categories", "/categories"];
const CATEGORY: &[&str] = &["/admin/categories/:id", "/categories/:id"];

/// A content category.
#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub event_count: Option<u64>,
}

/// Category administration operations.
pub struct CategoriesApi {
    client: Arc<ApiClient>,
}

impl CategoriesApi {
    pub(crate) fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> ApiResult<Vec<Category>> {
        let payload = self
            .client
            .request_with_fallback(CATEGORIES, RequestOptions::get())
            .await?;
        unwrap_data(payload)
    }

    pub async fn create(&self, name: &str) -> ApiResult<Category> {
        let payload = self
            .client
            .request_with_fallback(CATEGORIES, RequestOptions::post(json!({ "name": name })))
            .await?;
        unwrap_data(payload)
    }

    pub async fn rename(&self, id: u64, name: &str) -> ApiResult<Category> {
        let candidates = fill_candidates(CATEGORY, &[("id", &id.to_string())]);
        let payload = self
            .client
            .request_with_fallback(&candidates, RequestOptions::put(json!({ "name": name })))
            .await?;
        unwrap_data(payload)
    }

    pub async fn delete(&self, id: u64) -> ApiResult<()> {
        let candidates = fill_candidates(CATEGORY, &[("id", &id.to_string())]);
        let payload = self
            .client
            .request_with_fallback(&candidates, RequestOptions::delete())
            .await?;
        unwrap_unit(payload)
    }
}
