//! Shop product administration.

use atrium_api_client::{ApiClient, ApiResult, RequestOptions};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::envelope::unwrap_data;
use crate::{fill_candidates, ListQuery};

const PRODUCTS: &[&str] = &["/admin/shop/products", "/shop/products", "/products"];
const PRODUCT: &[&str] = &["/admin/shop/products/:id", "/shop/products/:id", "/products/:id"];
const PRODUCT_STATUS: &[&str] = &["/admin/shop/products/:id/status", "/shop/products/:id/status"];

/// Listing state of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Listed,
    Hidden,
    SoldOut,
    #[serde(other)]
    Unknown,
}

/// A product sold through the platform shop.
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    /// Price in the smallest currency unit.
    pub price_cents: u64,
    #[serde(default)]
    pub stock: Option<u64>,
    #[serde(default = "default_status")]
    pub status: ProductStatus,
}

fn default_status() -> ProductStatus {
    ProductStatus::Hidden
}

/// Editable product fields.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_cents: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u64>,
}

/// Shop administration operations.
pub struct ShopApi {
    client: Arc<ApiClient>,
}

impl ShopApi {
    pub(crate) fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn list(&self, list: &ListQuery) -> ApiResult<Vec<Product>> {
        let payload = self
            .client
            .request_with_fallback(PRODUCTS, RequestOptions::get().with_query(list.to_query()))
            .await?;
        unwrap_data(payload)
    }

    pub async fn get(&self, id: u64) -> ApiResult<Product> {
        let candidates = fill_candidates(PRODUCT, &[("id", &id.to_string())]);
        let payload = self
            .client
            .request_with_fallback(&candidates, RequestOptions::get())
            .await?;
        unwrap_data(payload)
    }

    pub async fn update(&self, id: u64, update: &ProductUpdate) -> ApiResult<Product> {
        let candidates = fill_candidates(PRODUCT, &[("id", &id.to_string())]);
        let payload = self
            .client
            .request_with_fallback(&candidates, RequestOptions::put(serde_json::to_value(update)?))
            .await?;
        unwrap_data(payload)
    }

    /// Transition a product between listed, hidden and sold out.
    pub async fn set_status(&self, id: u64, status: ProductStatus) -> ApiResult<Product> {
        let candidates = fill_candidates(PRODUCT_STATUS, &[("id", &id.to_string())]);
        let payload = self
            .client
            .request_with_fallback(&candidates, RequestOptions::put(json!({ "status": status })))
            .await?;
        unwrap_data(payload)
    }
}
