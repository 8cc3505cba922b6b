//! Typed resource modules for the Atrium admin console.
//!
//! One module per backend resource, each mapping a domain operation to an
//! ordered list of candidate endpoint shapes issued through
//! [`atrium_api_client::ApiClient::request_with_fallback`]. Responses are
//! normalized at a single point ([`envelope::unwrap_data`]) before
//! deserializing into the module's models.
//!
//! [`ConsoleApi`] is the entry point a view layer holds:
//!
//! ```ignore
//! let api = ConsoleApi::new(client);
//! let users = api.users().list(&UserFilter::default()).await?;
//! api.reports().resolve(report.id, Some("duplicate")).await?;
//! ```

mod envelope;
mod list;

pub mod ads;
pub mod auth;
pub mod categories;
pub mod chat;
pub mod cms;
pub mod creators;
pub mod notifications;
pub mod reports;
pub mod shop;
pub mod subscriptions;
pub mod users;

pub use envelope::unwrap_data;
pub use list::ListQuery;

use atrium_api_client::{fill_path, ApiClient};
use std::sync::Arc;

/// Facade over every resource module.
#[derive(Clone)]
pub struct ConsoleApi {
    client: Arc<ApiClient>,
}

impl ConsoleApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub fn auth(&self) -> auth::AuthApi {
        auth::AuthApi::new(self.client.clone())
    }

    pub fn users(&self) -> users::UsersApi {
        users::UsersApi::new(self.client.clone())
    }

    pub fn categories(&self) -> categories::CategoriesApi {
        categories::CategoriesApi::new(self.client.clone())
    }

    pub fn subscriptions(&self) -> subscriptions::SubscriptionsApi {
        subscriptions::SubscriptionsApi::new(self.client.clone())
    }

    pub fn reports(&self) -> reports::ReportsApi {
        reports::ReportsApi::new(self.client.clone())
    }

    pub fn ads(&self) -> ads::AdsApi {
        ads::AdsApi::new(self.client.clone())
    }

    pub fn chat(&self) -> chat::ChatApi {
        chat::ChatApi::new(self.client.clone())
    }

    pub fn cms(&self) -> cms::CmsApi {
        cms::CmsApi::new(self.client.clone())
    }

    pub fn notifications(&self) -> notifications::NotificationsApi {
        notifications::NotificationsApi::new(self.client.clone())
    }

    pub fn creators(&self) -> creators::CreatorsApi {
        creators::CreatorsApi::new(self.client.clone())
    }

    pub fn shop(&self) -> shop::ShopApi {
        shop::ShopApi::new(self.client.clone())
    }
}

/// Fill every candidate template with the same params.
pub(crate) fn fill_candidates(templates: &[&str], params: &[(&str, &str)]) -> Vec<String> {
    templates
        .iter()
        .map(|template| fill_path(template, params))
        .collect()
}
