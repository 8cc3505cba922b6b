//! User administration.

use atrium_api_client::{ApiClient, ApiResult, RequestOptions};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::envelope::{unwrap_data, unwrap_unit};
use crate::{fill_candidates, ListQuery};

/// Candidate routes for the users collection, preferred shape first.
const USERS: &[&str] = &["/admin/users", "/users"];
const USER: &[&str] = &["/admin/users/:id", "/users/:id"];
const USER_STATUS: &[&str] = &["/admin/users/:id/status", "/users/:id/status"];
const PROFILE: &[&str] = &["/admin/profile", "/profile"];
const PASSWORD: &[&str] = &["/admin/profile/password", "/profile/password"];

/// Parameter names different backend versions expect for user search.
const SEARCH_KEYS: &[&str] = &["search", "query", "q"];

/// Account standing of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Active,
    Suspended,
    Pending,
    #[serde(other)]
    Unknown,
}

/// A user as the console sees one.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminUser {
    pub id: u64,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_status")]
    pub status: UserStatus,
    #[serde(default)]
    pub created_at: Option<String>,
}

fn default_status() -> UserStatus {
    UserStatus::Unknown
}

/// Filter for the users list.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub list: ListQuery,
    pub search: Option<String>,
}

/// Fields an operator may change on a user.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Fields an operator may change on their own profile.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// User administration operations.
pub struct UsersApi {
    client: Arc<ApiClient>,
}

impl UsersApi {
    pub(crate) fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// List users.
    ///
    /// When a search term is present, the parameter name is probed across
    /// the shapes different backend versions expect, with the same
    /// continue-on-route-miss policy the path fallback uses.
    pub async fn list(&self, filter: &UserFilter) -> ApiResult<Vec<AdminUser>> {
        let term = filter.search.as_deref().filter(|term| !term.is_empty());

        let Some(term) = term else {
            let options = RequestOptions::get().with_query(filter.list.to_query());
            let payload = self.client.request_with_fallback(USERS, options).await?;
            return unwrap_data(payload);
        };

        let mut last_err = None;
        for key in SEARCH_KEYS {
            let query = filter.list.to_query().with(key, term);
            match self
                .client
                .request_with_fallback(USERS, RequestOptions::get().with_query(query))
                .await
            {
                Ok(payload) => return unwrap_data(payload),
                Err(err) if err.is_route_miss() => last_err = Some(err),
                Err(err) => return Err(err),
            }
        }
        Err(last_err.expect("at least one search shape was attempted"))
    }

    /// Fetch a single user.
    pub async fn get(&self, id: u64) -> ApiResult<AdminUser> {
        let candidates = fill_candidates(USER, &[("id", &id.to_string())]);
        let payload = self
            .client
            .request_with_fallback(&candidates, RequestOptions::get())
            .await?;
        unwrap_data(payload)
    }

    /// Update a user's editable fields.
    pub async fn update(&self, id: u64, update: &UserUpdate) -> ApiResult<AdminUser> {
        let candidates = fill_candidates(USER, &[("id", &id.to_string())]);
        let payload = self
            .client
            .request_with_fallback(&candidates, RequestOptions::put(serde_json::to_value(update)?))
            .await?;
        unwrap_data(payload)
    }

    /// Transition a user's account standing.
    pub async fn set_status(&self, id: u64, status: UserStatus) -> ApiResult<AdminUser> {
        let candidates = fill_candidates(USER_STATUS, &[("id", &id.to_string())]);
        let body = json!({ "status": status });
        let payload = self
            .client
            .request_with_fallback(&candidates, RequestOptions::put(body))
            .await?;
        unwrap_data(payload)
    }

    /// Delete a user account.
    pub async fn delete(&self, id: u64) -> ApiResult<()> {
        let candidates = fill_candidates(USER, &[("id", &id.to_string())]);
        let payload = self
            .client
            .request_with_fallback(&candidates, RequestOptions::delete())
            .await?;
        unwrap_unit(payload)
    }

    /// Fetch the signed-in operator's profile.
    pub async fn me(&self) -> ApiResult<AdminUser> {
        let payload = self
            .client
            .request_with_fallback(PROFILE, RequestOptions::get())
            .await?;
        unwrap_data(payload)
    }

    /// Update the signed-in operator's profile.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<AdminUser> {
        let payload = self
            .client
            .request_with_fallback(PROFILE, RequestOptions::put(serde_json::to_value(update)?))
            .await?;
        unwrap_data(payload)
    }

    /// Change the signed-in operator's password.
    pub async fn change_password(&self, current: &str, new: &str) -> ApiResult<()> {
        let body = json!({ "current_password": current, "new_password": new });
        let payload = self
            .client
            .request_with_fallback(PASSWORD, RequestOptions::post(body))
            .await?;
        unwrap_unit(payload)
    }
}
