//! The request executor: one HTTP call, fully policed.

use crate::error::{error_message, summarize_body, ApiError, ApiResult};
use crate::transport::{
    HttpTransport, Method, ReqwestTransport, RequestBody, TransportRequest, TransportResponse,
};
use crate::url::{Query, UrlBuilder};
use atrium_config::Config;
use atrium_session_store::{is_token_expired, SessionStore};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Default content type attached to plain-object bodies.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Where the operator lands when their credentials stop being valid.
///
/// The browser original rewrites `window.location`; embedders supply
/// whatever "go to sign-in" means for their surface. `at_sign_in` keeps
/// the redirect idempotent.
pub trait SignInRedirect: Send + Sync {
    /// True when the client is already at the sign-in entry point.
    fn at_sign_in(&self) -> bool;
    /// Send the operator back to sign-in.
    fn redirect(&self);
}

/// Redirect sink for headless embedders; never navigates.
#[derive(Debug, Default)]
pub struct NoRedirect;

impl SignInRedirect for NoRedirect {
    fn at_sign_in(&self) -> bool {
        true
    }

    fn redirect(&self) {}
}

/// Options for a single request.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub query: Query,
    pub body: Option<RequestBody>,
    pub headers: Vec<(String, String)>,
    /// Attach the bearer token and enforce the session guard.
    pub auth: bool,
    /// Content-Type header; `None` suppresses it (multipart bodies).
    pub content_type: Option<&'static str>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::Get,
            query: Query::new(),
            body: None,
            headers: Vec::new(),
            auth: true,
            content_type: Some(CONTENT_TYPE_JSON),
        }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn delete() -> Self {
        Self {
            method: Method::Delete,
            ..Self::default()
        }
    }

    pub fn post(body: Value) -> Self {
        Self {
            method: Method::Post,
            body: Some(RequestBody::Json(body)),
            ..Self::default()
        }
    }

    pub fn put(body: Value) -> Self {
        Self {
            method: Method::Put,
            body: Some(RequestBody::Json(body)),
            ..Self::default()
        }
    }

    pub fn patch(body: Value) -> Self {
        Self {
            method: Method::Patch,
            body: Some(RequestBody::Json(body)),
            ..Self::default()
        }
    }

    /// POST a multipart form. The transport owns the boundary, so the
    /// content-type header is suppressed.
    pub fn multipart(form: crate::transport::MultipartForm) -> Self {
        Self {
            method: Method::Post,
            body: Some(RequestBody::Multipart(form)),
            content_type: None,
            ..Self::default()
        }
    }

    pub fn with_query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Skip the session guard and bearer header (sign-in endpoints).
    pub fn unauthenticated(mut self) -> Self {
        self.auth = false;
        self
    }
}

/// REST client for the Atrium backend.
///
/// Owns authentication-token attachment, session-expiry detection,
/// response parsing and the prefix-recovery retry. Resource modules sit
/// on top and never touch the transport directly.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    urls: UrlBuilder,
    session: Arc<dyn SessionStore>,
    redirect: Arc<dyn SignInRedirect>,
}

impl ApiClient {
    /// Create a client over the production transport with no redirect
    /// sink.
    pub fn new(config: &Config, session: Arc<dyn SessionStore>) -> Self {
        Self::with_transport(
            Arc::new(ReqwestTransport::new()),
            UrlBuilder::from_config(config),
            session,
            Arc::new(NoRedirect),
        )
    }

    /// Create a client with every collaborator supplied explicitly.
    pub fn with_transport(
        transport: Arc<dyn HttpTransport>,
        urls: UrlBuilder,
        session: Arc<dyn SessionStore>,
        redirect: Arc<dyn SignInRedirect>,
    ) -> Self {
        Self {
            transport,
            urls,
            session,
            redirect,
        }
    }

    /// Replace the sign-in redirect sink.
    pub fn redirect_to(mut self, redirect: Arc<dyn SignInRedirect>) -> Self {
        self.redirect = redirect;
        self
    }

    pub fn urls(&self) -> &UrlBuilder {
        &self.urls
    }

    /// The session store this client guards requests with.
    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    /// Perform one HTTP call against `path` (leading slash required).
    ///
    /// Authenticated calls fail fast with [`ApiError::Unauthorized`] when
    /// no usable token is stored, without touching the network. A 404 on
    /// a prefixed path is retried exactly once with the prefix skipped;
    /// that second response is final.
    pub async fn request(&self, path: &str, options: RequestOptions) -> ApiResult<Value> {
        let token = if options.auth {
            Some(self.require_token()?)
        } else {
            None
        };

        let first = self.dispatch(path, &options, token.as_deref(), false).await?;
        let response = if first.status == 404
            && self.urls.has_prefix()
            && !self.urls.is_unprefixed_root(path)
        {
            debug!(path, "Prefixed route missing, retrying without prefix");
            self.dispatch(path, &options, token.as_deref(), true).await?
        } else {
            first
        };

        self.conclude(path, response)
    }

    /// Fetch a usable access token or fail the call before the network.
    fn require_token(&self) -> ApiResult<String> {
        let session = self.session.get();
        let token = session.as_ref().and_then(|s| s.access_token.as_deref());
        match token {
            Some(token) if !is_token_expired(token) => Ok(token.to_string()),
            Some(_) => {
                warn!("Access token expired, signing out");
                self.expire_session();
                Err(ApiError::Unauthorized)
            }
            None => {
                warn!("No access token stored, signing out");
                self.expire_session();
                Err(ApiError::Unauthorized)
            }
        }
    }

    /// Clear the session and send the operator to sign-in once.
    fn expire_session(&self) {
        self.session.clear();
        if !self.redirect.at_sign_in() {
            self.redirect.redirect();
        }
    }

    async fn dispatch(
        &self,
        path: &str,
        options: &RequestOptions,
        token: Option<&str>,
        skip_prefix: bool,
    ) -> Result<TransportResponse, ApiError> {
        let url = self.urls.build_with_query(path, skip_prefix, &options.query);

        let mut headers = options.headers.clone();
        if let Some(content_type) = options.content_type {
            headers.push(("Content-Type".to_string(), content_type.to_string()));
        }
        if let Some(token) = token {
            headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
        }

        debug!(method = options.method.as_str(), url = %url, "Dispatching request");

        let response = self
            .transport
            .execute(TransportRequest {
                url,
                method: options.method,
                headers,
                body: options.body.clone(),
            })
            .await?;
        Ok(response)
    }

    /// Interpret the final response: parse the payload and classify
    /// failures.
    fn conclude(&self, path: &str, response: TransportResponse) -> ApiResult<Value> {
        let payload = parse_payload(&response);

        if response.is_success() {
            return Ok(payload);
        }

        let message = error_message(&payload);
        error!(
            path,
            status = response.status,
            body = %summarize_body(&response.body),
            "Request failed"
        );

        if response.status == 401 {
            self.expire_session();
        }

        Err(ApiError::Api {
            status: response.status,
            message,
            payload,
        })
    }
}

/// Parse a response body by its declared content type.
///
/// JSON bodies are parsed as JSON; anything else (including a JSON
/// content type over a malformed body) is wrapped as `{"message": text}`.
/// An empty body yields an empty object.
fn parse_payload(response: &TransportResponse) -> Value {
    if response.body.is_empty() {
        return json!({});
    }
    if response.is_json() {
        if let Ok(value) = serde_json::from_slice(&response.body) {
            return value;
        }
    }
    let text = String::from_utf8_lossy(&response.body).into_owned();
    json!({ "message": text })
}
