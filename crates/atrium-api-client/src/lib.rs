//! HTTP core for the Atrium console client.
//!
//! This crate centralizes everything the resource modules share when
//! talking to the backend REST API:
//!
//! - [`UrlBuilder`]: joins origin, version prefix, path templates and
//!   query parameters into final URLs
//! - [`ApiClient::request`]: one HTTP call with bearer auth, session
//!   guards, response parsing and the one-shot prefix-recovery retry
//! - [`ApiClient::request_with_fallback`]: probes an ordered list of
//!   candidate endpoint shapes, continuing only on "route absent"
//!   signals
//! - [`ApiError`]: the typed failure every layer above inspects
//!
//! The transport is a trait seam ([`HttpTransport`]) so the executor's
//! policies are testable without a network.

mod client;
mod error;
mod fallback;
mod transport;
mod url;

#[cfg(test)]
mod tests;

pub use client::{ApiClient, NoRedirect, RequestOptions, SignInRedirect, CONTENT_TYPE_JSON};
pub use error::{ApiError, ApiResult};
pub use transport::{
    HttpTransport, Method, MultipartField, MultipartForm, ReqwestTransport, RequestBody,
    TransportError, TransportRequest, TransportResponse,
};
pub use url::{fill_path, percent_encode, Query, QueryValue, UrlBuilder};
