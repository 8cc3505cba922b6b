//! Fallback orchestration over ranked candidate endpoint shapes.
//!
//! The backend's route naming has drifted across deployments, so each
//! logical operation carries an ordered list of URL shapes it is willing
//! to probe. Order encodes preference: the first entry is the primary
//! expected shape.

use crate::client::{ApiClient, RequestOptions};
use crate::error::{ApiError, ApiResult};
use serde_json::Value;
use tracing::debug;

impl ApiClient {
    /// Try each candidate path in order until one succeeds.
    ///
    /// A 404 or 405 means "this candidate shape doesn't exist on this
    /// backend" and advances to the next candidate. Any other failure
    /// aborts immediately: the endpoint exists and the call itself is
    /// broken, so probing a different URL would only mask the bug. When
    /// every candidate misses, the last error is returned.
    ///
    /// Candidates are explored strictly in sequence, never in parallel,
    /// so non-idempotent methods cannot double-fire.
    pub async fn request_with_fallback<S: AsRef<str> + Sync>(
        &self,
        candidates: &[S],
        options: RequestOptions,
    ) -> ApiResult<Value> {
        if candidates.is_empty() {
            return Err(ApiError::NoCandidates);
        }

        let mut last_err = None;
        for path in candidates {
            let path = path.as_ref();
            match self.request(path, options.clone()).await {
                Ok(payload) => return Ok(payload),
                Err(err) if err.is_route_miss() => {
                    debug!(path, status = ?err.status(), "Candidate route absent, trying next");
                    last_err = Some(err);
                }
                Err(err) => return Err(err),
            }
        }

        Err(last_err.expect("at least one candidate was attempted"))
    }
}
