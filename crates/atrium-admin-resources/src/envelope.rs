//! Response envelope normalization.
//!
//! The backend answers either with a bare payload or with an envelope of
//! shape `{ "data": <payload>, "message"?, "meta"? }`, depending on the
//! deployment. This is the one place that knows about both.

use atrium_api_client::{ApiError, ApiResult};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Unwrap an optional `data` envelope and deserialize the payload.
pub fn unwrap_data<T: DeserializeOwned>(payload: Value) -> ApiResult<T> {
    let inner = match payload {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };
    serde_json::from_value(inner).map_err(ApiError::from)
}

/// Unwrap and discard the payload, keeping only success.
pub fn unwrap_unit(_payload: Value) -> ApiResult<()> {
    Ok(())
}
