//! Token expiry inspection.
//!
//! The console decodes the claims segment of the access token to decide
//! whether a request is worth sending at all. The signature is never
//! verified; the backend remains the security boundary.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Claims {
    #[serde(default)]
    exp: Option<i64>,
}

/// Check whether a JWT access token is expired.
///
/// Any token that cannot be decoded is treated as expired, so garbage
/// never reaches the network. A well-formed token without an `exp` claim
/// never expires.
pub fn is_token_expired(token: &str) -> bool {
    match decode_claims(token) {
        Some(claims) => match claims.exp {
            Some(exp) => chrono::Utc::now().timestamp() >= exp,
            None => false,
        },
        None => true,
    }
}

/// Decode the claims segment of a JWT without verifying the signature.
fn decode_claims(token: &str) -> Option<Claims> {
    let mut segments = token.split('.');
    let _header = segments.next()?;
    let payload = segments.next()?;
    // A JWT carries exactly three segments.
    if segments.next().is_none() || segments.next().is_some() {
        return None;
    }

    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    serde_json::from_slice(&bytes).ok()
}
