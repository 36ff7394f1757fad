//! Bearer token structure and expiry decoding.
//!
//! SYSTEM CONTEXT
//! ==============
//! Tokens are JWTs issued by the upstream API. The client never holds the
//! signing key, so it only reads the payload segment to learn `exp`.
//! Signature checks stay with the server.
//!
//! DESIGN
//! ======
//! Decoding returns `Result<Claims, TokenError>`; callers fold a decode error
//! and an expired `exp` into the same forced-logout path via [`check_at`].

use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is empty")]
    Empty,
    #[error("token must have three dot-separated segments")]
    Segments,
    #[error("token payload is not base64url: {0}")]
    Base64(String),
    #[error("token payload is not valid claims JSON: {0}")]
    Claims(String),
    #[error("token expired at {exp} (now {now})")]
    Expired { exp: u64, now: u64 },
}

/// Payload claims the client reads. Other claims are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Claims {
    /// Expiry instant, seconds since the Unix epoch.
    pub exp: u64,
}

impl Claims {
    /// `true` while `exp` is strictly after `now`.
    #[must_use]
    pub fn is_live_at(&self, now: u64) -> bool {
        self.exp > now
    }
}

/// Decode the payload segment of `token` without verifying the signature.
///
/// # Errors
///
/// Returns a [`TokenError`] if the token is not `header.payload.signature`,
/// the payload is not base64url, or it lacks a numeric `exp`.
pub fn decode(token: &str) -> Result<Claims, TokenError> {
    if token.is_empty() {
        return Err(TokenError::Empty);
    }
    let mut parts = token.split('.');
    let (Some(_header), Some(payload), Some(_sig), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(TokenError::Segments);
    };

    // Some issuers pad; URL_SAFE_NO_PAD rejects '='.
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| TokenError::Base64(e.to_string()))?;
    serde_json::from_slice::<Claims>(&bytes).map_err(|e| TokenError::Claims(e.to_string()))
}

/// Decode `token` and require `exp > now`.
///
/// # Errors
///
/// Returns [`TokenError::Expired`] for a past `exp`, or any decode error.
pub fn check_at(token: &str, now: u64) -> Result<Claims, TokenError> {
    let claims = decode(token)?;
    if !claims.is_live_at(now) {
        return Err(TokenError::Expired { exp: claims.exp, now });
    }
    Ok(claims)
}

/// Current wall-clock time in epoch seconds.
#[must_use]
pub fn now_epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}


#[cfg(test)]
#[path = "token_test.rs"]
mod tests;
