//! Remote authentication service.
//!
//! ARCHITECTURE
//! ============
//! `SessionController` only depends on the [`AuthService`] trait so tests can
//! swap in a scripted fake. [`HttpAuthService`] is the reqwest-backed
//! implementation against the upstream `/auth/*` endpoints.
//!
//! ERROR HANDLING
//! ==============
//! The upstream API answers failed logins with a JSON envelope and a 4xx
//! status. Bodies are parsed regardless of status so the server's message
//! reaches the caller; only unparsable bodies become [`ApiError::Response`].

use std::time::Duration;

use super::types::{Envelope, LoginData, LoginReply, User};
use crate::config::{ClientConfig, HttpTimeouts};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced while talking to the remote API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request could not be sent or the body could not be read.
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with a body that is not the expected envelope.
    #[error("unexpected response: status {status}")]
    Response { status: u16, body: String },

    /// The server answered with a well-formed envelope reporting failure.
    #[error("server rejected request: {0}")]
    Rejected(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

// =============================================================================
// AUTH SERVICE TRAIT
// =============================================================================

/// Remote collaborator that issues and revokes credentials.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Exchange credentials for a token and user record.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or an unparsable reply.
    /// A well-formed rejection is an `Ok` reply with `success == false`.
    async fn login(&self, username: &str, password: &str) -> Result<LoginReply, ApiError>;

    /// Tell the server the session is over. Best effort.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails.
    async fn logout(&self, token: &str) -> Result<(), ApiError>;
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

pub struct HttpAuthService {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAuthService {
    /// Build a client against `base_url` (e.g. `http://localhost:5000/api`).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if the reqwest client fails to build.
    pub fn new(base_url: impl Into<String>, timeouts: HttpTimeouts) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Ok(Self { http, base_url })
    }

    /// Build a client from a parsed [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if the reqwest client fails to build.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::new(config.api_url.clone(), config.timeouts)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Fetch the user behind `token` from `GET /auth/me`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure, an unparsable body, or a
    /// rejected envelope.
    pub async fn current_user(&self, token: &str) -> Result<User, ApiError> {
        let response = self
            .http
            .get(self.url("/auth/me"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        let env: Envelope<User> = parse_envelope(status, &text)?;
        match env.data {
            Some(user) if env.success => Ok(user),
            _ => Err(ApiError::Rejected(
                env.error.unwrap_or_else(|| format!("status {status}")),
            )),
        }
    }
}

#[async_trait::async_trait]
impl AuthService for HttpAuthService {
    async fn login(&self, username: &str, password: &str) -> Result<LoginReply, ApiError> {
        let response = self
            .http
            .post(self.url("/auth/login"))
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        parse_login_response(status, &text)
    }

    async fn logout(&self, token: &str) -> Result<(), ApiError> {
        let response = self
            .http
            .post(self.url("/auth/logout"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Response { status: status.as_u16(), body });
        }
        Ok(())
    }
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_envelope<T>(status: u16, body: &str) -> Result<Envelope<T>, ApiError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(body).map_err(|_| ApiError::Response { status, body: body.to_owned() })
}

pub(crate) fn parse_login_response(status: u16, body: &str) -> Result<LoginReply, ApiError> {
    let env: Envelope<LoginData> = parse_envelope(status, body)?;
    Ok(env.into_reply())
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
