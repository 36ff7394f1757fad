//! Client configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const SESSION_DIR: &str = ".medsafe";
pub const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the upstream REST API, without trailing slash.
    pub api_url: String,
    /// Where the persisted `{token, user}` pair lives.
    pub session_file: PathBuf,
    pub timeouts: HttpTimeouts,
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// All optional:
    /// - `MEDSAFE_API_URL`: default `http://localhost:5000/api`
    /// - `MEDSAFE_SESSION_FILE`: default `~/.medsafe/session.json`
    /// - `MEDSAFE_REQUEST_TIMEOUT_SECS`: default 30
    /// - `MEDSAFE_CONNECT_TIMEOUT_SECS`: default 10
    #[must_use]
    pub fn from_env() -> Self {
        let api_url = std::env::var("MEDSAFE_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let session_file = std::env::var("MEDSAFE_SESSION_FILE")
            .ok()
            .filter(|v| !v.is_empty())
            .map_or_else(default_session_file, PathBuf::from);
        let timeouts = HttpTimeouts {
            request_secs: env_parse_u64("MEDSAFE_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("MEDSAFE_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        Self { api_url, session_file, timeouts }
    }

    /// Override the API URL, normalizing the trailing slash.
    #[must_use]
    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = api_url.trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_session_file(mut self, path: PathBuf) -> Self {
        self.session_file = path;
        self
    }
}

/// `<home>/.medsafe/session.json`, or relative to the working directory when
/// no home directory is known.
#[must_use]
pub fn default_session_file() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(SESSION_DIR)
        .join(SESSION_FILE)
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
