//! Client configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ClientError;

pub const DEFAULT_BASE_URL: &str = "https://lostandfound-backend-loxq.onrender.com/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const SESSION_FILE_NAME: &str = "session.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

impl Timeouts {
    #[must_use]
    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    #[must_use]
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub session_file: PathBuf,
    pub timeouts: Timeouts,
    pub coalesce_refresh: bool,
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `LOSTFOUND_BASE_URL`: API root, trailing `/` trimmed
    /// - `LOSTFOUND_SESSION_FILE`: default `$HOME/.lostfound/session.json`
    /// - `LOSTFOUND_REQUEST_TIMEOUT_SECS`: default 30
    /// - `LOSTFOUND_CONNECT_TIMEOUT_SECS`: default 10
    /// - `LOSTFOUND_COALESCE_REFRESH`: default `true`
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` if `LOSTFOUND_COALESCE_REFRESH` is not a
    /// recognizable boolean.
    pub fn from_env() -> Result<Self, ClientError> {
        let base_url = normalize_base_url(
            &std::env::var("LOSTFOUND_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned()),
        );
        let session_file = std::env::var("LOSTFOUND_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_session_file());
        let timeouts = Timeouts {
            request_secs: env_parse_u64("LOSTFOUND_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("LOSTFOUND_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        let coalesce_refresh = match std::env::var("LOSTFOUND_COALESCE_REFRESH") {
            Ok(raw) => parse_bool(&raw)
                .ok_or_else(|| ClientError::Config(format!("invalid LOSTFOUND_COALESCE_REFRESH: {raw}")))?,
            Err(_) => true,
        };

        Ok(Self { base_url, session_file, timeouts, coalesce_refresh })
    }
}

/// Trim whitespace and trailing slashes so paths can be appended verbatim.
#[must_use]
pub fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

fn default_session_file() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".lostfound").join(SESSION_FILE_NAME),
        None => PathBuf::from(".lostfound-session.json"),
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
