//! Error types for the session client.
//!
//! DESIGN
//! ======
//! `HttpClient::send` fails only below HTTP semantics (transport, timeout,
//! cancellation). Every HTTP response, including the terminal 401, comes back
//! as a value; the `net::api` wrappers turn non-success statuses into
//! `ClientError::Status` / `ClientError::Unauthorized` so views match on a
//! single error type.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use std::time::Duration;

// =============================================================================
// STORAGE
// =============================================================================

/// Failures reading or writing the durable session file.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("session storage io failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("session storage encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}

// =============================================================================
// TRANSPORT
// =============================================================================

/// Failures below HTTP semantics: the request never produced a status code.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    Build(String),

    /// Connecting or sending failed.
    #[error("request failed: {0}")]
    Request(String),

    /// The response arrived but its body could not be read.
    #[error("response body read failed: {0}")]
    Body(String),
}

// =============================================================================
// CLIENT
// =============================================================================

/// Caller-facing error for every backend operation.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A single attempt exceeded the configured request timeout.
    #[error("request to {path} timed out after {after:?}")]
    Timeout { path: String, after: Duration },

    /// The caller's cancellation token fired before the call resolved.
    #[error("request to {path} was cancelled")]
    Cancelled { path: String },

    /// Non-success HTTP status other than 401, body kept verbatim.
    #[error("server returned HTTP {status}")]
    Status { status: u16, body: String },

    /// The original 401 after the refresh path gave up.
    #[error("not authorized; please log in again")]
    Unauthorized { body: String },

    #[error("response decode failed: {0}")]
    Decode(#[from] serde_json::Error),

    /// Local form validation rejected the input before any request.
    #[error("{0}")]
    Validation(String),

    #[error("config parse failed: {0}")]
    Config(String),

    #[error("session storage failed: {0}")]
    Storage(#[from] StorageError),
}

impl ClientError {
    /// Stable machine-readable code for display and logs.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "E_TRANSPORT",
            Self::Timeout { .. } => "E_TIMEOUT",
            Self::Cancelled { .. } => "E_CANCELLED",
            Self::Status { .. } => "E_STATUS",
            Self::Unauthorized { .. } => "E_UNAUTHORIZED",
            Self::Decode(_) => "E_DECODE",
            Self::Validation(_) => "E_VALIDATION",
            Self::Config(_) => "E_CONFIG",
            Self::Storage(_) => "E_STORAGE",
        }
    }

    /// HTTP status carried by the error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Unauthorized { .. } => Some(401),
            _ => None,
        }
    }

    /// Parsed JSON body of a status error, if it was JSON.
    #[must_use]
    pub fn body_json(&self) -> Option<serde_json::Value> {
        match self {
            Self::Status { body, .. } | Self::Unauthorized { body } => serde_json::from_str(body).ok(),
            _ => None,
        }
    }

    /// First human-readable message the backend put in an error body.
    ///
    /// Looks at `detail`, `error`, then `message`, matching the shapes the
    /// backend's REST framework emits.
    #[must_use]
    pub fn server_message(&self) -> Option<String> {
        let body = self.body_json()?;
        ["detail", "error", "message"]
            .iter()
            .find_map(|key| body.get(*key).and_then(serde_json::Value::as_str))
            .map(ToOwned::to_owned)
    }

    /// First validation message for `field` in a field-keyed error body
    /// (e.g. `{"email": ["already exists"]}`).
    #[must_use]
    pub fn field_message(&self, field: &str) -> Option<String> {
        let body = self.body_json()?;
        let value = body.get(field)?;
        let first = match value {
            serde_json::Value::Array(list) => list.first()?,
            other => other,
        };
        first.as_str().map(ToOwned::to_owned)
    }
}
