//! Transport-neutral request/response values.
//!
//! DESIGN
//! ======
//! Requests own their bodies (including multipart file bytes) so the client
//! can re-issue the exact same call after a token refresh. `PendingRequest`
//! wraps one call with its one-shot retry marker; the only way to get a retry
//! is to consume the pending value.

#[cfg(test)]
#[path = "request_test.rs"]
mod request_test;

use reqwest::Method;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::ClientError;

pub const AUTHORIZATION: &str = "Authorization";

/// One field of a `multipart/form-data` body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormPart {
    Text { name: String, value: String },
    File { name: String, file_name: String, content_type: String, bytes: Vec<u8> },
}

impl FormPart {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Text { name, .. } | Self::File { name, .. } => name,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Multipart(Vec<FormPart>),
}

/// A backend call relative to the configured base URL.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), query: Vec::new(), headers: Vec::new(), body: RequestBody::Empty }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    #[must_use]
    pub fn json(mut self, value: serde_json::Value) -> Self {
        self.body = RequestBody::Json(value);
        self
    }

    #[must_use]
    pub fn multipart(mut self, parts: Vec<FormPart>) -> Self {
        self.body = RequestBody::Multipart(parts);
        self
    }

    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Case-insensitive header lookup.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Replace any `Authorization` header with `Bearer <token>`.
    pub fn set_bearer(&mut self, token: &str) {
        self.headers.retain(|(key, _)| !key.eq_ignore_ascii_case(AUTHORIZATION));
        self.headers.push((AUTHORIZATION.to_owned(), format!("Bearer {token}")));
    }

    /// Token carried in the `Authorization: Bearer` header, if any.
    #[must_use]
    pub fn bearer(&self) -> Option<&str> {
        self.header(AUTHORIZATION)?.strip_prefix("Bearer ")
    }
}

/// One outgoing call plus its one-shot retry marker.
#[derive(Clone, Debug)]
pub struct PendingRequest {
    pub id: Uuid,
    pub request: ApiRequest,
    retried: bool,
}

impl PendingRequest {
    #[must_use]
    pub fn new(request: ApiRequest) -> Self {
        Self { id: Uuid::new_v4(), request, retried: false }
    }

    #[must_use]
    pub fn retried(&self) -> bool {
        self.retried
    }

    /// Consume the first attempt and hand back the retry.
    ///
    /// Returns `None` once the request has already been retried, which bounds
    /// every call to at most one refresh.
    #[must_use]
    pub fn into_retry(self) -> Option<Self> {
        if self.retried {
            return None;
        }
        Some(Self { retried: true, ..self })
    }
}

/// A resolved HTTP response. Bodies are read eagerly as text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Decode` if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Map a non-success response into the matching error.
    ///
    /// # Errors
    ///
    /// `Unauthorized` for 401, `Status` for every other non-2xx code.
    pub fn error_for_status(self) -> Result<Self, ClientError> {
        if self.is_success() {
            return Ok(self);
        }
        if self.is_unauthorized() {
            return Err(ClientError::Unauthorized { body: self.body });
        }
        Err(ClientError::Status { status: self.status, body: self.body })
    }
}
