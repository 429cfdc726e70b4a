//! Wire transport seam.
//!
//! `HttpClient` talks to the backend only through [`Transport`], so the
//! refresh/retry logic is tested against scripted doubles and the real
//! network path lives in one small `reqwest` adapter.

use std::time::Duration;

use reqwest::multipart::{Form, Part};

use super::request::{ApiRequest, ApiResponse, FormPart, RequestBody};
use crate::config::Timeouts;
use crate::error::TransportError;

/// Executes one HTTP exchange. Implementations never interpret status codes.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError>;
}

// =============================================================================
// REQWEST
// =============================================================================

pub struct ReqwestTransport {
    http: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Build a transport rooted at `base_url` (no trailing slash).
    ///
    /// Only the connect phase is bounded here. The whole-request deadline
    /// belongs to `HttpClient`, which reports it as `ClientError::Timeout`.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Build` if the TLS backend fails to initialize.
    pub fn new(base_url: impl Into<String>, timeouts: Timeouts) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .connect_timeout(timeouts.connect())
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| TransportError::Build(e.to_string()))?;
        Ok(Self { http, base_url: base_url.into() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let mut builder = self.http.request(request.method.clone(), self.url(&request.path));
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(parts) => builder.multipart(build_form(parts)?),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        Ok(ApiResponse { status, body })
    }
}

fn build_form(parts: &[FormPart]) -> Result<Form, TransportError> {
    let mut form = Form::new();
    for part in parts {
        form = match part {
            FormPart::Text { name, value } => form.text(name.clone(), value.clone()),
            FormPart::File { name, file_name, content_type, bytes } => {
                let file = Part::bytes(bytes.clone())
                    .file_name(file_name.clone())
                    .mime_str(content_type)
                    .map_err(|e| TransportError::Request(format!("invalid content type {content_type}: {e}")))?;
                form.part(name.clone(), file)
            }
        };
    }
    Ok(form)
}
