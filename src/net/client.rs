//! Authenticated HTTP client: the single choke point for backend calls.
//!
//! SYSTEM CONTEXT
//! ==============
//! Views and endpoint wrappers never see tokens. Every call goes through
//! [`HttpClient::send`], which attaches `Authorization: Bearer <access>` from
//! the session store and owns the 401 recovery path.
//!
//! REFRESH FLOW
//! ============
//! 1. Send with the current access token (if any).
//! 2. Anything but 401 goes back to the caller unchanged, errors included.
//! 3. On 401, consume the request's one-shot retry marker. A request that was
//!    already retried returns its 401 as-is.
//! 4. Obtain a fresh access token: `POST /auth/refresh/ {refresh}`. If there
//!    is no refresh token or the refresh fails, clear the session and return
//!    the ORIGINAL 401, not the refresh error.
//! 5. Re-issue the original request once with the new token and return
//!    whatever it yields.
//!
//! TRADE-OFFS
//! ==========
//! With `coalesce_refresh` on, refreshes are serialized behind an async mutex
//! and a waiter whose failed token was already replaced reuses the new token
//! instead of calling the endpoint again. Off reproduces one refresh per
//! failing request.
//!
//! Each attempt is bounded by `request_timeout`; a timeout is reported as
//! `ClientError::Timeout`, never as a 401, and leaves the session alone when
//! it hits the original request or the retry.

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use super::request::{ApiRequest, ApiResponse, PendingRequest};
use super::transport::{ReqwestTransport, Transport};
use super::types::RefreshResponse;
use crate::config::{ClientConfig, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::error::ClientError;
use crate::session::SessionStore;

pub const REFRESH_PATH: &str = "/auth/refresh/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientOptions {
    pub request_timeout: Duration,
    pub coalesce_refresh: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self { request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS), coalesce_refresh: true }
    }
}

/// Cheap to clone; clones share the transport, session and refresh gate.
#[derive(Clone)]
pub struct HttpClient {
    transport: Arc<dyn Transport>,
    session: SessionStore,
    options: ClientOptions,
    refresh_gate: Arc<Mutex<()>>,
}

impl HttpClient {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, session: SessionStore, options: ClientOptions) -> Self {
        Self { transport, session, options, refresh_gate: Arc::new(Mutex::new(())) }
    }

    /// Build a client with a `reqwest` transport from typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig, session: SessionStore) -> Result<Self, ClientError> {
        let transport = ReqwestTransport::new(config.base_url.clone(), config.timeouts)?;
        tracing::debug!(base_url = transport.base_url(), timeout = ?config.timeouts.request(), "http transport ready");
        let options =
            ClientOptions { request_timeout: config.timeouts.request(), coalesce_refresh: config.coalesce_refresh };
        Ok(Self::new(Arc::new(transport), session, options))
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Issue `request`, recovering a single 401 through token refresh.
    ///
    /// # Errors
    ///
    /// Only transport failures and timeouts; every HTTP status is `Ok`.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        self.dispatch(PendingRequest::new(request), None).await
    }

    /// Like [`HttpClient::send`], abandoning the call when `cancel` fires.
    ///
    /// # Errors
    ///
    /// As `send`, plus `ClientError::Cancelled`.
    pub async fn send_with_cancel(
        &self,
        request: ApiRequest,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse, ClientError> {
        self.dispatch(PendingRequest::new(request), Some(cancel)).await
    }

    async fn dispatch(
        &self,
        mut pending: PendingRequest,
        cancel: Option<&CancellationToken>,
    ) -> Result<ApiResponse, ClientError> {
        let mut token = self.session.get().access_token;
        loop {
            let response = self.attempt(&pending, token.as_deref(), cancel).await?;
            if !response.is_unauthorized() {
                return Ok(response);
            }

            let rejected = token.take();
            let request_id = pending.id;
            pending = match pending.into_retry() {
                Some(retry) => retry,
                None => {
                    tracing::warn!(%request_id, "retried request still unauthorized");
                    return Ok(response);
                }
            };
            tracing::info!(request_id = %pending.id, path = %pending.request.path, "access token rejected; refreshing");

            match self.fresh_access_token(rejected.as_deref(), cancel).await? {
                Some(fresh) => token = Some(fresh),
                None => return Ok(response),
            }
        }
    }

    /// Produce a usable access token after `rejected` got a 401, or `None`
    /// when the session is over (it has been cleared by then).
    async fn fresh_access_token(
        &self,
        rejected: Option<&str>,
        cancel: Option<&CancellationToken>,
    ) -> Result<Option<String>, ClientError> {
        let _gate = if self.options.coalesce_refresh { Some(self.refresh_gate.lock().await) } else { None };

        let current = self.session.get();
        if self.options.coalesce_refresh {
            if let Some(access) = current.access_token.as_deref().filter(|access| Some(*access) != rejected) {
                tracing::debug!("reusing access token refreshed by a concurrent request");
                return Ok(Some(access.to_owned()));
            }
        }

        let Some(refresh) = current.refresh_token else {
            tracing::info!("no refresh token; clearing session");
            self.session.clear();
            return Ok(None);
        };

        match self.call_refresh(&refresh, cancel).await {
            Ok(access) => {
                self.session.set_access_token(&access);
                tracing::info!("access token refreshed");
                Ok(Some(access))
            }
            Err(cancelled @ ClientError::Cancelled { .. }) => Err(cancelled),
            Err(e) => {
                tracing::warn!(error = %e, "token refresh failed; clearing session");
                self.session.clear();
                Ok(None)
            }
        }
    }

    async fn call_refresh(&self, refresh: &str, cancel: Option<&CancellationToken>) -> Result<String, ClientError> {
        let request = ApiRequest::post(REFRESH_PATH).json(serde_json::json!({ "refresh": refresh }));
        let response = self.attempt(&PendingRequest::new(request), None, cancel).await?;
        let body: RefreshResponse = response.error_for_status()?.json()?;
        Ok(body.access)
    }

    async fn attempt(
        &self,
        pending: &PendingRequest,
        token: Option<&str>,
        cancel: Option<&CancellationToken>,
    ) -> Result<ApiResponse, ClientError> {
        let mut request = pending.request.clone();
        if let Some(token) = token {
            request.set_bearer(token);
        }
        tracing::debug!(
            request_id = %pending.id,
            method = %request.method,
            path = %request.path,
            retried = pending.retried(),
            "sending request"
        );

        let after = self.options.request_timeout;
        let timed = tokio::time::timeout(after, self.transport.execute(&request));
        let outcome = match cancel {
            Some(cancel) => tokio::select! {
                () = cancel.cancelled() => {
                    tracing::info!(request_id = %pending.id, path = %request.path, "request cancelled");
                    return Err(ClientError::Cancelled { path: request.path.clone() });
                }
                outcome = timed => outcome,
            },
            None => timed.await,
        };
        let Ok(result) = outcome else {
            tracing::warn!(request_id = %pending.id, path = %request.path, ?after, "request timed out");
            return Err(ClientError::Timeout { path: request.path.clone(), after });
        };

        let response = result?;
        tracing::debug!(request_id = %pending.id, status = response.status, "response received");
        Ok(response)
    }
}
