//! Scripted transport double shared by unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::error::TransportError;
use crate::net::client::{ClientOptions, HttpClient};
use crate::net::request::{ApiRequest, ApiResponse};
use crate::net::transport::Transport;
use crate::session::SessionStore;
use crate::storage::{ACCESS_TOKEN_KEY, MemoryStorage, REFRESH_TOKEN_KEY, TokenStorage};

pub(crate) enum Reply {
    Json(u16, serde_json::Value),
    Text(u16, &'static str),
    /// Connection-level failure (no status).
    Fail,
    /// Never resolves.
    Hang,
    After(Duration, Box<Reply>),
}

type Handler = dyn Fn(&ApiRequest) -> Reply + Send + Sync;

pub(crate) struct ScriptedTransport {
    handler: Box<Handler>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    /// Answer each request by inspecting it.
    pub(crate) fn new(handler: impl Fn(&ApiRequest) -> Reply + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self { handler: Box::new(handler), requests: Mutex::new(Vec::new()) })
    }

    /// Answer requests with `replies` in order; 500 once exhausted.
    pub(crate) fn sequence(replies: Vec<Reply>) -> Arc<Self> {
        let queue = Mutex::new(VecDeque::from(replies));
        Self::new(move |_| {
            queue
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front()
                .unwrap_or(Reply::Json(500, serde_json::json!({ "error": "script exhausted" })))
        })
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub(crate) fn count(&self, path: &str) -> usize {
        self.requests().iter().filter(|r| r.path == path).count()
    }
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).push(request.clone());
        let mut reply = (self.handler)(request);
        loop {
            match reply {
                Reply::Json(status, body) => return Ok(ApiResponse::new(status, body.to_string())),
                Reply::Text(status, body) => return Ok(ApiResponse::new(status, body)),
                Reply::Fail => return Err(TransportError::Request("connection refused".to_owned())),
                Reply::Hang => return std::future::pending().await,
                Reply::After(delay, next) => {
                    tokio::time::sleep(delay).await;
                    reply = *next;
                }
            }
        }
    }
}

pub(crate) fn test_options() -> ClientOptions {
    ClientOptions { request_timeout: Duration::from_secs(5), coalesce_refresh: true }
}

/// Client over `transport` with a session hydrated from the given tokens.
pub(crate) fn client_with_tokens(
    transport: &Arc<ScriptedTransport>,
    access: Option<&str>,
    refresh: Option<&str>,
) -> HttpClient {
    let storage = MemoryStorage::new();
    let seeded = storage.apply(&[(ACCESS_TOKEN_KEY, access), (REFRESH_TOKEN_KEY, refresh)]);
    assert!(seeded.is_ok(), "memory storage never fails");
    client_with_storage(transport, Arc::new(storage))
}

/// Client whose session writes through to `storage`, so tests can inspect it.
pub(crate) fn client_with_storage(transport: &Arc<ScriptedTransport>, storage: Arc<dyn TokenStorage>) -> HttpClient {
    let session = SessionStore::open(storage);
    let shared: Arc<dyn Transport> = transport.clone();
    HttpClient::new(shared, session, test_options())
}

pub(crate) fn anonymous_client(transport: &Arc<ScriptedTransport>) -> HttpClient {
    client_with_tokens(transport, None, None)
}
