//! Session store: the single source of truth for the current tokens.
//!
//! SYSTEM CONTEXT
//! ==============
//! The HTTP client reads the access token from here before every request and
//! writes the refreshed token back; the route guard reads the authenticated
//! flag. Views call `set_tokens` on login and `clear` on logout. Nothing else
//! touches tokens.
//!
//! INVARIANTS
//! ==========
//! - `Session::is_authenticated` is derived from access-token presence; there
//!   is no separate flag to drift out of sync.
//! - Every mutation writes through to storage before returning. A storage
//!   failure is logged and the in-memory state still changes, so the
//!   operations stay total.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::{Arc, PoisonError, RwLock};

use crate::storage::{ACCESS_TOKEN_KEY, Change, MemoryStorage, REFRESH_TOKEN_KEY, TokenStorage, USER_EMAIL_KEY};

/// Snapshot of the credential pair.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl Session {
    /// True iff an access token is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }
}

#[derive(Debug, Default)]
struct SessionState {
    session: Session,
    user_email: Option<String>,
}

/// Shared handle to the session; clones observe the same state.
#[derive(Clone)]
pub struct SessionStore {
    state: Arc<RwLock<SessionState>>,
    storage: Arc<dyn TokenStorage>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let session = self.get();
        f.debug_struct("SessionStore")
            .field("authenticated", &session.is_authenticated())
            .field("has_refresh", &session.refresh_token.is_some())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Hydrate a store from durable storage.
    #[must_use]
    pub fn open(storage: Arc<dyn TokenStorage>) -> Self {
        let state = SessionState {
            session: Session {
                access_token: non_empty(storage.get(ACCESS_TOKEN_KEY)),
                refresh_token: non_empty(storage.get(REFRESH_TOKEN_KEY)),
            },
            user_email: non_empty(storage.get(USER_EMAIL_KEY)),
        };
        tracing::debug!(
            authenticated = state.session.is_authenticated(),
            has_refresh = state.session.refresh_token.is_some(),
            "session hydrated"
        );
        Self { state: Arc::new(RwLock::new(state)), storage }
    }

    /// Empty store backed by process memory.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::open(Arc::new(MemoryStorage::new()))
    }

    /// Current session snapshot.
    #[must_use]
    pub fn get(&self) -> Session {
        self.state.read().unwrap_or_else(PoisonError::into_inner).session.clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.read().unwrap_or_else(PoisonError::into_inner).session.is_authenticated()
    }

    /// Store a fresh token pair after login or registration.
    pub fn set_tokens(&self, access: &str, refresh: &str) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        self.write_through(&[(ACCESS_TOKEN_KEY, Some(access)), (REFRESH_TOKEN_KEY, Some(refresh))]);
        state.session = Session { access_token: Some(access.to_owned()), refresh_token: Some(refresh.to_owned()) };
        tracing::info!("session tokens set");
    }

    /// Replace only the access token after a successful refresh.
    pub fn set_access_token(&self, access: &str) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        self.write_through(&[(ACCESS_TOKEN_KEY, Some(access))]);
        state.session.access_token = Some(access.to_owned());
        tracing::debug!("access token replaced");
    }

    /// Forget both tokens and the cached identity.
    pub fn clear(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        self.write_through(&[(ACCESS_TOKEN_KEY, None), (REFRESH_TOKEN_KEY, None), (USER_EMAIL_KEY, None)]);
        *state = SessionState::default();
        tracing::info!("session cleared");
    }

    /// Email cached at login for prefilling contact forms.
    #[must_use]
    pub fn user_email(&self) -> Option<String> {
        self.state.read().unwrap_or_else(PoisonError::into_inner).user_email.clone()
    }

    pub fn set_user_email(&self, email: &str) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        self.write_through(&[(USER_EMAIL_KEY, Some(email))]);
        state.user_email = Some(email.to_owned());
    }

    fn write_through(&self, changes: &[Change<'_>]) {
        if let Err(e) = self.storage.apply(changes) {
            tracing::warn!(error = %e, "session write-through failed; state kept in memory only");
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
