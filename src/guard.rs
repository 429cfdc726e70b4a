//! Route guard for protected views.
//!
//! `guard` is a pure function of the session snapshot it is handed: it never
//! touches the network or the store, so callers decide when to take the
//! snapshot (render or navigation time).

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use serde::Serialize;

use crate::session::Session;

/// Navigable views of the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Login,
    Register,
    Dashboard,
    Profile,
    ItemForm,
}

impl Route {
    pub const ALL: [Route; 5] = [Self::Login, Self::Register, Self::Dashboard, Self::Profile, Self::ItemForm];

    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Dashboard => "/dashboard",
            Self::Profile => "/profile",
            Self::ItemForm => "/item-form",
        }
    }

    #[must_use]
    pub fn requires_auth(self) -> bool {
        matches!(self, Self::Dashboard | Self::Profile | Self::ItemForm)
    }

    /// Exact path match; a trailing slash is tolerated.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        Self::ALL.into_iter().find(|route| route.path() == path)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Outcome of guarding a view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Guarded<V> {
    Render(V),
    Redirect(Route),
}

impl<V> Guarded<V> {
    #[must_use]
    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect(_))
    }
}

/// Render `view` only for an authenticated session; otherwise redirect to
/// the login view. `view` is returned untouched.
pub fn guard<V>(view: V, session: &Session) -> Guarded<V> {
    if session.is_authenticated() {
        Guarded::Render(view)
    } else {
        tracing::warn!("unauthenticated access; redirecting to login");
        Guarded::Redirect(Route::Login)
    }
}

/// Resolve a navigation target. Public routes always render, protected ones
/// go through [`guard`], and unknown paths fall back to the login view.
#[must_use]
pub fn resolve_path(path: &str, session: &Session) -> Guarded<Route> {
    match Route::from_path(path) {
        Some(route) if route.requires_auth() => guard(route, session),
        Some(route) => Guarded::Render(route),
        None => Guarded::Redirect(Route::Login),
    }
}
