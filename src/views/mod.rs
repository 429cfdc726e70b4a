//! View controllers: form state and actions for each screen, minus rendering.
//!
//! Views talk to the backend only through [`HttpClient`] and touch the
//! session only through the calls the session store exposes (`set_tokens`
//! on login/registration, `clear` on logout). Every action resolves to a
//! [`ViewOutcome`] and leaves a [`ViewStatus`] behind; errors never escape
//! as `Err` because there is nobody above a view to handle them.

pub mod contact;
pub mod dashboard;
pub mod item_form;
pub mod login;
pub mod profile;
pub mod register;

#[cfg(test)]
#[path = "views_test.rs"]
mod views_test;

pub use contact::ContactView;
pub use dashboard::DashboardView;
pub use item_form::{FormMode, ItemFormView};
pub use login::LoginView;
pub use profile::ProfileView;
pub use register::RegisterView;

use crate::error::ClientError;
use crate::guard::Route;
use crate::net::HttpClient;
use crate::net::api;

/// Transient status shown next to a form or list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ViewStatus {
    #[default]
    Idle,
    Loading,
    Success(String),
    Error(String),
}

impl ViewStatus {
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success(message) | Self::Error(message) => Some(message),
            Self::Idle | Self::Loading => None,
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Where the UI goes after an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewOutcome {
    Stay,
    Navigate(Route),
}

/// Protected views bounce to login once the client has given up on the
/// session; everything else keeps the user where they are.
fn after_failure(err: &ClientError) -> ViewOutcome {
    if matches!(err, ClientError::Unauthorized { .. }) {
        ViewOutcome::Navigate(Route::Login)
    } else {
        ViewOutcome::Stay
    }
}

/// Tell the backend we are leaving (best effort), then forget the session.
pub async fn logout(client: &HttpClient) -> ViewOutcome {
    if let Err(e) = api::auth::logout(client).await {
        tracing::warn!(error = %e, code = e.error_code(), "logout call failed; clearing session anyway");
    }
    client.session().clear();
    ViewOutcome::Navigate(Route::Login)
}
