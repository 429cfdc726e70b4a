#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use super::{ViewOutcome, ViewStatus};
use crate::guard::Route;
use crate::net::HttpClient;
use crate::net::api;
use crate::net::types::Credentials;

const INVALID_CREDENTIALS: &str = "Invalid credentials.";

#[derive(Debug, Default)]
pub struct LoginView {
    pub username: String,
    pub password: String,
    status: ViewStatus,
}

impl LoginView {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into(), status: ViewStatus::Idle }
    }

    #[must_use]
    pub fn status(&self) -> &ViewStatus {
        &self.status
    }

    /// Exchange credentials for a token pair and store it.
    pub async fn submit(&mut self, client: &HttpClient) -> ViewOutcome {
        let username = self.username.trim();
        if username.is_empty() || self.password.is_empty() {
            self.status = ViewStatus::Error("Username and password are required.".to_owned());
            return ViewOutcome::Stay;
        }

        self.status = ViewStatus::Loading;
        let credentials = Credentials { username: username.to_owned(), password: self.password.clone() };
        match api::auth::login(client, &credentials).await {
            Ok(resp) => {
                let session = client.session();
                session.set_tokens(&resp.access, &resp.refresh);
                match resp.user.map(|user| user.email).filter(|email| !email.is_empty()) {
                    Some(email) => session.set_user_email(&email),
                    None => tracing::warn!("login response carried no user email"),
                }
                tracing::info!(username = %credentials.username, "logged in");
                self.password.clear();
                self.status = ViewStatus::Success("Logged in.".to_owned());
                ViewOutcome::Navigate(Route::Dashboard)
            }
            Err(e) => {
                tracing::info!(code = e.error_code(), "login failed");
                let message = e.field_message("detail").unwrap_or_else(|| INVALID_CREDENTIALS.to_owned());
                self.status = ViewStatus::Error(message);
                ViewOutcome::Stay
            }
        }
    }
}
