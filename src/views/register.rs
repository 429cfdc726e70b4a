#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use super::{ViewOutcome, ViewStatus};
use crate::error::ClientError;
use crate::guard::Route;
use crate::net::HttpClient;
use crate::net::api;
use crate::net::types::Registration;

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Default)]
pub struct RegisterView {
    pub username: String,
    pub email: String,
    pub password: String,
    status: ViewStatus,
}

impl RegisterView {
    #[must_use]
    pub fn new(username: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), email: email.into(), password: password.into(), status: ViewStatus::Idle }
    }

    #[must_use]
    pub fn status(&self) -> &ViewStatus {
        &self.status
    }

    /// Trimmed registration payload, or the first validation failure.
    ///
    /// # Errors
    ///
    /// `ClientError::Validation` with the message the form shows.
    pub fn validate(&self) -> Result<Registration, ClientError> {
        let registration = Registration {
            username: self.username.trim().to_owned(),
            email: self.email.trim().to_owned(),
            password: self.password.trim().to_owned(),
        };
        if registration.username.is_empty() {
            return Err(ClientError::Validation("Username is required.".to_owned()));
        }
        if !registration.email.contains('@') {
            return Err(ClientError::Validation("Invalid email format.".to_owned()));
        }
        if registration.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ClientError::Validation(format!("Password must be at least {MIN_PASSWORD_LEN} characters.")));
        }
        Ok(registration)
    }

    /// Create the account. Logs straight in when the backend hands back
    /// tokens; otherwise sends the user to the login form.
    pub async fn submit(&mut self, client: &HttpClient) -> ViewOutcome {
        let registration = match self.validate() {
            Ok(registration) => registration,
            Err(e) => {
                self.status = ViewStatus::Error(e.to_string());
                return ViewOutcome::Stay;
            }
        };

        self.status = ViewStatus::Loading;
        match api::auth::register(client, &registration).await {
            Ok(resp) => {
                self.password.clear();
                if let (Some(access), Some(refresh)) = (resp.access.as_deref(), resp.refresh.as_deref()) {
                    let session = client.session();
                    session.set_tokens(access, refresh);
                    session.set_user_email(&registration.email);
                    tracing::info!(username = %registration.username, "registered and logged in");
                    self.status = ViewStatus::Success("Registration successful! Redirecting...".to_owned());
                    ViewOutcome::Navigate(Route::Dashboard)
                } else {
                    tracing::info!(username = %registration.username, "registered; login required");
                    self.status = ViewStatus::Success("Registration successful! Please log in.".to_owned());
                    ViewOutcome::Navigate(Route::Login)
                }
            }
            Err(e) => {
                tracing::info!(code = e.error_code(), "registration failed");
                let message =
                    e.field_message("email").unwrap_or_else(|| "Registration failed. Please try again.".to_owned());
                self.status = ViewStatus::Error(message);
                ViewOutcome::Stay
            }
        }
    }
}
