#[cfg(test)]
#[path = "contact_test.rs"]
mod contact_test;

use super::{ViewOutcome, ViewStatus, after_failure};
use crate::error::ClientError;
use crate::net::HttpClient;
use crate::net::api;
use crate::net::types::{ContactMessage, Item};
use crate::session::SessionStore;

/// The backend serializer rejects shorter messages.
pub const MIN_MESSAGE_LEN: usize = 10;

/// "Contact reporter" form for one item.
#[derive(Debug)]
pub struct ContactView {
    pub item_id: i64,
    /// Reporter address the message is delivered to.
    pub reporter_email: Option<String>,
    /// Sender address cached at login, shown for reference.
    pub sender_email: Option<String>,
    pub message: String,
    status: ViewStatus,
}

impl ContactView {
    #[must_use]
    pub fn new(item: &Item, session: &SessionStore) -> Self {
        Self {
            item_id: item.id,
            reporter_email: item.contact_email.clone().filter(|email| !email.trim().is_empty()),
            sender_email: session.user_email(),
            message: String::new(),
            status: ViewStatus::Idle,
        }
    }

    #[must_use]
    pub fn status(&self) -> &ViewStatus {
        &self.status
    }

    /// # Errors
    ///
    /// `ClientError::Validation` when the message or reporter address is unusable.
    pub fn validate(&self) -> Result<ContactMessage, ClientError> {
        let message = self.message.trim();
        if message.is_empty() {
            return Err(ClientError::Validation("Please enter a message.".to_owned()));
        }
        if message.chars().count() < MIN_MESSAGE_LEN {
            return Err(ClientError::Validation(format!(
                "Message must be at least {MIN_MESSAGE_LEN} characters."
            )));
        }
        let Some(mail) = self.reporter_email.clone() else {
            return Err(ClientError::Validation("This item has no contact email.".to_owned()));
        };
        Ok(ContactMessage { item_id: self.item_id, message: message.to_owned(), mail })
    }

    pub async fn send(&mut self, client: &HttpClient) -> ViewOutcome {
        let payload = match self.validate() {
            Ok(payload) => payload,
            Err(e) => {
                self.status = ViewStatus::Error(e.to_string());
                return ViewOutcome::Stay;
            }
        };

        self.status = ViewStatus::Loading;
        match api::contact::send(client, &payload).await {
            Ok(_) => {
                tracing::info!(item_id = self.item_id, "reporter contacted");
                self.message.clear();
                self.status = ViewStatus::Success("Message sent successfully!".to_owned());
                ViewOutcome::Stay
            }
            Err(e) => {
                tracing::warn!(item_id = self.item_id, error = %e, "contact failed");
                self.status = ViewStatus::Error("Failed to send message. Please try again.".to_owned());
                after_failure(&e)
            }
        }
    }
}
