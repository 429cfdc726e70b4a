#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;

use super::{ViewOutcome, ViewStatus, after_failure};
use crate::error::ClientError;
use crate::net::HttpClient;
use crate::net::api::{self, UpdateMode};
use crate::net::types::{Category, Item, ItemDraft, User, UserProfile};

/// The signed-in user's page: who they are and what they posted.
#[derive(Debug, Default)]
pub struct ProfileView {
    profile: Option<UserProfile>,
    status: ViewStatus,
}

impl ProfileView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.profile.as_ref().map(|profile| &profile.user)
    }

    #[must_use]
    pub fn posted_items(&self) -> &[Item] {
        self.profile.as_ref().map(|profile| profile.posted_items.as_slice()).unwrap_or_default()
    }

    #[must_use]
    pub fn status(&self) -> &ViewStatus {
        &self.status
    }

    pub async fn load(&mut self, client: &HttpClient) -> ViewOutcome {
        self.status = ViewStatus::Loading;
        match api::profile::fetch(client).await {
            Ok(profile) => {
                tracing::debug!(posted = profile.posted_items.len(), "profile loaded");
                self.profile = Some(profile);
                self.status = ViewStatus::Idle;
                ViewOutcome::Stay
            }
            Err(e) => self.failed(&e, "Failed to load profile data."),
        }
    }

    /// Replace one of the user's items (PUT) and reload.
    ///
    /// Switching an item to `found` notifies every user, so it needs
    /// `confirm_found`; without it nothing is sent.
    pub async fn update_item(
        &mut self,
        client: &HttpClient,
        id: i64,
        draft: &ItemDraft,
        confirm_found: bool,
    ) -> ViewOutcome {
        if draft.category == Category::Found && !confirm_found {
            let err = ClientError::Validation("Confirm marking this item as found.".to_owned());
            self.status = ViewStatus::Error(err.to_string());
            return ViewOutcome::Stay;
        }

        self.status = ViewStatus::Loading;
        match api::items::update(client, id, draft, UpdateMode::Put).await {
            Ok(_) => {
                tracing::info!(item_id = id, "item updated from profile");
                self.reload_with(client, "Item updated successfully! Users notified.").await
            }
            Err(e) => self.failed(&e, "Failed to update item."),
        }
    }

    pub async fn delete_item(&mut self, client: &HttpClient, id: i64) -> ViewOutcome {
        self.status = ViewStatus::Loading;
        match api::items::delete(client, id).await {
            Ok(_) => {
                tracing::info!(item_id = id, "item deleted");
                self.reload_with(client, "Item deleted successfully!").await
            }
            Err(e) => self.failed(&e, "Failed to delete item."),
        }
    }

    pub async fn logout(&mut self, client: &HttpClient) -> ViewOutcome {
        self.profile = None;
        self.status = ViewStatus::Idle;
        super::logout(client).await
    }

    async fn reload_with(&mut self, client: &HttpClient, success: &str) -> ViewOutcome {
        let outcome = self.load(client).await;
        if !self.status.is_error() {
            self.status = ViewStatus::Success(success.to_owned());
        }
        outcome
    }

    fn failed(&mut self, err: &ClientError, message: &str) -> ViewOutcome {
        tracing::warn!(error = %err, code = err.error_code(), "{message}");
        self.status = ViewStatus::Error(message.to_owned());
        after_failure(err)
    }
}
