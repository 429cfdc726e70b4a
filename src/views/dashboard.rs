#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use super::{ContactView, ViewOutcome, ViewStatus, after_failure};
use crate::net::HttpClient;
use crate::net::api;
use crate::net::types::Item;

/// Item listing with search. Holds a single in-memory list.
#[derive(Debug, Default)]
pub struct DashboardView {
    items: Vec<Item>,
    term: String,
    status: ViewStatus,
}

impl DashboardView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn status(&self) -> &ViewStatus {
        &self.status
    }

    /// Current search term; empty when showing the full list.
    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Fetch the full list (on mount).
    pub async fn load(&mut self, client: &HttpClient) -> ViewOutcome {
        self.status = ViewStatus::Loading;
        self.term.clear();
        match api::items::list(client).await {
            Ok(items) => {
                tracing::debug!(count = items.len(), "items loaded");
                self.items = items;
                self.status = ViewStatus::Idle;
                ViewOutcome::Stay
            }
            Err(e) => {
                tracing::warn!(error = %e, "item list failed");
                self.status = ViewStatus::Error("Failed to load items. Please try again.".to_owned());
                after_failure(&e)
            }
        }
    }

    /// Replace the list with search results; a blank term restores the full
    /// list.
    pub async fn search(&mut self, client: &HttpClient, term: &str) -> ViewOutcome {
        let term = term.trim();
        if term.is_empty() {
            return self.load(client).await;
        }

        self.status = ViewStatus::Loading;
        term.clone_into(&mut self.term);
        match api::items::search(client, term).await {
            Ok(items) => {
                tracing::debug!(count = items.len(), term, "search results");
                self.items = items;
                self.status = ViewStatus::Idle;
                ViewOutcome::Stay
            }
            Err(e) => {
                tracing::warn!(error = %e, term, "search failed");
                self.status = ViewStatus::Error("Failed to search. Please try again!".to_owned());
                after_failure(&e)
            }
        }
    }

    /// Open the contact form for a listed item.
    #[must_use]
    pub fn select_for_contact(&self, item_id: i64, client: &HttpClient) -> Option<ContactView> {
        self.items.iter().find(|item| item.id == item_id).map(|item| ContactView::new(item, client.session()))
    }
}
