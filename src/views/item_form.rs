//! Report / edit form for a single item.
//!
//! Images are checked locally (type and size) before they ever reach the
//! draft, matching what the backend would reject anyway.

#[cfg(test)]
#[path = "item_form_test.rs"]
mod item_form_test;

use super::{ViewOutcome, ViewStatus, after_failure};
use crate::error::ClientError;
use crate::guard::Route;
use crate::net::HttpClient;
use crate::net::api::{self, UpdateMode};
use crate::net::types::{Category, ImageUpload, Item, ItemDraft, MAX_IMAGE_BYTES};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormMode {
    Report,
    Edit(i64),
}

#[derive(Debug)]
pub struct ItemFormView {
    mode: FormMode,
    pub draft: ItemDraft,
    status: ViewStatus,
}

impl ItemFormView {
    #[must_use]
    pub fn report() -> Self {
        Self { mode: FormMode::Report, draft: ItemDraft::default(), status: ViewStatus::Idle }
    }

    /// Edit mode, prefilled from `item`.
    #[must_use]
    pub fn edit(item: &Item) -> Self {
        Self { mode: FormMode::Edit(item.id), draft: ItemDraft::from_item(item), status: ViewStatus::Idle }
    }

    #[must_use]
    pub fn mode(&self) -> FormMode {
        self.mode
    }

    #[must_use]
    pub fn status(&self) -> &ViewStatus {
        &self.status
    }

    /// An edit that leaves the item `found` notifies every user and needs an
    /// explicit confirmation first.
    #[must_use]
    pub fn needs_found_confirmation(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_)) && self.draft.category == Category::Found
    }

    /// Attach a freshly picked image.
    ///
    /// # Errors
    ///
    /// `ClientError::Validation` for non-image content or files over 5 MiB;
    /// the previous image is kept.
    pub fn attach_image(
        &mut self,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<(), ClientError> {
        let content_type = content_type.into();
        let rejection = if !content_type.starts_with("image/") {
            Some("Only image files are allowed.")
        } else if bytes.len() > MAX_IMAGE_BYTES {
            Some("File size should be less than 5 MB.")
        } else {
            None
        };
        if let Some(message) = rejection {
            self.status = ViewStatus::Error(message.to_owned());
            return Err(ClientError::Validation(message.to_owned()));
        }
        self.draft.image = Some(ImageUpload::File { file_name: file_name.into(), content_type, bytes });
        Ok(())
    }

    /// # Errors
    ///
    /// `ClientError::Validation` naming the first missing field.
    pub fn validate(&self) -> Result<(), ClientError> {
        let required = [
            ("Title", &self.draft.title),
            ("Description", &self.draft.description),
            ("Location", &self.draft.location),
        ];
        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((label, _)) => Err(ClientError::Validation(format!("{label} is required."))),
            None => Ok(()),
        }
    }

    pub async fn submit(&mut self, client: &HttpClient) -> ViewOutcome {
        if let Err(e) = self.validate() {
            self.status = ViewStatus::Error(e.to_string());
            return ViewOutcome::Stay;
        }

        self.status = ViewStatus::Loading;
        let (result, verb) = match self.mode {
            FormMode::Report => (api::items::create(client, &self.draft).await, "report"),
            FormMode::Edit(id) => (api::items::update(client, id, &self.draft, UpdateMode::Patch).await, "update"),
        };

        match result {
            Ok(item) => {
                tracing::info!(item_id = item.id, mode = ?self.mode, "item saved");
                if self.mode == FormMode::Report {
                    self.draft = ItemDraft::default();
                    self.status = ViewStatus::Success("Item reported successfully!".to_owned());
                } else {
                    self.status = ViewStatus::Success("Item updated successfully!".to_owned());
                }
                ViewOutcome::Navigate(Route::Dashboard)
            }
            Err(e) => {
                tracing::warn!(error = %e, mode = ?self.mode, "item save failed");
                let message = e.field_message("error").unwrap_or_else(|| format!("Failed to {verb} item."));
                self.status = ViewStatus::Error(message);
                after_failure(&e)
            }
        }
    }
}
