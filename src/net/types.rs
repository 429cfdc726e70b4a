//! Wire DTOs for the Lost & Found REST backend.
//!
//! DESIGN
//! ======
//! Response types tolerate missing optional fields and ignore unknown ones;
//! the backend adds keys (`message`, `user`) to some responses depending on
//! the endpoint version.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

use super::request::FormPart;

/// Largest image the item form accepts.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

const CLOUDINARY_UPLOAD_MARKER: &str = "/image/upload/";

// =============================================================================
// AUTH
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub access: Option<String>,
    #[serde(default)]
    pub refresh: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
}

/// Generic `{"message": ...}` acknowledgement.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

// =============================================================================
// ITEMS
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    #[serde(alias = "Lost")]
    Lost,
    #[serde(alias = "Found")]
    Found,
}

impl Category {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lost => "lost",
            Self::Found => "found",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "lost" => Ok(Self::Lost),
            "found" => Ok(Self::Found),
            other => Err(format!("unknown category: {other} (expected lost or found)")),
        }
    }
}

/// A reported lost or found item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    #[serde(default)]
    pub location: String,
    /// Hosted image URL.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub is_deleted: bool,
}

/// Image attached to an item form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageUpload {
    /// Freshly selected file.
    File { file_name: String, content_type: String, bytes: Vec<u8> },
    /// Image already hosted; re-sent as its upload public id.
    Existing(String),
}

/// Form contents for creating or editing an item.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemDraft {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub location: String,
    pub contact_email: Option<String>,
    pub image: Option<ImageUpload>,
}

impl ItemDraft {
    /// Prefill a draft from an existing item (edit mode).
    #[must_use]
    pub fn from_item(item: &Item) -> Self {
        Self {
            title: item.title.clone(),
            description: item.description.clone(),
            category: item.category,
            location: item.location.clone(),
            contact_email: item.contact_email.clone(),
            image: item.image.clone().map(ImageUpload::Existing),
        }
    }

    /// Multipart fields; blank text fields are omitted like the web form does.
    #[must_use]
    pub fn to_form_parts(&self) -> Vec<FormPart> {
        let mut parts = Vec::new();
        let mut text = |name: &str, value: &str| {
            if !value.is_empty() {
                parts.push(FormPart::Text { name: name.to_owned(), value: value.to_owned() });
            }
        };
        text("title", &self.title);
        text("description", &self.description);
        text("category", self.category.as_str());
        text("location", &self.location);
        text("contact_email", self.contact_email.as_deref().unwrap_or_default());

        match &self.image {
            Some(ImageUpload::File { file_name, content_type, bytes }) => parts.push(FormPart::File {
                name: "image".to_owned(),
                file_name: file_name.clone(),
                content_type: content_type.clone(),
                bytes: bytes.clone(),
            }),
            Some(ImageUpload::Existing(url)) if url.starts_with("http") => parts.push(FormPart::Text {
                name: "image".to_owned(),
                value: upload_public_id(url).to_owned(),
            }),
            Some(ImageUpload::Existing(_)) | None => {}
        }
        parts
    }
}

/// Strip a hosted image URL down to the part after `/image/upload/`.
#[must_use]
pub fn upload_public_id(url: &str) -> &str {
    url.rfind(CLOUDINARY_UPLOAD_MARKER)
        .map_or(url, |index| &url[index + CLOUDINARY_UPLOAD_MARKER.len()..])
}

// =============================================================================
// PROFILE / CONTACT
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
    pub user: User,
    #[serde(default)]
    pub posted_items: Vec<Item>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ContactMessage {
    pub item_id: i64,
    pub message: String,
    /// Recipient: the reporter's contact email.
    pub mail: String,
}
