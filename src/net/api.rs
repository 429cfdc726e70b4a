//! Typed wrappers for the Lost & Found REST endpoints.
//!
//! Every call goes through [`HttpClient`], so bearer injection and the 401
//! refresh path apply uniformly. Non-success statuses become
//! `ClientError::Status` / `ClientError::Unauthorized` here.
//!
//! ERROR HANDLING
//! ==============
//! Nothing is retried or swallowed at this layer; views decide what to show.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde::de::DeserializeOwned;

use super::client::HttpClient;
use super::request::{ApiRequest, ApiResponse};
use super::types::{
    ContactMessage, Credentials, Item, ItemDraft, LoginResponse, MessageResponse, RegisterResponse, Registration,
    UserProfile,
};
use crate::error::ClientError;

pub const LOGIN_PATH: &str = "/auth/login/";
pub const REGISTER_PATH: &str = "/auth/register/";
pub const LOGOUT_PATH: &str = "/auth/logout/";
pub const ITEMS_PATH: &str = "/items/";
pub const PROFILE_PATH: &str = "/user/profile/";
pub const CONTACT_PATH: &str = "/contact-reporter/";

/// How an item edit is submitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateMode {
    /// Partial update; the item form's edit mode.
    Patch,
    /// Full replacement; the profile page's edit dialog.
    Put,
}

fn item_path(id: i64) -> String {
    format!("{ITEMS_PATH}{id}/")
}

fn decode<T: DeserializeOwned>(response: ApiResponse) -> Result<T, ClientError> {
    response.error_for_status()?.json()
}

pub mod auth {
    use super::*;

    /// `POST /auth/login/`.
    ///
    /// # Errors
    ///
    /// `Unauthorized` for bad credentials, `Status` for other rejections.
    pub async fn login(client: &HttpClient, credentials: &Credentials) -> Result<LoginResponse, ClientError> {
        let request = ApiRequest::post(LOGIN_PATH).json(serde_json::to_value(credentials)?);
        decode(client.send(request).await?)
    }

    /// `POST /auth/register/`.
    ///
    /// # Errors
    ///
    /// `Status` with the backend's field errors on validation failure.
    pub async fn register(client: &HttpClient, registration: &Registration) -> Result<RegisterResponse, ClientError> {
        let request = ApiRequest::post(REGISTER_PATH).json(serde_json::to_value(registration)?);
        decode(client.send(request).await?)
    }

    /// `POST /auth/logout/`. The backend does not blacklist tokens; this only
    /// tells it the user left.
    ///
    /// # Errors
    ///
    /// Any transport or status failure.
    pub async fn logout(client: &HttpClient) -> Result<MessageResponse, ClientError> {
        decode(client.send(ApiRequest::post(LOGOUT_PATH)).await?)
    }
}

pub mod items {
    use super::*;

    /// `GET /items/`, newest first.
    ///
    /// # Errors
    ///
    /// Any transport, status, or decode failure.
    pub async fn list(client: &HttpClient) -> Result<Vec<Item>, ClientError> {
        decode(client.send(ApiRequest::get(ITEMS_PATH)).await?)
    }

    /// `GET /items/?search=<term>`. A blank term yields an empty list without
    /// touching the network.
    ///
    /// # Errors
    ///
    /// Any transport, status, or decode failure.
    pub async fn search(client: &HttpClient, term: &str) -> Result<Vec<Item>, ClientError> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }
        decode(client.send(ApiRequest::get(ITEMS_PATH).query("search", term)).await?)
    }

    /// `POST /items/` as multipart form data.
    ///
    /// # Errors
    ///
    /// Any transport, status, or decode failure.
    pub async fn create(client: &HttpClient, draft: &ItemDraft) -> Result<Item, ClientError> {
        let request = ApiRequest::post(ITEMS_PATH).multipart(draft.to_form_parts());
        decode(client.send(request).await?)
    }

    /// `PATCH` or `PUT /items/{id}/` as multipart form data.
    ///
    /// # Errors
    ///
    /// `Status` 403 when the item belongs to another user.
    pub async fn update(client: &HttpClient, id: i64, draft: &ItemDraft, mode: UpdateMode) -> Result<Item, ClientError> {
        let path = item_path(id);
        let request = match mode {
            UpdateMode::Patch => ApiRequest::patch(path),
            UpdateMode::Put => ApiRequest::put(path),
        };
        decode(client.send(request.multipart(draft.to_form_parts())).await?)
    }

    /// `DELETE /items/{id}/` (soft delete on the backend).
    ///
    /// # Errors
    ///
    /// Any transport or status failure.
    pub async fn delete(client: &HttpClient, id: i64) -> Result<MessageResponse, ClientError> {
        decode(client.send(ApiRequest::delete(item_path(id))).await?)
    }
}

pub mod profile {
    use super::*;

    /// `GET /user/profile/`: the user plus their posted items.
    ///
    /// # Errors
    ///
    /// `Unauthorized` once the session can no longer be refreshed.
    pub async fn fetch(client: &HttpClient) -> Result<UserProfile, ClientError> {
        decode(client.send(ApiRequest::get(PROFILE_PATH)).await?)
    }
}

pub mod contact {
    use super::*;

    /// `POST /contact-reporter/`: email the item's reporter.
    ///
    /// # Errors
    ///
    /// Any transport or status failure.
    pub async fn send(client: &HttpClient, message: &ContactMessage) -> Result<MessageResponse, ClientError> {
        let request = ApiRequest::post(CONTACT_PATH).json(serde_json::to_value(message)?);
        decode(client.send(request).await?)
    }
}
