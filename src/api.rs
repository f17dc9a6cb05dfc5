//! Persistence collaborator: wire types, the `BoardApi` seam, and its HTTP client.
//!
//! The engine never talks to the network itself. The sync layer calls a
//! [`BoardApi`]; production code uses [`HttpBoardApi`], tests substitute an
//! in-memory implementation.
//!
//! ERROR HANDLING
//! ==============
//! Every call makes exactly one request and resolves to `Ok` or an
//! [`ApiError`]. Nothing here retries; callers decide what a failure means.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::ApiConfig;
use crate::doc::{Board, Card, CardKind};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by persistence calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (connect, timeout, body read).
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("unexpected status {status}")]
    Status { status: u16, body: String },

    /// The response body was not the expected JSON.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),

    /// The file offered for upload is not an image.
    #[error("not an image: {0}")]
    InvalidImage(String),

    /// The task running the request died before it produced a response.
    #[error("request aborted: {0}")]
    Aborted(String),
}

impl ApiError {
    /// Stable code for logs and UI messages.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Request(_) => "E_REQUEST",
            Self::Status { status: 404, .. } => "E_NOT_FOUND",
            Self::Status { status: 401 | 403, .. } => "E_FORBIDDEN",
            Self::Status { .. } => "E_STATUS",
            Self::Decode(_) => "E_DECODE",
            Self::ClientBuild(_) => "E_CLIENT_BUILD",
            Self::InvalidImage(_) => "E_INVALID_IMAGE",
            Self::Aborted(_) => "E_ABORTED",
        }
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

/// A note as returned by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NoteDto {
    pub id: String,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub color: Option<String>,
    pub position_x: Option<f64>,
    pub position_y: Option<f64>,
    pub note_type: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

/// Body of a note create/update request. Never carries rotation or z-order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePayload {
    pub content: String,
    pub color: String,
    pub position_x: f64,
    pub position_y: f64,
    pub note_type: CardKind,
    pub width: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub height: Option<f64>,
}

impl NotePayload {
    /// Snapshot the persisted fields of a card.
    #[must_use]
    pub fn from_card(card: &Card) -> Self {
        Self {
            content: card.content.clone(),
            color: card.color.clone(),
            position_x: card.x,
            position_y: card.y,
            note_type: card.kind,
            width: card.width,
            height: card.height,
        }
    }
}

/// A link as returned by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkDto {
    pub id: String,
    pub board_id: Option<String>,
    pub from_note_id: String,
    pub to_note_id: String,
    pub color: Option<String>,
}

/// Body of a link create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkPayload {
    pub from_note_id: String,
    pub to_note_id: String,
    pub color: String,
}

/// An image picked by the user for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    /// Reject anything whose content type is not `image/*`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidImage`] for non-image content types.
    pub fn ensure_image(&self) -> Result<(), ApiError> {
        if self.content_type.starts_with("image/") {
            Ok(())
        } else {
            Err(ApiError::InvalidImage(self.content_type.clone()))
        }
    }
}

// =============================================================================
// BOARD API TRAIT
// =============================================================================

/// Remote CRUD operations the board view depends on. Enables mocking in tests.
#[async_trait::async_trait]
pub trait BoardApi: Send + Sync {
    async fn get_board(&self, board_id: &str) -> Result<Board, ApiError>;

    async fn get_cards(&self, board_id: &str) -> Result<Vec<NoteDto>, ApiError>;

    async fn get_links(&self, board_id: &str) -> Result<Vec<LinkDto>, ApiError>;

    async fn create_card(&self, board_id: &str, payload: &NotePayload) -> Result<NoteDto, ApiError>;

    async fn update_card(&self, board_id: &str, card_id: &str, payload: &NotePayload) -> Result<NoteDto, ApiError>;

    async fn delete_card(&self, board_id: &str, card_id: &str) -> Result<(), ApiError>;

    async fn create_link(&self, board_id: &str, payload: &LinkPayload) -> Result<LinkDto, ApiError>;

    async fn delete_link(&self, board_id: &str, link_id: &str) -> Result<(), ApiError>;

    /// Upload an image for a card; returns the card with its new image reference.
    async fn upload_image(&self, board_id: &str, card_id: &str, file: &ImageFile) -> Result<NoteDto, ApiError>;
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

/// [`BoardApi`] over the board service's REST endpoints.
pub struct HttpBoardApi {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpBoardApi {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ClientBuild`] if the underlying HTTP client cannot be created.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.base_url.trim_end_matches('/').to_owned(), token: config.token.clone() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(builder: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = builder.send().await.map_err(|e| ApiError::Request(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status { status: status.as_u16(), body })
    }

    async fn send_json<T: DeserializeOwned>(builder: reqwest::RequestBuilder) -> Result<T, ApiError> {
        let response = Self::send(builder).await?;
        let text = response.text().await.map_err(|e| ApiError::Request(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

fn board_path(board_id: &str) -> String {
    format!("/api/boards/{board_id}")
}

fn notes_path(board_id: &str) -> String {
    format!("/api/v1/boards/{board_id}/notes")
}

fn note_path(board_id: &str, card_id: &str) -> String {
    format!("/api/v1/boards/{board_id}/notes/{card_id}")
}

fn note_image_path(board_id: &str, card_id: &str) -> String {
    format!("/api/v1/boards/{board_id}/notes/{card_id}/image")
}

fn links_path(board_id: &str) -> String {
    format!("/api/v1/boards/{board_id}/links")
}

fn link_path(board_id: &str, link_id: &str) -> String {
    format!("/api/v1/boards/{board_id}/links/{link_id}")
}

#[async_trait::async_trait]
impl BoardApi for HttpBoardApi {
    async fn get_board(&self, board_id: &str) -> Result<Board, ApiError> {
        Self::send_json(self.request(reqwest::Method::GET, &board_path(board_id))).await
    }

    async fn get_cards(&self, board_id: &str) -> Result<Vec<NoteDto>, ApiError> {
        Self::send_json(self.request(reqwest::Method::GET, &notes_path(board_id))).await
    }

    async fn get_links(&self, board_id: &str) -> Result<Vec<LinkDto>, ApiError> {
        Self::send_json(self.request(reqwest::Method::GET, &links_path(board_id))).await
    }

    async fn create_card(&self, board_id: &str, payload: &NotePayload) -> Result<NoteDto, ApiError> {
        Self::send_json(self.request(reqwest::Method::POST, &notes_path(board_id)).json(payload)).await
    }

    async fn update_card(&self, board_id: &str, card_id: &str, payload: &NotePayload) -> Result<NoteDto, ApiError> {
        Self::send_json(self.request(reqwest::Method::PATCH, &note_path(board_id, card_id)).json(payload)).await
    }

    async fn delete_card(&self, board_id: &str, card_id: &str) -> Result<(), ApiError> {
        Self::send(self.request(reqwest::Method::DELETE, &note_path(board_id, card_id))).await?;
        Ok(())
    }

    async fn create_link(&self, board_id: &str, payload: &LinkPayload) -> Result<LinkDto, ApiError> {
        Self::send_json(self.request(reqwest::Method::POST, &links_path(board_id)).json(payload)).await
    }

    async fn delete_link(&self, board_id: &str, link_id: &str) -> Result<(), ApiError> {
        Self::send(self.request(reqwest::Method::DELETE, &link_path(board_id, link_id))).await?;
        Ok(())
    }

    async fn upload_image(&self, board_id: &str, card_id: &str, file: &ImageFile) -> Result<NoteDto, ApiError> {
        file.ensure_image()?;
        let part = reqwest::multipart::Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| ApiError::InvalidImage(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("file", part);
        Self::send_json(self.request(reqwest::Method::POST, &note_image_path(board_id, card_id)).multipart(form)).await
    }
}
