use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{AnimeId, UserId};
use crate::models::anime::FieldError;

/// Error body shared by every failing endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
            details: None,
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: Vec<FieldError>) -> Self {
        self.details = Some(details);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimeDto {
    pub id: AnimeId,
    pub title: String,
    pub description: String,
    pub genre: String,
    pub on_going: bool,
    pub year_of_release: i32,
    pub image_of_anime: String,
    pub owner: OwnerDto,
    pub created_at: String,
    pub updated_at: String,
    pub title_and_year: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OwnerDto {
    pub id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// `{ "anime": ... }`, used for single-record requests and responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnimeEnvelope<T> {
    pub anime: T,
}

/// Request body of create and update: the fields stay untyped until the
/// record schema has filtered and validated them.
pub type AnimePayload = AnimeEnvelope<Map<String, Value>>;

#[derive(Debug, Serialize)]
pub struct AnimeListResponse {
    pub animes: Vec<AnimeDto>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}
