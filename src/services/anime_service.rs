//! Domain service for the anime resource.
//!
//! Handlers never touch the store directly: they go through [`AnimeService`],
//! which owns the fetch, ownership check and mutate sequence.

use crate::api::types::{AnimeDto, OwnerDto};
use crate::db::OwnerSummary;
use crate::domain::{AnimeId, CurrentUser, UserId};
use crate::models::anime::{self, AnimePatch, AnimeRecord, NewAnime, ValidationErrors};
use thiserror::Error;

/// Domain errors for anime operations.
#[derive(Debug, Error)]
pub enum AnimeError {
    #[error("Anime not found: {0}")]
    NotFound(AnimeId),

    #[error("User {requester} does not own anime {id}")]
    Forbidden { id: AnimeId, requester: UserId },

    #[error("Invalid anime data: {0}")]
    Validation(ValidationErrors),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<ValidationErrors> for AnimeError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

/// Domain service trait for anime operations.
///
/// # Examples
///
/// ```rust,ignore
/// use animedex::services::{AnimeError, AnimeService};
/// use animedex::domain::AnimeId;
/// use std::sync::Arc;
///
/// async fn example(service: Arc<dyn AnimeService>) -> Result<(), AnimeError> {
///     let anime = service.get_anime(AnimeId::new(1)).await?;
///     println!("{}", anime.title_and_year);
///     Ok(())
/// }
/// ```
#[async_trait::async_trait]
pub trait AnimeService: Send + Sync {
    /// Lists every record in insertion order, owners expanded.
    ///
    /// # Errors
    ///
    /// Returns [`AnimeError::Database`] on connection failures.
    async fn list_anime(&self) -> Result<Vec<AnimeDto>, AnimeError>;

    /// # Errors
    ///
    /// - Returns [`AnimeError::NotFound`] if the record does not exist
    /// - Returns [`AnimeError::Database`] on connection failures
    async fn get_anime(&self, id: AnimeId) -> Result<AnimeDto, AnimeError>;

    /// Persists a new record owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`AnimeError::Database`] on connection failures.
    async fn create_anime(
        &self,
        owner: &CurrentUser,
        input: NewAnime,
    ) -> Result<AnimeDto, AnimeError>;

    /// Merges `patch` into the record if `requester` owns it.
    ///
    /// # Errors
    ///
    /// - Returns [`AnimeError::NotFound`] if the record does not exist, including
    ///   when it disappears between the ownership check and the write
    /// - Returns [`AnimeError::Forbidden`] if `requester` is not the owner
    /// - Returns [`AnimeError::Database`] on connection failures
    async fn update_anime(
        &self,
        requester: &CurrentUser,
        id: AnimeId,
        patch: AnimePatch,
    ) -> Result<(), AnimeError>;

    /// Permanently removes the record if `requester` owns it.
    ///
    /// # Errors
    ///
    /// Same as [`AnimeService::update_anime`].
    async fn delete_anime(&self, requester: &CurrentUser, id: AnimeId) -> Result<(), AnimeError>;
}

/// Fails with [`AnimeError::Forbidden`] unless `requester` owns `record`.
pub fn require_ownership(record: &AnimeRecord, requester: &CurrentUser) -> Result<(), AnimeError> {
    if record.owner == requester.id {
        Ok(())
    } else {
        Err(AnimeError::Forbidden {
            id: record.id,
            requester: requester.id,
        })
    }
}

#[must_use]
pub fn anime_to_dto(record: AnimeRecord, owner: Option<OwnerSummary>) -> AnimeDto {
    let title_and_year = anime::title_and_year(&record);
    let status = anime::status(&record).as_str().to_string();

    AnimeDto {
        id: record.id,
        title: record.title,
        description: record.description,
        genre: record.genre,
        on_going: record.on_going,
        year_of_release: record.year_of_release,
        image_of_anime: record.image_of_anime,
        owner: OwnerDto {
            id: record.owner,
            username: owner.map(|o| o.username),
        },
        created_at: record.created_at,
        updated_at: record.updated_at,
        title_and_year,
        status,
    }
}
