//! `SeaORM` implementation of the `AnimeService` trait.

use crate::api::types::AnimeDto;
use crate::db::{OwnerSummary, Store};
use crate::domain::{AnimeId, CurrentUser};
use crate::models::anime::{AnimePatch, NewAnime};
use crate::services::anime_service::{AnimeError, AnimeService, anime_to_dto, require_ownership};
use std::sync::Arc;
use tracing::{debug, info};

pub struct SeaOrmAnimeService {
    store: Arc<Store>,
}

impl SeaOrmAnimeService {
    #[must_use]
    pub const fn new(store: Arc<Store>) -> Self {
        Self { store }
    }
}

fn db_err(e: &anyhow::Error) -> AnimeError {
    AnimeError::Database(format!("{e:#}"))
}

#[async_trait::async_trait]
impl AnimeService for SeaOrmAnimeService {
    async fn list_anime(&self) -> Result<Vec<AnimeDto>, AnimeError> {
        let rows = self
            .store
            .list_anime_with_owner()
            .await
            .map_err(|e| db_err(&e))?;

        Ok(rows
            .into_iter()
            .map(|(record, owner)| anime_to_dto(record, owner))
            .collect())
    }

    async fn get_anime(&self, id: AnimeId) -> Result<AnimeDto, AnimeError> {
        let (record, owner) = self
            .store
            .get_anime_with_owner(id)
            .await
            .map_err(|e| db_err(&e))?
            .ok_or(AnimeError::NotFound(id))?;

        Ok(anime_to_dto(record, owner))
    }

    async fn create_anime(
        &self,
        owner: &CurrentUser,
        input: NewAnime,
    ) -> Result<AnimeDto, AnimeError> {
        let record = self
            .store
            .insert_anime(&input, owner.id)
            .await
            .map_err(|e| db_err(&e))?;

        info!(anime_id = %record.id, owner = %owner.id, "Created anime '{}'", record.title);

        let summary = OwnerSummary {
            id: owner.id,
            username: owner.username.clone(),
        };
        Ok(anime_to_dto(record, Some(summary)))
    }

    async fn update_anime(
        &self,
        requester: &CurrentUser,
        id: AnimeId,
        patch: AnimePatch,
    ) -> Result<(), AnimeError> {
        let record = self
            .store
            .get_anime(id)
            .await
            .map_err(|e| db_err(&e))?
            .ok_or(AnimeError::NotFound(id))?;

        require_ownership(&record, requester)?;

        if patch.is_empty() {
            debug!(anime_id = %id, "Update carried no fields after filtering");
        }

        let updated = self
            .store
            .update_anime(id, &patch)
            .await
            .map_err(|e| db_err(&e))?;

        if !updated {
            return Err(AnimeError::NotFound(id));
        }

        info!(anime_id = %id, user = %requester.id, "Updated anime");
        Ok(())
    }

    async fn delete_anime(&self, requester: &CurrentUser, id: AnimeId) -> Result<(), AnimeError> {
        let record = self
            .store
            .get_anime(id)
            .await
            .map_err(|e| db_err(&e))?
            .ok_or(AnimeError::NotFound(id))?;

        require_ownership(&record, requester)?;

        let deleted = self
            .store
            .delete_anime(id)
            .await
            .map_err(|e| db_err(&e))?;

        if !deleted {
            return Err(AnimeError::NotFound(id));
        }

        info!(anime_id = %id, user = %requester.id, "Deleted anime");
        Ok(())
    }
}
