use anyhow::{Context, Result};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::{AnimeId, UserId};
use crate::entities::{animes, prelude::*, users};
use crate::models::anime::{AnimePatch, AnimeRecord, NewAnime};

/// Public view of a record's owner, joined in on reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerSummary {
    pub id: UserId,
    pub username: String,
}

pub type AnimeWithOwner = (AnimeRecord, Option<OwnerSummary>);

pub struct AnimeRepository {
    conn: DatabaseConnection,
}

impl AnimeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: animes::Model) -> AnimeRecord {
        AnimeRecord {
            id: AnimeId::new(model.id),
            title: model.title,
            description: model.description,
            genre: model.genre,
            on_going: model.on_going,
            year_of_release: model.year_of_release,
            image_of_anime: model.image_of_anime,
            owner: UserId::new(model.owner_id),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }

    fn map_with_owner((model, owner): (animes::Model, Option<users::Model>)) -> AnimeWithOwner {
        let owner = owner.map(|u| OwnerSummary {
            id: UserId::new(u.id),
            username: u.username,
        });
        (Self::map_model(model), owner)
    }

    /// All records in insertion order with their owners.
    pub async fn list_with_owner(&self) -> Result<Vec<AnimeWithOwner>> {
        let rows = Animes::find()
            .find_also_related(Users)
            .order_by_asc(animes::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list anime")?;

        Ok(rows.into_iter().map(Self::map_with_owner).collect())
    }

    pub async fn get(&self, id: AnimeId) -> Result<Option<AnimeRecord>> {
        let model = Animes::find_by_id(id.value())
            .one(&self.conn)
            .await
            .with_context(|| format!("Failed to query anime {id}"))?;

        Ok(model.map(Self::map_model))
    }

    pub async fn get_with_owner(&self, id: AnimeId) -> Result<Option<AnimeWithOwner>> {
        let row = Animes::find_by_id(id.value())
            .find_also_related(Users)
            .one(&self.conn)
            .await
            .with_context(|| format!("Failed to query anime {id}"))?;

        Ok(row.map(Self::map_with_owner))
    }

    pub async fn insert(&self, anime: &NewAnime, owner: UserId) -> Result<AnimeRecord> {
        let now = chrono::Utc::now().to_rfc3339();

        let active_model = animes::ActiveModel {
            title: Set(anime.title.clone()),
            description: Set(anime.description.clone()),
            genre: Set(anime.genre.clone()),
            on_going: Set(anime.on_going),
            year_of_release: Set(anime.year_of_release),
            image_of_anime: Set(anime.image_of_anime.clone()),
            owner_id: Set(owner.value()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.conn)
            .await
            .context("Failed to insert anime")?;

        Ok(Self::map_model(model))
    }

    /// Applies the fields present in `patch` in one statement.
    ///
    /// Returns `false` when no row matched, i.e. the record was deleted
    /// after the caller fetched it.
    pub async fn update(&self, id: AnimeId, patch: &AnimePatch) -> Result<bool> {
        let now = chrono::Utc::now().to_rfc3339();

        let mut update = Animes::update_many()
            .col_expr(animes::Column::UpdatedAt, Expr::value(now))
            .filter(animes::Column::Id.eq(id.value()));

        if let Some(title) = &patch.title {
            update = update.col_expr(animes::Column::Title, Expr::value(title.clone()));
        }
        if let Some(description) = &patch.description {
            update = update.col_expr(
                animes::Column::Description,
                Expr::value(description.clone()),
            );
        }
        if let Some(genre) = &patch.genre {
            update = update.col_expr(animes::Column::Genre, Expr::value(genre.clone()));
        }
        if let Some(on_going) = patch.on_going {
            update = update.col_expr(animes::Column::OnGoing, Expr::value(on_going));
        }
        if let Some(year) = patch.year_of_release {
            update = update.col_expr(animes::Column::YearOfRelease, Expr::value(year));
        }
        if let Some(image) = &patch.image_of_anime {
            update = update.col_expr(animes::Column::ImageOfAnime, Expr::value(image.clone()));
        }

        let result = update
            .exec(&self.conn)
            .await
            .with_context(|| format!("Failed to update anime {id}"))?;

        Ok(result.rows_affected > 0)
    }

    /// Returns `false` when there was nothing to delete.
    pub async fn delete(&self, id: AnimeId) -> Result<bool> {
        let result = Animes::delete_by_id(id.value())
            .exec(&self.conn)
            .await
            .with_context(|| format!("Failed to delete anime {id}"))?;

        Ok(result.rows_affected > 0)
    }
}
