use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use std::sync::Arc;

use super::validation::parse_anime_id;
use super::{AnimeDto, AnimeEnvelope, AnimeListResponse, AnimePayload, ApiError, AppState};
use crate::domain::CurrentUser;
use crate::models::anime::{AnimePatch, NewAnime};

/// GET /animes
pub async fn list_anime(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AnimeListResponse>, ApiError> {
    let animes = state.anime_service.list_anime().await?;
    Ok(Json(AnimeListResponse { animes }))
}

/// GET /animes/{id}
pub async fn get_anime(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<AnimeEnvelope<AnimeDto>>, ApiError> {
    let id = parse_anime_id(&id)?;
    let anime = state.anime_service.get_anime(id).await?;
    Ok(Json(AnimeEnvelope { anime }))
}

/// POST /animes
pub async fn create_anime(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    payload: Result<Json<AnimePayload>, JsonRejection>,
) -> Result<(StatusCode, Json<AnimeEnvelope<AnimeDto>>), ApiError> {
    let Json(payload) = payload?;
    let input = NewAnime::from_json(&payload.anime)?;

    let anime = state.anime_service.create_anime(&user, input).await?;
    Ok((StatusCode::CREATED, Json(AnimeEnvelope { anime })))
}

/// PATCH /animes/{id}
pub async fn update_anime(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    payload: Result<Json<AnimePayload>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let id = parse_anime_id(&id)?;
    let Json(payload) = payload?;
    let patch = AnimePatch::from_json(payload.anime)?;

    state.anime_service.update_anime(&user, id, patch).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /animes/{id}
pub async fn delete_anime(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_anime_id(&id)?;
    state.anime_service.delete_anime(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
