use super::ApiError;
use crate::domain::AnimeId;

/// Anything that is not a positive integer cannot name a stored record, so it
/// is reported exactly like a missing one.
pub fn parse_anime_id(raw: &str) -> Result<AnimeId, ApiError> {
    raw.parse::<AnimeId>().map_err(|_| ApiError::not_found())
}
