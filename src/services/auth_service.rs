//! Domain service for bearer-token authentication.

use crate::domain::CurrentUser;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing or invalid API key")]
    InvalidApiKey,

    #[error("Database error: {0}")]
    Database(String),
}

/// Resolves a bearer credential into the identity it belongs to.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// # Errors
    ///
    /// - Returns [`AuthError::InvalidApiKey`] if no user holds `api_key`
    /// - Returns [`AuthError::Database`] on connection failures
    async fn authenticate(&self, api_key: &str) -> Result<CurrentUser, AuthError>;
}
