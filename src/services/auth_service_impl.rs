//! `SeaORM` implementation of the `AuthService` trait.

use crate::db::Store;
use crate::domain::CurrentUser;
use crate::services::auth_service::{AuthError, AuthService};
use std::sync::Arc;

pub struct SeaOrmAuthService {
    store: Arc<Store>,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Arc<Store>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl AuthService for SeaOrmAuthService {
    async fn authenticate(&self, api_key: &str) -> Result<CurrentUser, AuthError> {
        if api_key.is_empty() {
            return Err(AuthError::InvalidApiKey);
        }

        self.store
            .verify_api_key(api_key)
            .await
            .map_err(|e| AuthError::Database(format!("{e:#}")))?
            .map(CurrentUser::from)
            .ok_or(AuthError::InvalidApiKey)
    }
}
