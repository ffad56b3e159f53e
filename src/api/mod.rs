use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Store;
use crate::services::{AnimeService, AuthService, SeaOrmAnimeService, SeaOrmAuthService};

mod anime;
pub mod auth;
mod error;
mod observability;
mod system;
pub mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    pub store: Arc<Store>,

    pub anime_service: Arc<dyn AnimeService>,

    pub auth_service: Arc<dyn AuthService>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }
}

pub fn create_app_state(
    config: Config,
    store: Store,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    let store = Arc::new(store);

    let anime_service = Arc::new(SeaOrmAnimeService::new(store.clone()));
    let auth_service = Arc::new(SeaOrmAuthService::new(store.clone()));

    Arc::new(AppState {
        config: Arc::new(config),
        store,
        anime_service,
        auth_service,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    Ok(create_app_state(config, store, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = &state.config.server.cors_allowed_origins;

    let cors_layer = if cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .route("/animes", get(anime::list_anime))
        .route("/animes/{id}", get(anime::get_anime))
        .route("/health", get(system::health))
        .route("/metrics", get(observability::get_metrics))
        .merge(create_protected_router(state.clone()))
        .route_layer(middleware::from_fn(observability::logging_middleware))
        .with_state(state)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

/// Mutating routes. Reads stay public; everything here needs a bearer token.
fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/animes", post(anime::create_anime))
        .route(
            "/animes/{id}",
            axum::routing::patch(anime::update_anime).delete(anime::delete_anime),
        )
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}
