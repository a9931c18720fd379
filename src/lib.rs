//! Billboard rental pricing and contract service.
//!
//! Prices billboard contracts from the per-category pricing table, stores
//! them, and reports payment and expiry status.

use axum::{
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod pricing;
pub mod routes;

use cache::AppCache;
use config::Config;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub cache: AppCache,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            cache: AppCache::new(),
            config: Arc::new(config),
        }
    }
}

/// Build the application router
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health))
        .route("/health/cache", get(routes::health::cache_stats))
        .route("/api/contracts", post(routes::contracts::create))
        .route("/api/contracts/expiring", get(routes::contracts::expiring))
        .route(
            "/api/contracts/:id",
            get(routes::contracts::show).put(routes::contracts::update),
        )
        .route("/api/contracts/:id/draft", get(routes::contracts::draft))
        .merge(pricing::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .with_state(state)
}
