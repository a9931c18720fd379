//! Liveness and cache monitoring endpoints

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::cache::CacheStats;
use crate::AppState;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn cache_stats(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.stats())
}
