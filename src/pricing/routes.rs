//! HTTP handlers for quoting and pricing table administration.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};

use crate::error::Result;
use crate::AppState;

use super::lookup::resolve_price;
use super::models::PricingEntry;
use super::queries;
use super::requests::{DraftRequest, PriceLookupQuery, PricingEntriesQuery, UpsertPricingEntryRequest};
use super::responses::{PriceLookupResponse, QuoteResponse};
use super::services;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/pricing/quote", post(quote))
        .route("/api/pricing/lookup", get(lookup))
        .route("/api/pricing/entries", get(list_entries).put(upsert_entry))
        .route("/api/pricing/entries/:id", delete(delete_entry))
}

/// Price a draft without saving it
async fn quote(
    State(state): State<AppState>,
    request: std::result::Result<Json<DraftRequest>, JsonRejection>,
) -> Result<Json<QuoteResponse>> {
    let Json(request) = request?;
    let draft = services::build_draft(&state.db, &state.cache, &state.config, &request).await?;
    let quote = services::quote_contract(&state.db, &state.cache, &draft).await?;

    Ok(Json(quote.into()))
}

/// Unit price of one size/level/category combination
async fn lookup(
    State(state): State<AppState>,
    query: std::result::Result<Query<PriceLookupQuery>, QueryRejection>,
) -> Result<Json<PriceLookupResponse>> {
    let Query(query) = query?;
    let table = services::load_pricing_table(&state.db, &state.cache, &query.category).await?;
    let price = resolve_price(
        &table,
        &query.size,
        &query.level,
        &query.category,
        query.mode,
        query.duration,
    );

    Ok(Json(PriceLookupResponse {
        size: query.size,
        level: query.level,
        category: query.category,
        price,
    }))
}

async fn list_entries(
    State(state): State<AppState>,
    query: std::result::Result<Query<PricingEntriesQuery>, QueryRejection>,
) -> Result<Json<Vec<PricingEntry>>> {
    let Query(query) = query?;
    let entries = queries::list_pricing_entries(
        &state.db,
        query.level.as_deref(),
        query.category.as_deref(),
    )
    .await?;

    Ok(Json(entries))
}

async fn upsert_entry(
    State(state): State<AppState>,
    request: std::result::Result<Json<UpsertPricingEntryRequest>, JsonRejection>,
) -> Result<Json<PricingEntry>> {
    let Json(request) = request?;
    let saved = services::save_pricing_entry(&state.db, &state.cache, request.into_entry()).await?;
    Ok(Json(saved))
}

async fn delete_entry(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode> {
    services::remove_pricing_entry(&state.db, &state.cache, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
