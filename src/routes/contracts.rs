//! Contract route handlers

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use chrono::{Local, NaiveDate};

use crate::error::Result;
use crate::pricing::requests::{ExpiringQuery, SaveContractRequest};
use crate::pricing::responses::{
    ContractDraftResponse, ContractStatusResponse, ExpiringContractsResponse, SavedContractResponse,
};
use crate::pricing::services;
use crate::AppState;

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Create a contract from a draft
pub async fn create(
    State(state): State<AppState>,
    request: std::result::Result<Json<SaveContractRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SavedContractResponse>)> {
    let Json(request) = request?;
    let (id, quote) =
        services::save_contract(&state.db, &state.cache, &state.config, &request, None).await?;

    Ok((
        StatusCode::CREATED,
        Json(SavedContractResponse {
            id,
            quote: quote.into(),
        }),
    ))
}

/// Re-price and overwrite an existing contract
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    request: std::result::Result<Json<SaveContractRequest>, JsonRejection>,
) -> Result<Json<SavedContractResponse>> {
    let Json(request) = request?;
    let (id, quote) =
        services::save_contract(&state.db, &state.cache, &state.config, &request, Some(id))
            .await?;

    Ok(Json(SavedContractResponse {
        id,
        quote: quote.into(),
    }))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ContractStatusResponse>> {
    let contract = services::get_contract_status(&state.db, id, today()).await?;
    Ok(Json(contract))
}

/// Draft state for the edit screen
pub async fn draft(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ContractDraftResponse>> {
    let draft = services::contract_draft(&state.db, &state.cache, id).await?;
    Ok(Json(draft))
}

/// Contracts ending within `days` (default from config)
pub async fn expiring(
    State(state): State<AppState>,
    query: std::result::Result<Query<ExpiringQuery>, QueryRejection>,
) -> Result<Json<ExpiringContractsResponse>> {
    let Query(query) = query?;
    let as_of = today();
    let window_days = query.days.unwrap_or(state.config.expiring_window_days);
    let contracts = services::expiring_contracts(&state.db, as_of, window_days).await?;

    Ok(Json(ExpiringContractsResponse {
        as_of,
        window_days,
        contracts,
    }))
}
