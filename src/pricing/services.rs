//! Pricing service functions with database access.
//!
//! These functions load pricing tables and billboards through the cache and
//! database, then hand everything to the pure calculators.

use axum::http::StatusCode;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, info};

use crate::cache::AppCache;
use crate::config::Config;
use crate::db;
use crate::error::Result;
use crate::models::ContractRecord;

use super::calculators::{calculate_contract_totals, ContractQuote};
use super::draft::{ContractDraftState, DraftUpdate};
use super::lookup::PricingTable;
use super::models::{Billboard, InstallationPrice, PricingEntry};
use super::queries;
use super::requests::{DraftRequest, SaveContractRequest};
use super::responses::{ContractDraftResponse, ContractStatusResponse};
use super::size::{compare_sizes, BillboardSize, SizeMatch};
use super::status::{classify_contract, contract_end_date, days_until_end, is_expiring_within};

/// Pricing calculation error types
#[derive(Debug, Clone)]
pub enum PricingError {
    UnknownBillboards {
        ids: Vec<i64>,
    },
    EmptyDraft,
    ContractNotFound {
        id: i64,
    },
    PricingEntryNotFound {
        id: i64,
    },
    InvalidPricingEntry {
        message: String,
        errors: Vec<String>,
    },
}

impl std::fmt::Display for PricingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PricingError::UnknownBillboards { ids } => {
                write!(f, "Unknown billboard ids: {:?}", ids)
            }
            PricingError::EmptyDraft => write!(f, "A contract needs at least one billboard"),
            PricingError::ContractNotFound { id } => write!(f, "Contract {} not found", id),
            PricingError::PricingEntryNotFound { id } => {
                write!(f, "Pricing entry {} not found", id)
            }
            PricingError::InvalidPricingEntry { message, .. } => {
                write!(f, "Invalid pricing entry: {}", message)
            }
        }
    }
}

impl std::error::Error for PricingError {}

impl PricingError {
    pub fn error_type(&self) -> &'static str {
        match self {
            PricingError::UnknownBillboards { .. } => "unknown_billboards",
            PricingError::EmptyDraft => "empty_draft",
            PricingError::ContractNotFound { .. } => "contract_not_found",
            PricingError::PricingEntryNotFound { .. } => "pricing_entry_not_found",
            PricingError::InvalidPricingEntry { .. } => "invalid_pricing_entry",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            PricingError::ContractNotFound { .. } | PricingError::PricingEntryNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            PricingError::UnknownBillboards { .. } | PricingError::InvalidPricingEntry { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            PricingError::EmptyDraft => StatusCode::BAD_REQUEST,
        }
    }

    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            PricingError::UnknownBillboards { ids } => Some(serde_json::json!({ "ids": ids })),
            PricingError::InvalidPricingEntry { errors, .. } => {
                Some(serde_json::json!({ "errors": errors }))
            }
            _ => None,
        }
    }
}

/// Load the pricing table of a customer category, cache first.
pub async fn load_pricing_table(
    pool: &PgPool,
    cache: &AppCache,
    category: &str,
) -> Result<Arc<PricingTable>> {
    let key = AppCache::category_key(category);

    if let Some(cached) = cache.pricing_tables.get(&key).await {
        debug!("Cache HIT for pricing table: {}", key);
        return Ok(cached);
    }

    debug!("Cache MISS for pricing table: {}", key);
    let generation = cache.generation();
    let entries = queries::get_pricing_entries_by_category(pool, category).await?;
    let table = Arc::new(PricingTable::new(entries));
    cache.pricing_tables.insert(key.clone(), table.clone()).await;

    // Rows may predate a concurrent pricing write
    if cache.generation() != generation {
        cache.pricing_tables.invalidate(&key).await;
    }

    Ok(table)
}

/// Load installation prices, cache first.
pub async fn load_installation_prices(
    pool: &PgPool,
    cache: &AppCache,
) -> Result<Arc<Vec<InstallationPrice>>> {
    let key = AppCache::installation_key();

    if let Some(cached) = cache.installation_prices.get(&key).await {
        return Ok(cached);
    }

    let prices = Arc::new(queries::get_installation_prices(pool).await?);
    cache.installation_prices.insert(key, prices.clone()).await;

    Ok(prices)
}

/// Installation price for a size, matching either orientation.
pub fn installation_price_for(prices: &[InstallationPrice], size: &str) -> Option<Decimal> {
    let mut flipped = None;

    for price in prices {
        match compare_sizes(&price.size, size) {
            Some(SizeMatch::Exact) => return Some(price.install_price),
            Some(SizeMatch::Flipped) if flipped.is_none() => flipped = Some(price.install_price),
            _ => {}
        }
    }

    flipped
}

/// Load billboards by id and attach installation prices.
///
/// Fails when any requested id does not exist.
pub async fn load_billboards(
    pool: &PgPool,
    cache: &AppCache,
    ids: &[i64],
) -> Result<Vec<Billboard>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut billboards = db::get_billboards_by_ids(pool, ids).await?;

    let missing: Vec<i64> = ids
        .iter()
        .filter(|id| !billboards.iter().any(|b| b.id == **id))
        .copied()
        .collect();
    if !missing.is_empty() {
        return Err(PricingError::UnknownBillboards { ids: missing }.into());
    }

    let installation = load_installation_prices(pool, cache).await?;
    for billboard in &mut billboards {
        billboard.installation_price = installation_price_for(&installation, &billboard.size);
    }

    // Keep the order the user selected them in
    billboards.sort_by_key(|b| ids.iter().position(|id| *id == b.id));

    Ok(billboards)
}

/// Build a full draft, billboards included, from a form request.
pub async fn build_draft(
    pool: &PgPool,
    cache: &AppCache,
    config: &Config,
    request: &DraftRequest,
) -> Result<ContractDraftState> {
    let billboards = load_billboards(pool, cache, &request.billboard_ids).await?;

    Ok(request
        .to_draft(&config.default_currency, config.default_operating_fee_rate)
        .apply_all(billboards.into_iter().map(DraftUpdate::AddBillboard)))
}

/// Price a draft against its customer category's table.
pub async fn quote_contract(
    pool: &PgPool,
    cache: &AppCache,
    draft: &ContractDraftState,
) -> Result<ContractQuote> {
    let table = load_pricing_table(pool, cache, &draft.pricing_category).await?;
    let quote = calculate_contract_totals(draft, &table);

    debug!(
        "Quoted {} billboards for category '{}': final total {} {}",
        quote.lines.len(),
        draft.pricing_category,
        quote.summary.final_total,
        quote.currency
    );

    Ok(quote)
}

/// Canonical contract row for a priced draft.
pub fn contract_record(
    request: &SaveContractRequest,
    draft: &ContractDraftState,
    quote: &ContractQuote,
) -> ContractRecord {
    let end_date = request.end_date.or_else(|| {
        request
            .start_date
            .and_then(|start| contract_end_date(start, draft.pricing_mode, draft.duration))
    });
    let summary = &quote.summary;

    ContractRecord {
        id: 0,
        customer_name: request.customer_name.trim().to_string(),
        customer_category: draft.pricing_category.clone(),
        start_date: request.start_date,
        end_date,
        pricing_mode: draft.pricing_mode,
        duration: draft.duration,
        currency: draft.currency.clone(),
        exchange_rate: draft.exchange_rate,
        billboard_ids: draft.billboard_ids(),
        print_cost_enabled: draft.print_cost_enabled,
        print_price_per_meter: draft.print_price_per_meter,
        installation_included: draft.installation_included,
        base_total: summary.base_total,
        discount_amount: summary.discount_amount,
        installation_cost: summary.installation_cost,
        print_cost_total: summary.print_cost_total,
        rental_cost_only: summary.rental_cost_only,
        operating_fee_rate: draft.operating_fee_rate,
        operating_fee: summary.operating_fee,
        total_cost: Some(summary.final_total),
        total_paid: None,
    }
}

/// Price and persist a contract. Updates when `id` is given.
pub async fn save_contract(
    pool: &PgPool,
    cache: &AppCache,
    config: &Config,
    request: &SaveContractRequest,
    id: Option<i64>,
) -> Result<(i64, ContractQuote)> {
    if request.draft.billboard_ids.is_empty() {
        return Err(PricingError::EmptyDraft.into());
    }

    let draft = build_draft(pool, cache, config, &request.draft).await?;
    let quote = quote_contract(pool, cache, &draft).await?;
    let record = contract_record(request, &draft, &quote);

    let id = match id {
        Some(id) => {
            if !db::update_contract(pool, id, &record).await? {
                return Err(PricingError::ContractNotFound { id }.into());
            }
            info!("Contract {} updated, total {}", id, quote.summary.final_total);
            id
        }
        None => {
            let id = db::insert_contract(pool, &record).await?;
            info!("Contract {} created, total {}", id, quote.summary.final_total);
            id
        }
    };

    Ok((id, quote))
}

/// Attach the derived status to a contract.
pub fn contract_status(record: ContractRecord, today: NaiveDate) -> ContractStatusResponse {
    let status = classify_contract(record.end_date, record.total_paid, record.total_cost, today);

    ContractStatusResponse {
        remaining: record.remaining(),
        days_until_end: record.end_date.map(|end| days_until_end(end, today)),
        status,
        contract: record,
    }
}

/// Get one contract with its status.
pub async fn get_contract_status(
    pool: &PgPool,
    id: i64,
    today: NaiveDate,
) -> Result<ContractStatusResponse> {
    let record = db::get_contract(pool, id)
        .await?
        .ok_or(PricingError::ContractNotFound { id })?;

    Ok(contract_status(record, today))
}

/// Contracts ending within `window_days`, soonest first.
pub fn filter_expiring(
    records: Vec<ContractRecord>,
    today: NaiveDate,
    window_days: u32,
) -> Vec<ContractStatusResponse> {
    let mut expiring: Vec<ContractStatusResponse> = records
        .into_iter()
        .filter(|record| {
            record
                .end_date
                .is_some_and(|end| is_expiring_within(end, today, window_days))
        })
        .map(|record| contract_status(record, today))
        .collect();

    expiring.sort_by_key(|c| c.contract.end_date);
    expiring
}

pub async fn expiring_contracts(
    pool: &PgPool,
    today: NaiveDate,
    window_days: u32,
) -> Result<Vec<ContractStatusResponse>> {
    let records = db::get_all_contracts(pool).await?;
    Ok(filter_expiring(records, today, window_days))
}

/// Rebuild the draft of a stored contract for editing.
pub async fn contract_draft(
    pool: &PgPool,
    cache: &AppCache,
    id: i64,
) -> Result<ContractDraftResponse> {
    let record = db::get_contract(pool, id)
        .await?
        .ok_or(PricingError::ContractNotFound { id })?;

    let mut billboards = db::get_billboards_by_ids(pool, &record.billboard_ids).await?;
    let installation = load_installation_prices(pool, cache).await?;
    for billboard in &mut billboards {
        billboard.installation_price = installation_price_for(&installation, &billboard.size);
    }

    let draft = ContractDraftState::from_contract(&record, billboards);
    let missing_billboard_ids = record
        .billboard_ids
        .iter()
        .filter(|id| !draft.billboards.iter().any(|b| b.id == **id))
        .copied()
        .collect();

    Ok(ContractDraftResponse {
        contract_id: record.id,
        draft,
        missing_billboard_ids,
    })
}

/// Check a pricing row before it is written.
pub fn validate_pricing_entry(entry: &PricingEntry) -> std::result::Result<(), PricingError> {
    let mut errors = Vec::new();

    if BillboardSize::parse(&entry.size).is_none() {
        errors.push(format!("size '{}' is not in WxH form", entry.size));
    }
    if entry.billboard_level.trim().is_empty() {
        errors.push("billboard_level is required".to_string());
    }
    if entry.customer_category.trim().is_empty() {
        errors.push("customer_category is required".to_string());
    }

    let has_price = [
        entry.one_day,
        entry.one_month,
        entry.two_months,
        entry.three_months,
        entry.six_months,
        entry.full_year,
    ]
    .iter()
    .any(|price| price.is_some_and(|p| p > Decimal::ZERO));
    if !has_price {
        errors.push("at least one price column must be set".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(PricingError::InvalidPricingEntry {
            message: errors.join("; "),
            errors,
        })
    }
}

/// Insert or update a pricing row and drop its category's cached table.
pub async fn save_pricing_entry(
    pool: &PgPool,
    cache: &AppCache,
    entry: PricingEntry,
) -> Result<PricingEntry> {
    validate_pricing_entry(&entry)?;

    let saved = queries::upsert_pricing_entry(pool, &entry).await?;
    cache.invalidate_category(&saved.customer_category).await;
    info!(
        "Pricing entry {} saved: {} / {} / {}",
        saved.id, saved.size, saved.billboard_level, saved.customer_category
    );

    Ok(saved)
}

/// Delete a pricing row and drop its category's cached table.
pub async fn remove_pricing_entry(pool: &PgPool, cache: &AppCache, id: i64) -> Result<()> {
    let category = queries::delete_pricing_entry(pool, id)
        .await?
        .ok_or(PricingError::PricingEntryNotFound { id })?;

    cache.invalidate_category(&category).await;
    info!("Pricing entry {} deleted", id);

    Ok(())
}
