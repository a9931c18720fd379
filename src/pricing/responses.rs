//! Response DTOs for pricing API endpoints.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::calculators::{BillboardQuoteLine, ContractQuote, ContractSummary};
use super::draft::ContractDraftState;
use super::lookup::ResolvedPrice;
use super::status::ContractStatus;
use crate::models::ContractRecord;

/// Response for a contract quote
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub summary: ContractSummary,
    pub lines: Vec<BillboardQuoteLine>,
    pub currency: String,
    pub billboard_count: usize,
    /// Billboards priced at zero because no price was found
    pub unpriced_billboard_ids: Vec<i64>,
}

impl From<ContractQuote> for QuoteResponse {
    fn from(quote: ContractQuote) -> Self {
        let unpriced_billboard_ids = quote
            .lines
            .iter()
            .filter(|line| line.price_source == super::lookup::PriceSource::NotFound)
            .map(|line| line.billboard_id)
            .collect();

        Self {
            billboard_count: quote.lines.len(),
            summary: quote.summary,
            lines: quote.lines,
            currency: quote.currency,
            unpriced_billboard_ids,
        }
    }
}

/// Response for a single price lookup
#[derive(Debug, Serialize)]
pub struct PriceLookupResponse {
    pub size: String,
    pub level: String,
    pub category: String,
    #[serde(flatten)]
    pub price: ResolvedPrice,
}

/// Contract with its derived status
#[derive(Debug, Serialize)]
pub struct ContractStatusResponse {
    pub contract: ContractRecord,
    pub status: ContractStatus,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub remaining: Option<Decimal>,
    pub days_until_end: Option<i64>,
}

/// Response after saving a contract
#[derive(Debug, Serialize)]
pub struct SavedContractResponse {
    pub id: i64,
    pub quote: QuoteResponse,
}

/// Draft rebuilt from a stored contract for the edit screen
#[derive(Debug, Serialize)]
pub struct ContractDraftResponse {
    pub contract_id: i64,
    pub draft: ContractDraftState,
    /// Billboard ids on the contract that no longer exist
    pub missing_billboard_ids: Vec<i64>,
}

/// Contracts ending within a window
#[derive(Debug, Serialize)]
pub struct ExpiringContractsResponse {
    pub as_of: NaiveDate,
    pub window_days: u32,
    pub contracts: Vec<ContractStatusResponse>,
}

/// Generic pricing error response
#[derive(Debug, Serialize)]
pub struct PricingErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
