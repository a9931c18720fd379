//! Contract models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use super::aliases::{self, canonical};
use crate::pricing::models::PricingMode;

/// Contract in the canonical schema.
///
/// Built from a `contracts` row serialized as JSON so rows still using
/// legacy column names can be read through [`aliases`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContractRecord {
    pub id: i64,
    pub customer_name: String,
    pub customer_category: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub pricing_mode: PricingMode,
    pub duration: u32,
    pub currency: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub exchange_rate: Decimal,
    pub billboard_ids: Vec<i64>,
    pub print_cost_enabled: bool,
    #[serde(with = "rust_decimal::serde::str")]
    pub print_price_per_meter: Decimal,
    pub installation_included: bool,
    #[serde(with = "rust_decimal::serde::str")]
    pub base_total: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub discount_amount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub installation_cost: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub print_cost_total: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub rental_cost_only: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub operating_fee_rate: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub operating_fee: Decimal,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub total_cost: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub total_paid: Option<Decimal>,
}

impl ContractRecord {
    /// Read a stored row. Returns `None` when the row has no usable id.
    pub fn from_row_json(row: &Value) -> Option<Self> {
        let id = aliases::resolve_i64(row, &aliases::CONTRACT_ID)?;
        let decimal = |name: &'static str| {
            aliases::resolve_decimal(row, &canonical(name)).unwrap_or(Decimal::ZERO)
        };

        Some(Self {
            id,
            customer_name: aliases::resolve_text(row, &aliases::CUSTOMER_NAME).unwrap_or_default(),
            customer_category: aliases::resolve_text(row, &aliases::CUSTOMER_CATEGORY)
                .unwrap_or_default(),
            start_date: aliases::resolve_date(row, &aliases::START_DATE),
            end_date: aliases::resolve_date(row, &aliases::END_DATE),
            pricing_mode: aliases::resolve_text(row, &canonical("pricing_mode"))
                .and_then(|mode| mode.parse().ok())
                .unwrap_or_default(),
            duration: aliases::resolve_i64(row, &canonical("duration"))
                .and_then(|d| u32::try_from(d).ok())
                .unwrap_or(0),
            currency: aliases::resolve_text(row, &canonical("currency")).unwrap_or_default(),
            exchange_rate: aliases::resolve_decimal(row, &canonical("exchange_rate"))
                .unwrap_or(Decimal::ONE),
            billboard_ids: aliases::resolve_ids(row, &aliases::BILLBOARD_IDS),
            print_cost_enabled: aliases::resolve_bool(row, &canonical("print_cost_enabled"))
                .unwrap_or(false),
            print_price_per_meter: decimal("print_price_per_meter"),
            installation_included: aliases::resolve_bool(row, &canonical("installation_included"))
                .unwrap_or(true),
            base_total: decimal("base_total"),
            discount_amount: aliases::resolve_decimal(row, &aliases::DISCOUNT)
                .unwrap_or(Decimal::ZERO),
            installation_cost: aliases::resolve_decimal(row, &aliases::INSTALLATION_COST)
                .unwrap_or(Decimal::ZERO),
            print_cost_total: decimal("print_cost_total"),
            rental_cost_only: decimal("rental_cost_only"),
            operating_fee_rate: decimal("operating_fee_rate"),
            operating_fee: aliases::resolve_decimal(row, &aliases::OPERATING_FEE)
                .unwrap_or(Decimal::ZERO),
            total_cost: aliases::resolve_decimal(row, &aliases::TOTAL_COST),
            total_paid: aliases::resolve_decimal(row, &aliases::TOTAL_PAID),
        })
    }

    /// Amount still owed, when the total is known.
    pub fn remaining(&self) -> Option<Decimal> {
        crate::pricing::status::remaining_balance(self.total_paid, self.total_cost)
    }
}
