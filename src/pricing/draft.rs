//! Contract draft state and its pure update transitions.
//!
//! A draft is what a user builds before a contract is saved. Every update
//! consumes the old state and returns a new one with the value sanitized, so
//! the calculator never sees negative amounts or a non-positive exchange rate.

use rust_decimal::Decimal;
use serde::Serialize;

use super::calculators::non_negative;
use super::models::{Billboard, PricingMode};
use crate::models::ContractRecord;

/// In-memory contract being priced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractDraftState {
    pub billboards: Vec<Billboard>,
    pub pricing_category: String,
    pub pricing_mode: PricingMode,
    pub duration: u32,
    pub currency: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub exchange_rate: Decimal,
    pub print_cost_enabled: bool,
    #[serde(with = "rust_decimal::serde::str")]
    pub print_price_per_meter: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub operating_fee_rate: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub discount_amount: Decimal,
    /// Rental prices already cover installation.
    pub installation_included: bool,
}

/// A single edit to a draft.
#[derive(Debug, Clone)]
pub enum DraftUpdate {
    SetCategory(String),
    SetPricingMode(PricingMode),
    SetDuration(u32),
    SetCurrency(String),
    SetExchangeRate(Decimal),
    SetPrintCostEnabled(bool),
    SetPrintPricePerMeter(Decimal),
    SetOperatingFeeRate(Decimal),
    SetDiscount(Decimal),
    SetInstallationIncluded(bool),
    AddBillboard(Billboard),
    RemoveBillboard(i64),
}

/// Exchange rates that are zero or negative mean "no conversion".
pub fn sanitize_exchange_rate(rate: Decimal) -> Decimal {
    if rate > Decimal::ZERO {
        rate
    } else {
        Decimal::ONE
    }
}

impl ContractDraftState {
    /// Empty one-month draft.
    pub fn new(category: &str, currency: &str, operating_fee_rate: Decimal) -> Self {
        Self {
            billboards: Vec::new(),
            pricing_category: category.trim().to_string(),
            pricing_mode: PricingMode::Months,
            duration: 1,
            currency: currency.trim().to_string(),
            exchange_rate: Decimal::ONE,
            print_cost_enabled: false,
            print_price_per_meter: Decimal::ZERO,
            operating_fee_rate: non_negative(operating_fee_rate),
            discount_amount: Decimal::ZERO,
            installation_included: true,
        }
    }

    /// Return the draft with one update applied.
    pub fn apply(mut self, update: DraftUpdate) -> Self {
        match update {
            DraftUpdate::SetCategory(category) => self.pricing_category = category.trim().to_string(),
            DraftUpdate::SetPricingMode(mode) => self.pricing_mode = mode,
            DraftUpdate::SetDuration(duration) => self.duration = duration,
            DraftUpdate::SetCurrency(currency) => self.currency = currency.trim().to_string(),
            DraftUpdate::SetExchangeRate(rate) => self.exchange_rate = sanitize_exchange_rate(rate),
            DraftUpdate::SetPrintCostEnabled(enabled) => self.print_cost_enabled = enabled,
            DraftUpdate::SetPrintPricePerMeter(price) => {
                self.print_price_per_meter = non_negative(price)
            }
            DraftUpdate::SetOperatingFeeRate(rate) => self.operating_fee_rate = non_negative(rate),
            DraftUpdate::SetDiscount(discount) => self.discount_amount = non_negative(discount),
            DraftUpdate::SetInstallationIncluded(included) => {
                self.installation_included = included
            }
            DraftUpdate::AddBillboard(billboard) => {
                if !self.billboards.iter().any(|b| b.id == billboard.id) {
                    self.billboards.push(billboard);
                }
            }
            DraftUpdate::RemoveBillboard(id) => self.billboards.retain(|b| b.id != id),
        }
        self
    }

    /// Apply a sequence of updates in order.
    pub fn apply_all<I>(self, updates: I) -> Self
    where
        I: IntoIterator<Item = DraftUpdate>,
    {
        updates.into_iter().fold(self, Self::apply)
    }

    pub fn billboard_ids(&self) -> Vec<i64> {
        self.billboards.iter().map(|b| b.id).collect()
    }

    /// Rebuild the draft a stored contract was priced from, for editing.
    ///
    /// Billboards are matched by id; ids the caller could not load are
    /// dropped.
    pub fn from_contract(record: &ContractRecord, billboards: Vec<Billboard>) -> Self {
        let selected = record
            .billboard_ids
            .iter()
            .filter_map(|id| billboards.iter().find(|b| b.id == *id).cloned())
            .map(DraftUpdate::AddBillboard);

        Self::new(
            &record.customer_category,
            &record.currency,
            record.operating_fee_rate,
        )
        .apply_all([
            DraftUpdate::SetPricingMode(record.pricing_mode),
            DraftUpdate::SetDuration(record.duration),
            DraftUpdate::SetExchangeRate(record.exchange_rate),
            DraftUpdate::SetPrintCostEnabled(record.print_cost_enabled),
            DraftUpdate::SetPrintPricePerMeter(record.print_price_per_meter),
            DraftUpdate::SetDiscount(record.discount_amount),
            DraftUpdate::SetInstallationIncluded(record.installation_included),
        ])
        .apply_all(selected)
    }
}
