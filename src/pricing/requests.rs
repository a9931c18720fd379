//! Request DTOs for pricing API endpoints.
//!
//! Numeric form fields arrive as numbers, numeric strings, empty strings or
//! garbage. They are read leniently: anything that is not a non-negative
//! number becomes zero instead of failing the request.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

use super::draft::{ContractDraftState, DraftUpdate};
use super::models::{PricingEntry, PricingMode};

fn lenient_value_to_decimal(value: &Value) -> Decimal {
    let parsed = match value {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .ok(),
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    };

    parsed
        .filter(|d| *d >= Decimal::ZERO)
        .unwrap_or(Decimal::ZERO)
}

/// Deserialize a user-entered amount, coercing invalid or negative input to zero.
pub fn lenient_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(lenient_value_to_decimal(&value))
}

/// Like [`lenient_decimal`], but keeps "not provided" distinct.
pub fn lenient_decimal_option<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => None,
        Value::String(ref s) if s.trim().is_empty() => None,
        other => Some(lenient_value_to_decimal(&other)),
    })
}

/// Deserialize a whole-number count leniently (durations, days).
pub fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(lenient_value_to_decimal(&value).trunc().to_u32().unwrap_or(0))
}

/// Like [`lenient_count`], but a missing or blank value stays `None`.
pub fn lenient_count_option<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => None,
        Value::String(ref s) if s.trim().is_empty() => None,
        other => Some(lenient_value_to_decimal(&other).trunc().to_u32().unwrap_or(0)),
    })
}

fn default_duration() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

/// Contract draft fields as sent by the contract form
#[derive(Debug, Clone, Deserialize)]
pub struct DraftRequest {
    pub billboard_ids: Vec<i64>,
    pub pricing_category: String,
    #[serde(default)]
    pub pricing_mode: PricingMode,
    #[serde(default = "default_duration", deserialize_with = "lenient_count")]
    pub duration: u32,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal_option")]
    pub exchange_rate: Option<Decimal>,
    #[serde(default)]
    pub print_cost_enabled: bool,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub print_price_per_meter: Decimal,
    #[serde(default, deserialize_with = "lenient_decimal_option")]
    pub operating_fee_rate: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub discount_amount: Decimal,
    #[serde(default = "default_true")]
    pub installation_included: bool,
}

impl DraftRequest {
    /// Build the draft, without billboards, using service defaults for
    /// fields the form left out.
    pub fn to_draft(&self, default_currency: &str, default_fee_rate: Decimal) -> ContractDraftState {
        let currency = self
            .currency
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(default_currency);

        ContractDraftState::new(
            &self.pricing_category,
            currency,
            self.operating_fee_rate.unwrap_or(default_fee_rate),
        )
        .apply_all([
            DraftUpdate::SetPricingMode(self.pricing_mode),
            DraftUpdate::SetDuration(self.duration),
            DraftUpdate::SetExchangeRate(self.exchange_rate.unwrap_or(Decimal::ONE)),
            DraftUpdate::SetPrintCostEnabled(self.print_cost_enabled),
            DraftUpdate::SetPrintPricePerMeter(self.print_price_per_meter),
            DraftUpdate::SetDiscount(self.discount_amount),
            DraftUpdate::SetInstallationIncluded(self.installation_included),
        ])
    }
}

/// Request to create or update a contract
#[derive(Debug, Clone, Deserialize)]
pub struct SaveContractRequest {
    pub customer_name: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub draft: DraftRequest,
}

/// Query for a single price lookup
#[derive(Debug, Clone, Deserialize)]
pub struct PriceLookupQuery {
    pub size: String,
    pub level: String,
    pub category: String,
    #[serde(default)]
    pub mode: PricingMode,
    #[serde(default = "default_duration", deserialize_with = "lenient_count")]
    pub duration: u32,
}

/// Filter for listing pricing rows
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PricingEntriesQuery {
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Pricing row as edited on the admin screen
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertPricingEntryRequest {
    pub size: String,
    pub billboard_level: String,
    pub customer_category: String,
    #[serde(default, deserialize_with = "lenient_decimal_option")]
    pub one_day: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal_option")]
    pub one_month: Option<Decimal>,
    #[serde(default, alias = "2_months", deserialize_with = "lenient_decimal_option")]
    pub two_months: Option<Decimal>,
    #[serde(default, alias = "3_months", deserialize_with = "lenient_decimal_option")]
    pub three_months: Option<Decimal>,
    #[serde(default, alias = "6_months", deserialize_with = "lenient_decimal_option")]
    pub six_months: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal_option")]
    pub full_year: Option<Decimal>,
}

impl UpsertPricingEntryRequest {
    pub fn into_entry(self) -> PricingEntry {
        PricingEntry {
            id: 0,
            size: self.size.trim().to_string(),
            billboard_level: self.billboard_level.trim().to_string(),
            customer_category: self.customer_category.trim().to_string(),
            one_day: self.one_day,
            one_month: self.one_month,
            two_months: self.two_months,
            three_months: self.three_months,
            six_months: self.six_months,
            full_year: self.full_year,
        }
    }
}

/// Query for the expiring-contracts listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpiringQuery {
    #[serde(default, deserialize_with = "lenient_count_option")]
    pub days: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_draft_request_coerces_bad_numbers() {
        let request: DraftRequest = serde_json::from_value(json!({
            "billboard_ids": [1, 2],
            "pricing_category": "عادي",
            "duration": "3",
            "print_price_per_meter": "abc",
            "discount_amount": -20,
            "exchange_rate": "",
            "operating_fee_rate": "2.5"
        }))
        .unwrap();

        assert_eq!(request.duration, 3);
        assert_eq!(request.print_price_per_meter, dec!(0));
        assert_eq!(request.discount_amount, dec!(0));
        assert_eq!(request.exchange_rate, None);
        assert_eq!(request.operating_fee_rate, Some(dec!(2.5)));
        assert!(request.installation_included);
    }

    #[test]
    fn test_lenient_count_truncates_fractions() {
        let request: DraftRequest = serde_json::from_value(json!({
            "billboard_ids": [],
            "pricing_category": "عادي",
            "pricing_mode": "days",
            "duration": 10.9
        }))
        .unwrap();
        assert_eq!(request.pricing_mode, PricingMode::Days);
        assert_eq!(request.duration, 10);
    }

    #[test]
    fn test_to_draft_uses_defaults() {
        let request: DraftRequest = serde_json::from_value(json!({
            "billboard_ids": [1],
            "pricing_category": "شركات",
            "exchange_rate": "-4"
        }))
        .unwrap();

        let draft = request.to_draft("LYD", dec!(3));
        assert_eq!(draft.currency, "LYD");
        assert_eq!(draft.operating_fee_rate, dec!(3));
        assert_eq!(draft.duration, 1);
        // -4 coerces to 0, which means no conversion
        assert_eq!(draft.exchange_rate, dec!(1));
        assert!(draft.billboards.is_empty());
    }

    #[test]
    fn test_query_counts_are_lenient() {
        let lookup: PriceLookupQuery = serde_json::from_value(json!({
            "size": "4x3",
            "level": "A",
            "category": "عادي",
            "duration": "-1"
        }))
        .unwrap();
        assert_eq!(lookup.duration, 0);

        let expiring: ExpiringQuery = serde_json::from_value(json!({ "days": "abc" })).unwrap();
        assert_eq!(expiring.days, Some(0));

        let expiring: ExpiringQuery = serde_json::from_value(json!({ "days": "" })).unwrap();
        assert_eq!(expiring.days, None);
    }

    #[test]
    fn test_pricing_mode_accepts_form_spellings() {
        for (raw, mode) in [
            ("Months", PricingMode::Months),
            ("monthly", PricingMode::Months),
            ("DAYS", PricingMode::Days),
            (" daily ", PricingMode::Days),
        ] {
            let request: DraftRequest = serde_json::from_value(json!({
                "billboard_ids": [],
                "pricing_category": "عادي",
                "pricing_mode": raw
            }))
            .unwrap();
            assert_eq!(request.pricing_mode, mode);
        }

        let bad = serde_json::from_value::<DraftRequest>(json!({
            "billboard_ids": [],
            "pricing_category": "عادي",
            "pricing_mode": "weekly"
        }));
        assert!(bad.is_err());
    }

    #[test]
    fn test_upsert_request_accepts_column_names() {
        let request: UpsertPricingEntryRequest = serde_json::from_value(json!({
            "size": " 4x3 ",
            "billboard_level": "A",
            "customer_category": "عادي",
            "one_month": "250",
            "2_months": 480,
            "full_year": null
        }))
        .unwrap();

        let entry = request.into_entry();
        assert_eq!(entry.size, "4x3");
        assert_eq!(entry.one_month, Some(dec!(250)));
        assert_eq!(entry.two_months, Some(dec!(480)));
        assert_eq!(entry.full_year, None);
    }
}
