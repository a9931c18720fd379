//! Database models for pricing queries.
//!
//! These models use sqlx's FromRow derive for direct database deserialization.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

/// Row of the sparse price table from `pricing`.
///
/// Unique per (size, billboard_level, customer_category). Each duration
/// column may be empty; an empty `one_day` is derived from `one_month`.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct PricingEntry {
    #[serde(default)]
    pub id: i64,
    pub size: String,
    pub billboard_level: String,
    pub customer_category: String,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub one_day: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub one_month: Option<Decimal>,
    #[sqlx(rename = "2_months")]
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub two_months: Option<Decimal>,
    #[sqlx(rename = "3_months")]
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub three_months: Option<Decimal>,
    #[sqlx(rename = "6_months")]
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub six_months: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub full_year: Option<Decimal>,
}

impl PricingEntry {
    /// Raw value of a duration column.
    pub fn column(&self, column: DurationColumn) -> Option<Decimal> {
        match column {
            DurationColumn::OneDay => self.one_day,
            DurationColumn::OneMonth => self.one_month,
            DurationColumn::TwoMonths => self.two_months,
            DurationColumn::ThreeMonths => self.three_months,
            DurationColumn::SixMonths => self.six_months,
            DurationColumn::FullYear => self.full_year,
        }
    }

    /// True when the entry belongs to the given level and customer category.
    pub fn is_for(&self, level: &str, category: &str) -> bool {
        self.billboard_level.trim() == level.trim()
            && self.customer_category.trim() == category.trim()
    }
}

/// Price columns of a [`PricingEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationColumn {
    OneDay,
    OneMonth,
    TwoMonths,
    ThreeMonths,
    SixMonths,
    FullYear,
}

impl DurationColumn {
    /// Column holding the price for an exact month count.
    pub fn for_months(months: u32) -> Option<Self> {
        match months {
            1 => Some(Self::OneMonth),
            2 => Some(Self::TwoMonths),
            3 => Some(Self::ThreeMonths),
            6 => Some(Self::SixMonths),
            12 => Some(Self::FullYear),
            _ => None,
        }
    }
}

/// Whether a contract duration is counted in months or days.
///
/// Deserialized through [`FromStr`], so forms and stored rows accept the
/// same spellings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum PricingMode {
    #[default]
    Months,
    Days,
}

impl PricingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PricingMode::Months => "months",
            PricingMode::Days => "days",
        }
    }
}

impl fmt::Display for PricingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for PricingMode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for PricingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "months" | "month" | "monthly" => Ok(PricingMode::Months),
            "days" | "day" | "daily" => Ok(PricingMode::Days),
            other => Err(format!("unknown pricing mode '{}'", other)),
        }
    }
}

/// Billboard from `billboards`, reduced to the fields pricing needs.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Billboard {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    pub size: String,
    pub level: String,
    pub faces: i32,
    /// Filled from `installation_pricing` by size, not stored on the billboard.
    #[sqlx(default)]
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub installation_price: Option<Decimal>,
}

/// Installation price per billboard size from `installation_pricing`
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InstallationPrice {
    pub size: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub install_price: Decimal,
}
