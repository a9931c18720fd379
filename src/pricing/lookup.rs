//! Unit price resolution against the sparse pricing table.
//!
//! Resolution order for a billboard is: table row with the exact size,
//! table row with the flipped size, built-in default list, zero.
//! A row only counts when it has a usable value for the requested duration.

use rust_decimal::Decimal;
use serde::Serialize;

use super::calculators::{product_or_zero, round_money};
use super::defaults::default_entry;
use super::models::{DurationColumn, PricingEntry, PricingMode};
use super::size::{compare_sizes, SizeMatch};

const DAYS_PER_MONTH: u32 = 30;

/// In-memory pricing table for one or more (level, category) pairs.
#[derive(Debug, Clone, Default)]
pub struct PricingTable {
    entries: Vec<PricingEntry>,
}

impl PricingTable {
    pub fn new(entries: Vec<PricingEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[PricingEntry] {
        &self.entries
    }

    /// Find the row for a size, level and customer category.
    ///
    /// An exact size match anywhere in the table beats a flipped one; among
    /// rows of the same kind the first in table order wins.
    pub fn lookup(
        &self,
        size: &str,
        level: &str,
        category: &str,
    ) -> Option<(&PricingEntry, SizeMatch)> {
        let mut flipped = None;

        for entry in self.entries.iter().filter(|e| e.is_for(level, category)) {
            match compare_sizes(&entry.size, size) {
                Some(SizeMatch::Exact) => return Some((entry, SizeMatch::Exact)),
                Some(SizeMatch::Flipped) if flipped.is_none() => flipped = Some(entry),
                _ => {}
            }
        }

        flipped.map(|entry| (entry, SizeMatch::Flipped))
    }
}

/// Where a resolved unit price came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    Table,
    TableFlipped,
    DefaultList,
    NotFound,
}

/// Unit price for one billboard over the whole requested duration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedPrice {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub source: PriceSource,
    pub entry_id: Option<i64>,
    /// Daily rate was computed from the monthly price.
    pub daily_derived: bool,
}

impl ResolvedPrice {
    fn not_found() -> Self {
        Self {
            amount: Decimal::ZERO,
            source: PriceSource::NotFound,
            entry_id: None,
            daily_derived: false,
        }
    }
}

/// A column value, with empty and zero both meaning "not priced".
fn priced(value: Option<Decimal>) -> Option<Decimal> {
    value.filter(|v| *v > Decimal::ZERO)
}

/// Daily rate of an entry, and whether it was derived from the monthly price.
pub fn daily_rate(entry: &PricingEntry) -> Option<(Decimal, bool)> {
    if let Some(day) = priced(entry.one_day) {
        return Some((day, false));
    }

    priced(entry.one_month)
        .map(|month| (round_money(month / Decimal::from(DAYS_PER_MONTH), 2), true))
}

/// Price of an entry for a duration.
///
/// Returns `None` when the entry has no usable value for the duration, so the
/// caller can fall back. A zero duration is always priced at zero.
pub fn price_for_duration(
    entry: &PricingEntry,
    mode: PricingMode,
    duration: u32,
) -> Option<(Decimal, bool)> {
    if duration == 0 {
        return Some((Decimal::ZERO, false));
    }

    match mode {
        PricingMode::Months => {
            let column = DurationColumn::for_months(duration)?;
            priced(entry.column(column)).map(|price| (price, false))
        }
        PricingMode::Days => {
            let (daily, derived) = daily_rate(entry)?;
            Some((round_money(product_or_zero(daily, Decimal::from(duration)), 2), derived))
        }
    }
}

/// Resolve the unit price of a billboard through the full fallback chain.
pub fn resolve_price(
    table: &PricingTable,
    size: &str,
    level: &str,
    category: &str,
    mode: PricingMode,
    duration: u32,
) -> ResolvedPrice {
    if let Some((entry, kind)) = table.lookup(size, level, category) {
        if let Some((amount, daily_derived)) = price_for_duration(entry, mode, duration) {
            return ResolvedPrice {
                amount,
                source: match kind {
                    SizeMatch::Exact => PriceSource::Table,
                    SizeMatch::Flipped => PriceSource::TableFlipped,
                },
                entry_id: Some(entry.id),
                daily_derived,
            };
        }
    }

    if let Some(entry) = default_entry(size, level) {
        if let Some((amount, daily_derived)) = price_for_duration(entry, mode, duration) {
            return ResolvedPrice {
                amount,
                source: PriceSource::DefaultList,
                entry_id: None,
                daily_derived,
            };
        }
    }

    ResolvedPrice::not_found()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entry(id: i64, size: &str, level: &str, category: &str) -> PricingEntry {
        PricingEntry {
            id,
            size: size.to_string(),
            billboard_level: level.to_string(),
            customer_category: category.to_string(),
            one_day: None,
            one_month: None,
            two_months: None,
            three_months: None,
            six_months: None,
            full_year: None,
        }
    }

    #[test]
    fn test_flipped_size_resolves_table_row() {
        let mut row = entry(7, "3x4", "A", "عادي");
        row.one_month = Some(dec!(250));
        let table = PricingTable::new(vec![row]);

        let price = resolve_price(&table, "4x3", "A", "عادي", PricingMode::Months, 1);
        assert_eq!(price.amount, dec!(250));
        assert_eq!(price.source, PriceSource::TableFlipped);
        assert_eq!(price.entry_id, Some(7));
    }

    #[test]
    fn test_lookup_is_orientation_symmetric() {
        let mut row = entry(1, "13x5", "B", "شركات");
        row.three_months = Some(dec!(9000));
        let table = PricingTable::new(vec![row]);

        let a = resolve_price(&table, "13x5", "B", "شركات", PricingMode::Months, 3);
        let b = resolve_price(&table, "5x13", "B", "شركات", PricingMode::Months, 3);
        assert_eq!(a.amount, b.amount);
        assert_eq!(a.entry_id, b.entry_id);
    }

    #[test]
    fn test_exact_match_preferred_over_earlier_flipped_row() {
        let mut flipped = entry(1, "3x4", "A", "عادي");
        flipped.one_month = Some(dec!(100));
        let mut exact = entry(2, "4x3", "A", "عادي");
        exact.one_month = Some(dec!(200));
        let table = PricingTable::new(vec![flipped, exact]);

        let (found, kind) = table.lookup("4x3", "A", "عادي").unwrap();
        assert_eq!(found.id, 2);
        assert_eq!(kind, SizeMatch::Exact);
    }

    #[test]
    fn test_lookup_respects_level_and_category() {
        let mut row = entry(1, "4x3", "A", "شركات");
        row.one_month = Some(dec!(999));
        let table = PricingTable::new(vec![row]);

        assert!(table.lookup("4x3", "A", "عادي").is_none());
        assert!(table.lookup("4x3", "B", "شركات").is_none());
    }

    #[test]
    fn test_daily_rate_derived_from_month() {
        let mut row = entry(1, "4x3", "A", "عادي");
        row.one_month = Some(dec!(300));
        assert_eq!(daily_rate(&row), Some((dec!(10.00), true)));

        row.one_month = Some(dec!(1000));
        assert_eq!(daily_rate(&row), Some((dec!(33.33), true)));

        row.one_day = Some(dec!(12.5));
        assert_eq!(daily_rate(&row), Some((dec!(12.5), false)));
    }

    #[test]
    fn test_days_mode_multiplies_daily_rate() {
        let mut row = entry(1, "4x3", "A", "عادي");
        row.one_month = Some(dec!(1000));
        let table = PricingTable::new(vec![row]);

        let price = resolve_price(&table, "4x3", "A", "عادي", PricingMode::Days, 10);
        assert_eq!(price.amount, dec!(333.30));
        assert!(price.daily_derived);
    }

    #[test]
    fn test_days_mode_overflow_prices_at_zero() {
        let mut row = entry(1, "4x3", "A", "عادي");
        row.one_day = Some(Decimal::MAX);
        let table = PricingTable::new(vec![row]);

        let price = resolve_price(&table, "4x3", "A", "عادي", PricingMode::Days, 30);
        assert_eq!(price.amount, dec!(0));
        assert_eq!(price.source, PriceSource::Table);
    }

    #[test]
    fn test_zero_duration_is_zero_price() {
        let mut row = entry(1, "4x3", "A", "عادي");
        row.one_month = Some(dec!(300));
        let table = PricingTable::new(vec![row]);

        let price = resolve_price(&table, "4x3", "A", "عادي", PricingMode::Months, 0);
        assert_eq!(price.amount, dec!(0));
        assert_eq!(price.source, PriceSource::Table);
    }

    #[test]
    fn test_missing_column_falls_back_to_default_list() {
        let mut row = entry(1, "6x3", "A", "عادي");
        row.one_month = Some(dec!(900));
        let table = PricingTable::new(vec![row]);

        let price = resolve_price(&table, "6x3", "A", "عادي", PricingMode::Months, 6);
        assert_eq!(price.source, PriceSource::DefaultList);
        assert_eq!(price.amount, dec!(5600));
    }

    #[test]
    fn test_unlisted_month_count_not_found() {
        let table = PricingTable::default();
        let price = resolve_price(&table, "6x3", "A", "عادي", PricingMode::Months, 4);
        assert_eq!(price.source, PriceSource::NotFound);
        assert_eq!(price.amount, dec!(0));
    }

    #[test]
    fn test_malformed_size_not_found() {
        let table = PricingTable::default();
        let price = resolve_price(&table, "huge", "A", "عادي", PricingMode::Months, 1);
        assert_eq!(price, ResolvedPrice::not_found());
    }
}
