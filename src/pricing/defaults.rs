//! Built-in price list used when the pricing table has no row for a size.
//!
//! Prices are monthly-based list prices per size and level; customer category
//! does not apply. Daily prices are always derived from `one_month`.

use once_cell::sync::Lazy;
use rust_decimal::Decimal;

use super::models::PricingEntry;
use super::size::{compare_sizes, SizeMatch};

/// (size, level, 1 month, 2 months, 3 months, 6 months, 12 months)
const DEFAULT_PRICE_LIST: &[(&str, &str, i64, i64, i64, i64, i64)] = &[
    ("13x5", "A", 3500, 6500, 9500, 18000, 34000),
    ("13x5", "B", 3000, 5600, 8200, 15500, 29000),
    ("12x4", "A", 2800, 5200, 7600, 14500, 27000),
    ("12x4", "B", 2400, 4500, 6500, 12500, 23500),
    ("10x4", "A", 2200, 4100, 6000, 11500, 21500),
    ("10x4", "B", 1900, 3500, 5100, 9800, 18500),
    ("8x3", "A", 1500, 2800, 4100, 7800, 14500),
    ("8x3", "B", 1300, 2400, 3500, 6700, 12500),
    ("6x3", "A", 1100, 2000, 2950, 5600, 10500),
    ("6x3", "B", 950, 1750, 2550, 4850, 9000),
    ("4x3", "A", 800, 1500, 2150, 4100, 7700),
    ("4x3", "B", 700, 1300, 1900, 3600, 6700),
    ("3x2", "A", 500, 950, 1350, 2600, 4900),
    ("3x2", "B", 420, 800, 1150, 2200, 4100),
];

static DEFAULT_ENTRIES: Lazy<Vec<PricingEntry>> = Lazy::new(|| {
    DEFAULT_PRICE_LIST
        .iter()
        .map(|&(size, level, m1, m2, m3, m6, m12)| PricingEntry {
            id: 0,
            size: size.to_string(),
            billboard_level: level.to_string(),
            customer_category: String::new(),
            one_day: None,
            one_month: Some(Decimal::from(m1)),
            two_months: Some(Decimal::from(m2)),
            three_months: Some(Decimal::from(m3)),
            six_months: Some(Decimal::from(m6)),
            full_year: Some(Decimal::from(m12)),
        })
        .collect()
});

/// Find the built-in entry for a size and level, in either orientation.
pub fn default_entry(size: &str, level: &str) -> Option<&'static PricingEntry> {
    let mut flipped = None;

    for entry in DEFAULT_ENTRIES.iter().filter(|e| e.billboard_level == level.trim()) {
        match compare_sizes(&entry.size, size) {
            Some(SizeMatch::Exact) => return Some(entry),
            Some(SizeMatch::Flipped) if flipped.is_none() => flipped = Some(entry),
            _ => {}
        }
    }

    flipped
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_entry_exact_and_flipped() {
        let entry = default_entry("6x3", "A").unwrap();
        assert_eq!(entry.one_month, Some(dec!(1100)));

        let flipped = default_entry("3x6", "A").unwrap();
        assert_eq!(flipped.size, "6x3");
    }

    #[test]
    fn test_default_entry_unknown_size_or_level() {
        assert!(default_entry("7x7", "A").is_none());
        assert!(default_entry("6x3", "Z").is_none());
        assert!(default_entry("oops", "A").is_none());
    }
}
