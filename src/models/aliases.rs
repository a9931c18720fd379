//! Ordered field-alias resolution for stored contract rows.
//!
//! Contract rows written before the canonical schema still carry the old
//! column names. Each field is read by its canonical name first and then by
//! its legacy aliases in order. Every legacy hit is logged so the remaining
//! rows can be migrated; the aliases are migration debt and new code writes
//! canonical names only.

use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// Canonical column name plus the legacy names it replaces.
#[derive(Debug, Clone, Copy)]
pub struct FieldAliases {
    pub canonical: &'static str,
    pub legacy: &'static [&'static str],
}

pub const CONTRACT_ID: FieldAliases = FieldAliases {
    canonical: "id",
    legacy: &["Contract_Number", "contract_number", "ID"],
};

pub const CUSTOMER_NAME: FieldAliases = FieldAliases {
    canonical: "customer_name",
    legacy: &["Customer Name", "customer"],
};

pub const CUSTOMER_CATEGORY: FieldAliases = FieldAliases {
    canonical: "customer_category",
    legacy: &["Customer Category", "customer_type"],
};

pub const START_DATE: FieldAliases = FieldAliases {
    canonical: "start_date",
    legacy: &["Contract Date", "Start Date"],
};

pub const END_DATE: FieldAliases = FieldAliases {
    canonical: "end_date",
    legacy: &["End Date", "Contract End Date"],
};

pub const TOTAL_COST: FieldAliases = FieldAliases {
    canonical: "total_cost",
    legacy: &["Total", "Total Rent", "total_rent"],
};

pub const TOTAL_PAID: FieldAliases = FieldAliases {
    canonical: "total_paid",
    legacy: &["Total Paid", "paid_amount"],
};

pub const DISCOUNT: FieldAliases = FieldAliases {
    canonical: "discount_amount",
    legacy: &["Discount", "discount"],
};

pub const INSTALLATION_COST: FieldAliases = FieldAliases {
    canonical: "installation_cost",
    legacy: &["Installation Cost"],
};

pub const OPERATING_FEE: FieldAliases = FieldAliases {
    canonical: "operating_fee",
    legacy: &["fee", "Fee"],
};

pub const BILLBOARD_IDS: FieldAliases = FieldAliases {
    canonical: "billboard_ids",
    legacy: &["billboard_id", "Billboard IDs"],
};

/// Aliases that carry no legacy names.
pub const fn canonical(name: &'static str) -> FieldAliases {
    FieldAliases {
        canonical: name,
        legacy: &[],
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// First non-blank value among the field's names.
pub fn resolve<'a>(row: &'a Value, field: &FieldAliases) -> Option<&'a Value> {
    if let Some(value) = row.get(field.canonical).filter(|v| !is_blank(v)) {
        return Some(value);
    }

    field.legacy.iter().find_map(|alias| {
        let value = row.get(*alias).filter(|v| !is_blank(v))?;
        tracing::debug!(
            "Legacy contract field '{}' used for '{}'",
            alias,
            field.canonical
        );
        Some(value)
    })
}

fn decimal_from_str(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()
}

/// Numbers and numeric strings (thousands separators allowed).
pub fn resolve_decimal(row: &Value, field: &FieldAliases) -> Option<Decimal> {
    match resolve(row, field)? {
        Value::Number(n) => decimal_from_str(&n.to_string()),
        Value::String(s) => decimal_from_str(s),
        _ => None,
    }
}

pub fn resolve_i64(row: &Value, field: &FieldAliases) -> Option<i64> {
    match resolve(row, field)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn resolve_text(row: &Value, field: &FieldAliases) -> Option<String> {
    match resolve(row, field)? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn resolve_bool(row: &Value, field: &FieldAliases) -> Option<bool> {
    match resolve(row, field)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        Value::Number(n) => n.as_i64().map(|v| v != 0),
        _ => None,
    }
}

/// Dates stored as `YYYY-MM-DD` or as a full RFC 3339 timestamp.
pub fn resolve_date(row: &Value, field: &FieldAliases) -> Option<NaiveDate> {
    let raw = match resolve(row, field)? {
        Value::String(s) => s.trim(),
        _ => return None,
    };

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| raw.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()))
}

/// Billboard ids stored as an array, a single id or a comma-separated string.
pub fn resolve_ids(row: &Value, field: &FieldAliases) -> Vec<i64> {
    match resolve(row, field) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::Number(n) => n.as_i64(),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            })
            .collect(),
        Some(Value::Number(n)) => n.as_i64().into_iter().collect(),
        Some(Value::String(s)) => s
            .split(',')
            .filter_map(|part| part.trim().parse().ok())
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_canonical_name_wins() {
        let row = json!({ "total_cost": "1200.50", "Total": 900 });
        assert_eq!(resolve_decimal(&row, &TOTAL_COST), Some(dec!(1200.50)));
    }

    #[test]
    fn test_legacy_aliases_in_order() {
        let row = json!({ "Total Rent": 800, "Total": "1,250.75" });
        assert_eq!(resolve_decimal(&row, &TOTAL_COST), Some(dec!(1250.75)));

        let row = json!({ "total_cost": null, "Total Rent": 800 });
        assert_eq!(resolve_decimal(&row, &TOTAL_COST), Some(dec!(800)));
    }

    #[test]
    fn test_blank_values_are_skipped() {
        let row = json!({ "end_date": "  ", "End Date": "2024-06-30" });
        assert_eq!(
            resolve_date(&row, &END_DATE),
            NaiveDate::from_ymd_opt(2024, 6, 30)
        );
    }

    #[test]
    fn test_dates_accept_timestamps() {
        let row = json!({ "start_date": "2024-01-02T10:00:00+02:00" });
        assert_eq!(
            resolve_date(&row, &START_DATE),
            NaiveDate::from_ymd_opt(2024, 1, 2)
        );
        let row = json!({ "start_date": "2024-01-02 10:00:00" });
        assert_eq!(
            resolve_date(&row, &START_DATE),
            NaiveDate::from_ymd_opt(2024, 1, 2)
        );
    }

    #[test]
    fn test_ids_in_several_shapes() {
        assert_eq!(resolve_ids(&json!({ "billboard_ids": [1, "2", null] }), &BILLBOARD_IDS), vec![1, 2]);
        assert_eq!(resolve_ids(&json!({ "billboard_id": 7 }), &BILLBOARD_IDS), vec![7]);
        assert_eq!(resolve_ids(&json!({ "Billboard IDs": "3, 4,x" }), &BILLBOARD_IDS), vec![3, 4]);
        assert!(resolve_ids(&json!({}), &BILLBOARD_IDS).is_empty());
    }

    #[test]
    fn test_missing_everywhere_is_none() {
        let row = json!({ "unrelated": 1 });
        assert_eq!(resolve_decimal(&row, &TOTAL_PAID), None);
        assert_eq!(resolve_text(&row, &CUSTOMER_NAME), None);
        assert_eq!(resolve_bool(&row, &canonical("print_cost_enabled")), None);
    }
}
