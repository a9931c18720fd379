//! Contract payment/expiry status, derived from stored fields on every read.

use chrono::{Days, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use super::models::PricingMode;

/// Derived contract status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    Paid,
    Expired,
    PartiallyDue,
    Active,
    Unknown,
}

/// Amount still owed, or `None` when the contract total is unknown.
pub fn remaining_balance(total_paid: Option<Decimal>, total_cost: Option<Decimal>) -> Option<Decimal> {
    total_cost.map(|cost| cost.saturating_sub(total_paid.unwrap_or(Decimal::ZERO)))
}

/// Classify a contract as of `today`.
///
/// A known balance decides first: nothing left means paid regardless of
/// dates. With a balance left the end date splits expired from partially
/// due. With no known total only the end date is used.
pub fn classify_contract(
    end_date: Option<NaiveDate>,
    total_paid: Option<Decimal>,
    total_cost: Option<Decimal>,
    today: NaiveDate,
) -> ContractStatus {
    match (remaining_balance(total_paid, total_cost), end_date) {
        (Some(remaining), _) if remaining <= Decimal::ZERO => ContractStatus::Paid,
        (Some(_), Some(end)) if end < today => ContractStatus::Expired,
        (Some(_), Some(_)) => ContractStatus::PartiallyDue,
        (Some(_), None) => ContractStatus::Active,
        (None, Some(end)) if end < today => ContractStatus::Expired,
        (None, Some(_)) => ContractStatus::Active,
        (None, None) => ContractStatus::Unknown,
    }
}

/// Days from `today` until `end_date`; negative once it has passed.
pub fn days_until_end(end_date: NaiveDate, today: NaiveDate) -> i64 {
    (end_date - today).num_days()
}

/// True when the contract ends within the next `window_days` days, today included.
pub fn is_expiring_within(end_date: NaiveDate, today: NaiveDate, window_days: u32) -> bool {
    let days = days_until_end(end_date, today);
    days >= 0 && days <= i64::from(window_days)
}

/// End date of a contract starting on `start` for the given duration.
///
/// Month durations keep the day of month, clamped to the month's last day.
pub fn contract_end_date(start: NaiveDate, mode: PricingMode, duration: u32) -> Option<NaiveDate> {
    match mode {
        PricingMode::Months => start.checked_add_months(Months::new(duration)),
        PricingMode::Days => start.checked_add_days(Days::new(u64::from(duration))),
    }
}
