//! Core pricing calculation functions.
//!
//! Pure functions for contract pricing math - no database access.
//! Every intermediate amount is rounded to 2 places as it is accumulated so
//! that totals reproduce the ones already stored on historical contracts.

use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::Serialize;
use tracing::warn;

use super::draft::ContractDraftState;
use super::lookup::{resolve_price, PriceSource, PricingTable};
use super::size::area_of;

/// Round to specified decimal places, half away from zero.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use billboard_pricing::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(3));
/// assert_eq!(round_money(dec!(-2.5), 0), dec!(-3));
/// assert_eq!(round_money(dec!(1.005), 2), dec!(1.01));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamp a user-entered amount to be non-negative.
pub fn non_negative(amount: Decimal) -> Decimal {
    amount.max(Decimal::ZERO)
}

/// Product of two amounts, or zero when it does not fit in a `Decimal`.
///
/// Form input is only range-checked for sign, so an absurd rate or price is
/// treated like any other invalid number.
pub fn product_or_zero(a: Decimal, b: Decimal) -> Decimal {
    a.checked_mul(b).unwrap_or_else(|| {
        warn!("Amount overflow multiplying {} by {}, using 0", a, b);
        Decimal::ZERO
    })
}

/// Convert an amount with an exchange rate, rounded to cents.
pub fn convert(amount: Decimal, exchange_rate: Decimal) -> Decimal {
    round_money(product_or_zero(amount, exchange_rate), 2)
}

/// Print cost of one billboard: `area × faces × price per m²`, converted.
///
/// Malformed sizes have zero area and cost nothing to print.
pub fn calculate_print_cost(
    size: &str,
    faces: i32,
    price_per_meter: Decimal,
    exchange_rate: Decimal,
) -> Decimal {
    let faces = Decimal::from(faces.max(0));
    let local = round_money(
        product_or_zero(area_of(size) * faces, non_negative(price_per_meter)),
        2,
    );
    convert(local, exchange_rate)
}

/// Operating fee as a percentage of the net rental cost.
pub fn calculate_operating_fee(rental_cost_only: Decimal, rate_percent: Decimal) -> Decimal {
    round_money(
        product_or_zero(non_negative(rental_cost_only), non_negative(rate_percent))
            / Decimal::ONE_HUNDRED,
        2,
    )
}

/// Priced breakdown of one billboard in a contract.
#[derive(Debug, Clone, Serialize)]
pub struct BillboardQuoteLine {
    pub billboard_id: i64,
    pub size: String,
    pub level: String,
    pub faces: i32,
    /// Unit price in the pricing table's currency.
    #[serde(with = "rust_decimal::serde::str")]
    pub base_price: Decimal,
    pub price_source: PriceSource,
    pub daily_derived: bool,
    /// Unit price converted with the draft's exchange rate.
    #[serde(with = "rust_decimal::serde::str")]
    pub rent: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub print_cost: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub installation_cost: Decimal,
}

/// Totals of a contract draft.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContractSummary {
    #[serde(with = "rust_decimal::serde::str")]
    pub base_total: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub discount_amount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_after_discount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub installation_cost: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub print_cost_total: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub rental_cost_only: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub operating_fee: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub final_total: Decimal,
}

/// Result of pricing a whole draft
#[derive(Debug, Clone, Serialize)]
pub struct ContractQuote {
    pub summary: ContractSummary,
    pub lines: Vec<BillboardQuoteLine>,
    pub currency: String,
}

/// Price every billboard of a draft and derive the contract totals.
///
/// Installation is normally part of the rental price and is only split out
/// to compute the net rental cost. When the draft says installation is not
/// included, it is added to the base total instead.
pub fn calculate_contract_totals(draft: &ContractDraftState, table: &PricingTable) -> ContractQuote {
    let mut rent_total = Decimal::ZERO;
    let mut print_cost_total = Decimal::ZERO;
    let mut installation_cost = Decimal::ZERO;
    let mut lines = Vec::with_capacity(draft.billboards.len());

    for billboard in &draft.billboards {
        let resolved = resolve_price(
            table,
            &billboard.size,
            &billboard.level,
            &draft.pricing_category,
            draft.pricing_mode,
            draft.duration,
        );

        let rent = convert(resolved.amount, draft.exchange_rate);

        let print_cost = if draft.print_cost_enabled {
            calculate_print_cost(
                &billboard.size,
                billboard.faces,
                draft.print_price_per_meter,
                draft.exchange_rate,
            )
        } else {
            Decimal::ZERO
        };

        let installation = billboard
            .installation_price
            .map(|price| convert(non_negative(price), draft.exchange_rate))
            .unwrap_or(Decimal::ZERO);

        rent_total = round_money(rent_total.saturating_add(rent), 2);
        print_cost_total = round_money(print_cost_total.saturating_add(print_cost), 2);
        installation_cost = round_money(installation_cost.saturating_add(installation), 2);

        lines.push(BillboardQuoteLine {
            billboard_id: billboard.id,
            size: billboard.size.clone(),
            level: billboard.level.clone(),
            faces: billboard.faces,
            base_price: resolved.amount,
            price_source: resolved.source,
            daily_derived: resolved.daily_derived,
            rent,
            print_cost,
            installation_cost: installation,
        });
    }

    let mut base_total = round_money(rent_total.saturating_add(print_cost_total), 2);
    if !draft.installation_included {
        base_total = round_money(base_total.saturating_add(installation_cost), 2);
    }

    let summary = summarize(
        base_total,
        draft.discount_amount,
        installation_cost,
        print_cost_total,
        draft.operating_fee_rate,
    );

    ContractQuote {
        summary,
        lines,
        currency: draft.currency.clone(),
    }
}

/// Apply discount and operating fee to already-accumulated totals.
///
/// The discount is clamped to the base total, so the final total never goes
/// below zero.
pub fn summarize(
    base_total: Decimal,
    discount: Decimal,
    installation_cost: Decimal,
    print_cost_total: Decimal,
    operating_fee_rate: Decimal,
) -> ContractSummary {
    let base_total = non_negative(base_total);
    let discount_amount = round_money(non_negative(discount).min(base_total), 2);
    let final_total = round_money(base_total - discount_amount, 2);
    let rental_cost_only = non_negative(round_money(
        final_total
            .saturating_sub(installation_cost)
            .saturating_sub(print_cost_total),
        2,
    ));
    let operating_fee = calculate_operating_fee(rental_cost_only, operating_fee_rate);

    ContractSummary {
        base_total,
        discount_amount,
        total_after_discount: final_total,
        installation_cost,
        print_cost_total,
        rental_cost_only,
        operating_fee,
        final_total,
    }
}
