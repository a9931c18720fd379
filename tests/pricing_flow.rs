use billboard_pricing::pricing::responses::QuoteResponse;
use billboard_pricing::pricing::{
    calculate_contract_totals, classify_contract, Billboard, ContractDraftState, ContractStatus,
    DraftUpdate, PriceSource, PricingEntry, PricingMode, PricingTable,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn billboard(id: i64, size: &str, level: &str, installation: Option<Decimal>) -> Billboard {
    Billboard {
        id,
        name: format!("Billboard {}", id),
        size: size.to_string(),
        level: level.to_string(),
        faces: 1,
        installation_price: installation,
    }
}

fn table() -> PricingTable {
    PricingTable::new(vec![PricingEntry {
        id: 7,
        size: "3x4".to_string(),
        billboard_level: "A".to_string(),
        customer_category: "عادي".to_string(),
        one_day: None,
        one_month: Some(dec!(300)),
        two_months: None,
        three_months: None,
        six_months: None,
        full_year: None,
    }])
}

#[test]
fn test_monthly_contract_with_fallbacks() {
    let draft = ContractDraftState::new("عادي", "LYD", dec!(3)).apply_all([
        DraftUpdate::AddBillboard(billboard(1, "4x3", "A", Some(dec!(40)))),
        DraftUpdate::AddBillboard(billboard(2, "6x3", "B", None)),
        DraftUpdate::SetDiscount(dec!(250)),
    ]);

    let quote = calculate_contract_totals(&draft, &table());

    assert_eq!(quote.lines[0].price_source, PriceSource::TableFlipped);
    assert_eq!(quote.lines[0].rent, dec!(300));
    assert_eq!(quote.lines[1].price_source, PriceSource::DefaultList);
    assert_eq!(quote.lines[1].rent, dec!(950));

    let summary = &quote.summary;
    assert_eq!(summary.base_total, dec!(1250));
    assert_eq!(summary.final_total, dec!(1000));
    assert_eq!(summary.installation_cost, dec!(40));
    assert_eq!(summary.rental_cost_only, dec!(960));
    assert_eq!(summary.operating_fee, dec!(28.80));
}

#[test]
fn test_daily_contract_in_other_currency() {
    let draft = ContractDraftState::new("عادي", "USD", dec!(0)).apply_all([
        DraftUpdate::SetPricingMode(PricingMode::Days),
        DraftUpdate::SetDuration(10),
        DraftUpdate::SetExchangeRate(dec!(0.5)),
        DraftUpdate::SetInstallationIncluded(false),
        DraftUpdate::AddBillboard(billboard(1, "4x3", "A", Some(dec!(40)))),
        DraftUpdate::AddBillboard(billboard(2, "7x7", "A", None)),
    ]);

    let quote = calculate_contract_totals(&draft, &table());

    // 300 / 30 = 10.00 a day, ten days, halved by the rate
    assert!(quote.lines[0].daily_derived);
    assert_eq!(quote.lines[0].rent, dec!(50));
    assert_eq!(quote.summary.installation_cost, dec!(20));
    assert_eq!(quote.summary.base_total, dec!(70));
    assert_eq!(quote.summary.rental_cost_only, dec!(50));

    let response = QuoteResponse::from(quote);
    assert_eq!(response.currency, "USD");
    assert_eq!(response.billboard_count, 2);
    assert_eq!(response.unpriced_billboard_ids, vec![2]);
}

#[test]
fn test_removing_billboards_reprices() {
    let draft = ContractDraftState::new("عادي", "LYD", dec!(0)).apply_all([
        DraftUpdate::AddBillboard(billboard(1, "4x3", "A", None)),
        DraftUpdate::AddBillboard(billboard(1, "4x3", "A", None)),
        DraftUpdate::AddBillboard(billboard(2, "6x3", "B", None)),
    ]);
    assert_eq!(draft.billboard_ids(), vec![1, 2]);

    let draft = draft.apply(DraftUpdate::RemoveBillboard(2));
    let quote = calculate_contract_totals(&draft, &table());
    assert_eq!(quote.summary.final_total, dec!(300));

    let empty = draft.apply(DraftUpdate::RemoveBillboard(1));
    let quote = calculate_contract_totals(&empty, &table());
    assert_eq!(quote.summary.final_total, dec!(0));
    assert!(quote.lines.is_empty());
}

#[test]
fn test_saved_contract_status() {
    let today = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 6, 1);

    assert_eq!(
        classify_contract(end, Some(dec!(200)), Some(dec!(1000)), today),
        ContractStatus::PartiallyDue
    );
    assert_eq!(
        classify_contract(end, Some(dec!(1000)), Some(dec!(1000)), today),
        ContractStatus::Paid
    );
}
