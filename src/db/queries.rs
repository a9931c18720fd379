//! Database queries for billboards and contracts

use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::PgPool;

use crate::error::Result;
use crate::models::ContractRecord;
use crate::pricing::models::Billboard;

/// Get billboards by id, in id order
pub async fn get_billboards_by_ids(pool: &PgPool, ids: &[i64]) -> Result<Vec<Billboard>> {
    let billboards = sqlx::query_as::<_, Billboard>(
        r#"
        SELECT id, COALESCE(name, '') AS name, size, level, COALESCE(faces, 1) AS faces
        FROM billboards
        WHERE id = ANY($1)
        ORDER BY id
        "#,
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(billboards)
}

/// Contract row as JSON plus the sum of its recorded payments.
///
/// Rows are read as JSON so legacy column names survive until migrated.
const CONTRACT_SELECT: &str = r#"
    SELECT
        to_jsonb(c) AS row,
        COALESCE(
            (SELECT SUM(p.amount) FROM payments p WHERE p.contract_id = c.id),
            0
        ) AS payments_total
    FROM contracts c
"#;

fn to_record(row: Value, payments_total: Decimal) -> Option<ContractRecord> {
    let mut record = ContractRecord::from_row_json(&row)?;
    if payments_total > Decimal::ZERO || record.total_paid.is_none() {
        record.total_paid = Some(payments_total);
    }
    Some(record)
}

/// Get a contract by id
pub async fn get_contract(pool: &PgPool, id: i64) -> Result<Option<ContractRecord>> {
    let sql = format!("{CONTRACT_SELECT} WHERE c.id = $1");
    let row = sqlx::query_as::<_, (Value, Decimal)>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.and_then(|(row, paid)| to_record(row, paid)))
}

/// Get every contract (for status and expiry screens)
pub async fn get_all_contracts(pool: &PgPool) -> Result<Vec<ContractRecord>> {
    let sql = format!("{CONTRACT_SELECT} ORDER BY c.id DESC");
    let rows = sqlx::query_as::<_, (Value, Decimal)>(&sql)
        .fetch_all(pool)
        .await?;

    let total = rows.len();
    let records: Vec<ContractRecord> = rows
        .into_iter()
        .filter_map(|(row, paid)| to_record(row, paid))
        .collect();

    if records.len() < total {
        tracing::warn!("Skipped {} contract rows without a usable id", total - records.len());
    }

    Ok(records)
}

/// Insert a contract in the canonical schema, returning its id
pub async fn insert_contract(pool: &PgPool, record: &ContractRecord) -> Result<i64> {
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO contracts (
            customer_name, customer_category, start_date, end_date,
            pricing_mode, duration, currency, exchange_rate, billboard_ids,
            print_cost_enabled, print_price_per_meter, installation_included,
            base_total, discount_amount, installation_cost, print_cost_total,
            rental_cost_only, operating_fee_rate, operating_fee, total_cost
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
        RETURNING id
        "#,
    )
    .bind(&record.customer_name)
    .bind(&record.customer_category)
    .bind(record.start_date)
    .bind(record.end_date)
    .bind(record.pricing_mode.as_str())
    .bind(db_duration(record.duration))
    .bind(&record.currency)
    .bind(record.exchange_rate)
    .bind(&record.billboard_ids)
    .bind(record.print_cost_enabled)
    .bind(record.print_price_per_meter)
    .bind(record.installation_included)
    .bind(record.base_total)
    .bind(record.discount_amount)
    .bind(record.installation_cost)
    .bind(record.print_cost_total)
    .bind(record.rental_cost_only)
    .bind(record.operating_fee_rate)
    .bind(record.operating_fee)
    .bind(record.total_cost)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Overwrite a contract with canonical values. Returns false if it does not exist.
pub async fn update_contract(pool: &PgPool, id: i64, record: &ContractRecord) -> Result<bool> {
    let updated: Option<i64> = sqlx::query_scalar(
        r#"
        UPDATE contracts SET
            customer_name = $1,
            customer_category = $2,
            start_date = $3,
            end_date = $4,
            pricing_mode = $5,
            duration = $6,
            currency = $7,
            exchange_rate = $8,
            billboard_ids = $9,
            print_cost_enabled = $10,
            print_price_per_meter = $11,
            installation_included = $12,
            base_total = $13,
            discount_amount = $14,
            installation_cost = $15,
            print_cost_total = $16,
            rental_cost_only = $17,
            operating_fee_rate = $18,
            operating_fee = $19,
            total_cost = $20
        WHERE id = $21
        RETURNING id
        "#,
    )
    .bind(&record.customer_name)
    .bind(&record.customer_category)
    .bind(record.start_date)
    .bind(record.end_date)
    .bind(record.pricing_mode.as_str())
    .bind(db_duration(record.duration))
    .bind(&record.currency)
    .bind(record.exchange_rate)
    .bind(&record.billboard_ids)
    .bind(record.print_cost_enabled)
    .bind(record.print_price_per_meter)
    .bind(record.installation_included)
    .bind(record.base_total)
    .bind(record.discount_amount)
    .bind(record.installation_cost)
    .bind(record.print_cost_total)
    .bind(record.rental_cost_only)
    .bind(record.operating_fee_rate)
    .bind(record.operating_fee)
    .bind(record.total_cost)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(updated.is_some())
}

fn db_duration(duration: u32) -> i32 {
    i32::try_from(duration).unwrap_or(i32::MAX)
}
