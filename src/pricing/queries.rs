//! Database queries for the pricing tables.

use sqlx::PgPool;

use crate::error::AppError;

use super::models::{InstallationPrice, PricingEntry};

const PRICING_COLUMNS: &str = r#"
    id, size, billboard_level, customer_category,
    one_day, one_month, "2_months", "3_months", "6_months", full_year
"#;

/// Get every pricing row (for cache warming)
pub async fn get_all_pricing_entries(pool: &PgPool) -> Result<Vec<PricingEntry>, AppError> {
    let sql = format!("SELECT {PRICING_COLUMNS} FROM pricing ORDER BY id");
    let entries = sqlx::query_as::<_, PricingEntry>(&sql).fetch_all(pool).await?;

    Ok(entries)
}

/// Get all pricing rows of one customer category, in table order
pub async fn get_pricing_entries_by_category(
    pool: &PgPool,
    category: &str,
) -> Result<Vec<PricingEntry>, AppError> {
    let sql = format!(
        "SELECT {PRICING_COLUMNS} FROM pricing WHERE TRIM(customer_category) = $1 ORDER BY id"
    );
    let entries = sqlx::query_as::<_, PricingEntry>(&sql)
        .bind(category.trim())
        .fetch_all(pool)
        .await?;

    Ok(entries)
}

/// List pricing rows for the admin screens, optionally filtered
pub async fn list_pricing_entries(
    pool: &PgPool,
    level: Option<&str>,
    category: Option<&str>,
) -> Result<Vec<PricingEntry>, AppError> {
    let sql = format!(
        r#"
        SELECT {PRICING_COLUMNS}
        FROM pricing
        WHERE ($1::text IS NULL OR billboard_level = $1)
          AND ($2::text IS NULL OR customer_category = $2)
        ORDER BY customer_category, billboard_level, size
        "#
    );
    let entries = sqlx::query_as::<_, PricingEntry>(&sql)
        .bind(level)
        .bind(category)
        .fetch_all(pool)
        .await?;

    Ok(entries)
}

/// Insert or update the row for (size, level, category)
pub async fn upsert_pricing_entry(
    pool: &PgPool,
    entry: &PricingEntry,
) -> Result<PricingEntry, AppError> {
    let sql = format!(
        r#"
        INSERT INTO pricing (
            size, billboard_level, customer_category,
            one_day, one_month, "2_months", "3_months", "6_months", full_year
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (size, billboard_level, customer_category) DO UPDATE SET
            one_day = EXCLUDED.one_day,
            one_month = EXCLUDED.one_month,
            "2_months" = EXCLUDED."2_months",
            "3_months" = EXCLUDED."3_months",
            "6_months" = EXCLUDED."6_months",
            full_year = EXCLUDED.full_year
        RETURNING {PRICING_COLUMNS}
        "#
    );
    let saved = sqlx::query_as::<_, PricingEntry>(&sql)
        .bind(entry.size.trim())
        .bind(entry.billboard_level.trim())
        .bind(entry.customer_category.trim())
        .bind(entry.one_day)
        .bind(entry.one_month)
        .bind(entry.two_months)
        .bind(entry.three_months)
        .bind(entry.six_months)
        .bind(entry.full_year)
        .fetch_one(pool)
        .await?;

    Ok(saved)
}

/// Delete a pricing row, returning its customer category
pub async fn delete_pricing_entry(pool: &PgPool, id: i64) -> Result<Option<String>, AppError> {
    let category: Option<String> = sqlx::query_scalar(
        r#"
        DELETE FROM pricing
        WHERE id = $1
        RETURNING customer_category
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(category)
}

/// Get installation prices for all sizes (for cache warming)
pub async fn get_installation_prices(pool: &PgPool) -> Result<Vec<InstallationPrice>, AppError> {
    let prices = sqlx::query_as::<_, InstallationPrice>(
        r#"
        SELECT size, install_price
        FROM installation_pricing
        WHERE install_price IS NOT NULL
        ORDER BY size
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(prices)
}
