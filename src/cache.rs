//! In-memory caching using moka
//!
//! Pricing tables change only when an admin edits them, so they are cached
//! per customer category and invalidated on every pricing write.
//!
//! Every invalidation bumps a write generation. The warmer only keeps the
//! tables it loaded if no write happened while it was reading.

use moka::future::Cache;
use serde::Serialize;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};

use crate::pricing::lookup::PricingTable;
use crate::pricing::models::{InstallationPrice, PricingEntry};
use crate::pricing::queries;

const INSTALLATION_KEY: &str = "installation";

/// Application cache holding pricing tables and installation prices
#[derive(Clone)]
pub struct AppCache {
    /// Pricing tables (customer category -> table of all levels)
    pub pricing_tables: Cache<String, Arc<PricingTable>>,
    /// Installation prices by size (singleton)
    pub installation_prices: Cache<String, Arc<Vec<InstallationPrice>>>,
    /// Bumped on every pricing write
    generation: Arc<AtomicU64>,
}

impl AppCache {
    /// Create a new cache instance with configured TTLs
    pub fn new() -> Self {
        Self {
            // One table per customer category; categories are few
            pricing_tables: Cache::builder()
                .max_capacity(50)
                .time_to_live(Duration::from_secs(30 * 60))
                .time_to_idle(Duration::from_secs(10 * 60))
                .build(),

            installation_prices: Cache::builder()
                .max_capacity(1)
                .time_to_live(Duration::from_secs(30 * 60))
                .build(),

            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            pricing_tables_size: self.pricing_tables.entry_count(),
            installation_prices_cached: self.installation_prices.entry_count() > 0,
        }
    }

    /// Current write generation, read before loading rows to cache
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Invalidate the pricing table of one customer category
    pub async fn invalidate_category(&self, category: &str) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.pricing_tables.invalidate(&Self::category_key(category)).await;
        info!("Pricing cache invalidated for category: {}", category);
    }

    pub fn category_key(category: &str) -> String {
        format!("pricing:{}", category.trim())
    }

    pub fn installation_key() -> String {
        INSTALLATION_KEY.to_string()
    }

    /// Replace cached tables with a fresh set of pricing rows read at
    /// `generation`.
    ///
    /// Returns false, leaving nothing cached from these rows, when a pricing
    /// write invalidated the cache in the meantime.
    pub async fn store_pricing_entries(&self, entries: Vec<PricingEntry>, generation: u64) -> bool {
        if self.generation() != generation {
            return false;
        }

        let mut by_category: HashMap<String, Vec<PricingEntry>> = HashMap::new();
        for entry in entries {
            by_category
                .entry(entry.customer_category.trim().to_string())
                .or_default()
                .push(entry);
        }

        self.pricing_tables.invalidate_all();
        let mut keys = Vec::with_capacity(by_category.len());
        for (category, rows) in by_category {
            let key = Self::category_key(&category);
            self.pricing_tables
                .insert(key.clone(), Arc::new(PricingTable::new(rows)))
                .await;
            keys.push(key);
        }

        // A write that landed while inserting may have been overwritten
        if self.generation() != generation {
            for key in &keys {
                self.pricing_tables.invalidate(key).await;
            }
            return false;
        }

        true
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics for monitoring endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub pricing_tables_size: u64,
    pub installation_prices_cached: bool,
}

/// Start background cache warmer
///
/// Warms the cache on startup and refreshes it every `refresh_secs`.
pub async fn start_cache_warmer(cache: AppCache, db: PgPool, refresh_secs: u64) {
    let mut interval = interval(Duration::from_secs(refresh_secs.max(1)));
    loop {
        // First tick completes immediately
        interval.tick().await;
        warm_cache(&cache, &db).await;
    }
}

/// Warm the cache with the full pricing and installation tables
async fn warm_cache(cache: &AppCache, db: &PgPool) {
    info!("Starting cache warm-up...");

    let generation = cache.generation();
    match queries::get_all_pricing_entries(db).await {
        Ok(entries) => {
            if !cache.store_pricing_entries(entries, generation).await {
                info!("Pricing changed during warm-up, tables will load on demand");
            }
        }
        Err(e) => warn!("Failed to warm pricing cache: {}", e),
    }

    match queries::get_installation_prices(db).await {
        Ok(prices) => {
            cache
                .installation_prices
                .insert(AppCache::installation_key(), Arc::new(prices))
                .await;
        }
        Err(e) => warn!("Failed to warm installation price cache: {}", e),
    }

    info!("Cache warm-up complete. Stats: {:?}", cache.stats());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(category: &str) -> PricingEntry {
        PricingEntry {
            id: 1,
            size: "4x3".to_string(),
            billboard_level: "A".to_string(),
            customer_category: category.to_string(),
            one_day: None,
            one_month: None,
            two_months: None,
            three_months: None,
            six_months: None,
            full_year: None,
        }
    }

    #[tokio::test]
    async fn test_store_pricing_entries_groups_by_category() {
        let cache = AppCache::new();
        let stored = cache
            .store_pricing_entries(
                vec![entry("عادي"), entry("شركات"), entry("عادي ")],
                cache.generation(),
            )
            .await;
        assert!(stored);

        let regular = cache
            .pricing_tables
            .get(&AppCache::category_key("عادي"))
            .await
            .unwrap();
        assert_eq!(regular.entries().len(), 2);

        cache.invalidate_category("عادي").await;
        assert!(cache.pricing_tables.get(&AppCache::category_key("عادي")).await.is_none());
        assert!(cache.pricing_tables.get(&AppCache::category_key("شركات")).await.is_some());
    }

    #[tokio::test]
    async fn test_rows_read_before_a_write_are_not_cached() {
        let cache = AppCache::new();
        let generation = cache.generation();

        // Pricing write lands while the warmer is still reading
        cache.invalidate_category("عادي").await;

        let stored = cache
            .store_pricing_entries(vec![entry("عادي")], generation)
            .await;
        assert!(!stored);
        assert!(cache.pricing_tables.get(&AppCache::category_key("عادي")).await.is_none());
    }
}
