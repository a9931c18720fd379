//! Application configuration loaded from the environment

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    /// Currency used when a draft does not name one.
    pub default_currency: String,
    /// Operating fee percentage used when a draft does not set one.
    pub default_operating_fee_rate: Decimal,
    pub expiring_window_days: u32,
    pub cache_refresh_secs: u64,
}

impl Config {
    /// Load `.env` (if present) and read settings from the environment.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            host: try_load("HOST", "0.0.0.0")?,
            port: try_load("PORT", "8080")?,
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            database_max_connections: try_load("DATABASE_MAX_CONNECTIONS", "5")?,
            default_currency: try_load("DEFAULT_CURRENCY", "LYD")?,
            default_operating_fee_rate: try_load("DEFAULT_OPERATING_FEE_RATE", "3")?,
            expiring_window_days: try_load("EXPIRING_WINDOW_DAYS", "30")?,
            cache_refresh_secs: try_load("CACHE_REFRESH_SECS", "600")?,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid {key} value '{raw}': {e}"))
}
