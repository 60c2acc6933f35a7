//! Configuration management for the forecast portal

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{DashboardError, Result};
use crate::fetcher::RetryPolicy;
use crate::registry::TRACKED_ASSETS;
use worker::Env;

/// Default CoinGecko v3 base URL
pub const DEFAULT_API_BASE: &str = "https://api.coingecko.com/api/v3";

/// Upper bound for `FETCH_BASE_DELAY_SECS`
pub const MAX_BASE_DELAY_SECS: f64 = 3600.0;
/// Upper bound for `FETCH_TIMEOUT_SECS`
pub const MAX_TIMEOUT_SECS: u64 = 3600;

const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(2);

/// Cache lifetimes per endpoint, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointTtls {
    pub metadata_secs: u64,
    pub live_price_secs: u64,
    pub ohlc_secs: u64,
    pub market_chart_secs: u64,
}

impl Default for EndpointTtls {
    fn default() -> Self {
        Self {
            metadata_secs: 600,
            // Live price moves faster than history or metadata
            live_price_secs: 300,
            ohlc_secs: 600,
            market_chart_secs: 600,
        }
    }
}

/// Portal configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment (production, staging, development)
    pub environment: String,

    /// Log level
    pub log_level: String,

    /// Upstream price API
    pub api_base: String,
    pub vs_currency: String,
    pub history_days: u32,

    /// Resilient fetch parameters
    pub fetch_retries: u32,
    pub fetch_base_delay_secs: f64,
    pub fetch_timeout_secs: u64,

    /// Cache bounds
    pub memo_capacity: usize,
    pub cache_capacity: usize,
    pub ttls: EndpointTtls,

    /// Prediction service base URL per asset id
    pub prediction_urls: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    /// Load configuration from Cloudflare environment variables
    pub fn from_env(env: &Env) -> Result<Self> {
        let config = Self::from_lookup(|key| env.var(key).ok().map(|v| v.to_string()));
        config.validate()?;
        Ok(config)
    }

    /// Build configuration from any key lookup, falling back to defaults
    /// for missing or unparsable values
    pub fn from_lookup<F>(mut lookup: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut prediction_urls = HashMap::new();
        for asset in TRACKED_ASSETS {
            let key = format!("PREDICTION_URL_{}", asset.id.to_uppercase());
            let url = lookup(&key)
                .filter(|v| !v.trim().is_empty())
                .or_else(|| asset.default_prediction_url.map(String::from));
            if let Some(url) = url {
                prediction_urls.insert(asset.id.to_string(), url.trim_end_matches('/').to_string());
            }
        }

        let defaults = EndpointTtls::default();

        Self {
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "production".to_string()),

            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),

            api_base: lookup("COINGECKO_API_BASE")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),

            vs_currency: lookup("VS_CURRENCY")
                .map(|v| v.to_lowercase())
                .unwrap_or_else(|| "usd".to_string()),

            history_days: parsed(&mut lookup, "HISTORY_DAYS", 90),

            fetch_retries: parsed(&mut lookup, "FETCH_RETRIES", 3),
            fetch_base_delay_secs: parsed(&mut lookup, "FETCH_BASE_DELAY_SECS", 2.0),
            fetch_timeout_secs: parsed(&mut lookup, "FETCH_TIMEOUT_SECS", 20),

            // Room for every tracked asset's default queries
            memo_capacity: parsed(&mut lookup, "MEMO_CAPACITY", 16),
            cache_capacity: parsed(&mut lookup, "CACHE_CAPACITY", 256),

            ttls: EndpointTtls {
                metadata_secs: parsed(&mut lookup, "TTL_METADATA_SECS", defaults.metadata_secs),
                live_price_secs: parsed(&mut lookup, "TTL_LIVE_PRICE_SECS", defaults.live_price_secs),
                ohlc_secs: parsed(&mut lookup, "TTL_OHLC_SECS", defaults.ohlc_secs),
                market_chart_secs: parsed(
                    &mut lookup,
                    "TTL_MARKET_CHART_SECS",
                    defaults.market_chart_secs,
                ),
            },

            prediction_urls,
        }
    }

    /// Retry policy handed to the resilient fetcher
    pub fn retry_policy(&self) -> RetryPolicy {
        let base_delay = Duration::try_from_secs_f64(
            self.fetch_base_delay_secs.clamp(0.0, MAX_BASE_DELAY_SECS),
        )
        .unwrap_or(DEFAULT_BASE_DELAY);

        RetryPolicy::new(
            self.fetch_retries,
            base_delay,
            Duration::from_secs(self.fetch_timeout_secs.min(MAX_TIMEOUT_SECS)),
        )
    }

    /// Prediction service base URL for an asset, if one is configured
    pub fn prediction_url(&self, asset_id: &str) -> Option<&str> {
        self.prediction_urls.get(asset_id).map(String::as_str)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_base.is_empty() {
            return Err(DashboardError::Config("COINGECKO_API_BASE must not be empty".into()));
        }
        if self.fetch_retries == 0 {
            return Err(DashboardError::Config("FETCH_RETRIES must be at least 1".into()));
        }
        if !(0.0..=MAX_BASE_DELAY_SECS).contains(&self.fetch_base_delay_secs) {
            return Err(DashboardError::Config(format!(
                "FETCH_BASE_DELAY_SECS must be between 0 and {MAX_BASE_DELAY_SECS}"
            )));
        }
        if self.fetch_timeout_secs == 0 || self.fetch_timeout_secs > MAX_TIMEOUT_SECS {
            return Err(DashboardError::Config(format!(
                "FETCH_TIMEOUT_SECS must be between 1 and {MAX_TIMEOUT_SECS}"
            )));
        }
        if self.history_days == 0 {
            return Err(DashboardError::Config("HISTORY_DAYS must be positive".into()));
        }
        if self.memo_capacity == 0 || self.cache_capacity == 0 {
            return Err(DashboardError::Config("cache capacities must be positive".into()));
        }
        Ok(())
    }
}

fn parsed<T, F>(lookup: &mut F, key: &str, default: T) -> T
where
    T: FromStr,
    F: FnMut(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
