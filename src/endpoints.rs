//! Cached endpoint layer
//!
//! Named CoinGecko queries for one asset, each behind its own TTL:
//! - metadata: `/coins/{id}`
//! - live market: `/simple/price`
//! - OHLC history: `/coins/{id}/ohlc`
//! - market chart history: `/coins/{id}/market_chart`
//!
//! A miss or expiry goes to the resilient fetcher and whatever comes back is
//! stored, failures included, so a failing upstream is asked at most once
//! per TTL window.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::{Clock, SystemClock, TtlCache};
use crate::config::{Config, EndpointTtls};
use crate::fetcher::ResilientFetcher;
use crate::transport::{Sleeper, Transport};
use crate::types::{FetchOutcome, FetchRequest, QueryKind};

/// Everything an asset page needs from upstream
#[derive(Debug, Clone)]
pub struct AssetMarketData {
    pub live: FetchOutcome,
    pub ohlc: FetchOutcome,
    pub market_chart: FetchOutcome,
    pub metadata: FetchOutcome,
}

impl AssetMarketData {
    /// True when any section is showing stale or bundled snapshot data
    pub fn is_degraded(&self) -> bool {
        [&self.live, &self.ohlc, &self.market_chart, &self.metadata]
            .iter()
            .any(|outcome| outcome.is_degraded())
    }
}

/// Per-asset cached queries
pub struct MarketEndpoints<T, S, C = SystemClock> {
    fetcher: ResilientFetcher<T, S>,
    cache: Arc<TtlCache<C>>,
    api_base: String,
    coin_id: String,
    vs_currency: String,
    ttls: EndpointTtls,
    default_days: u32,
}

impl<T: Transport, S: Sleeper, C: Clock> MarketEndpoints<T, S, C> {
    pub fn new(
        fetcher: ResilientFetcher<T, S>,
        cache: Arc<TtlCache<C>>,
        config: &Config,
        coin_id: &str,
    ) -> Self {
        Self {
            fetcher,
            cache,
            api_base: config.api_base.clone(),
            coin_id: coin_id.to_string(),
            vs_currency: config.vs_currency.clone(),
            ttls: config.ttls,
            default_days: config.history_days,
        }
    }

    pub fn coin_id(&self) -> &str {
        &self.coin_id
    }

    pub fn default_days(&self) -> u32 {
        self.default_days
    }

    pub fn metadata_request(&self) -> FetchRequest {
        FetchRequest::new(
            format!("{}/coins/{}", self.api_base, self.coin_id),
            QueryKind::Metadata,
        )
    }

    pub fn live_market_request(&self) -> FetchRequest {
        FetchRequest::new(format!("{}/simple/price", self.api_base), QueryKind::LivePrice)
            .param("ids", &self.coin_id)
            .param("vs_currencies", &self.vs_currency)
            .param("include_market_cap", true)
            .param("include_24hr_vol", true)
            .param("include_24hr_change", true)
    }

    pub fn ohlc_request(&self, days: u32) -> FetchRequest {
        FetchRequest::new(
            format!("{}/coins/{}/ohlc", self.api_base, self.coin_id),
            QueryKind::Ohlc,
        )
        .param("vs_currency", &self.vs_currency)
        .param("days", days)
    }

    pub fn market_chart_request(&self, days: u32) -> FetchRequest {
        FetchRequest::new(
            format!("{}/coins/{}/market_chart", self.api_base, self.coin_id),
            QueryKind::MarketChart,
        )
        .param("vs_currency", &self.vs_currency)
        .param("days", days)
    }

    /// Coin metadata (name, links, categories)
    pub async fn metadata(&self) -> FetchOutcome {
        self.cached(self.metadata_request(), self.ttls.metadata_secs)
            .await
    }

    /// Simple price with market cap, volume and 24h change
    pub async fn live_market(&self) -> FetchOutcome {
        self.cached(self.live_market_request(), self.ttls.live_price_secs)
            .await
    }

    /// `[timestamp_ms, open, high, low, close]` rows over `days`
    pub async fn ohlc(&self, days: u32) -> FetchOutcome {
        self.cached(self.ohlc_request(days), self.ttls.ohlc_secs)
            .await
    }

    /// Price, market cap and volume series over `days`
    pub async fn market_chart(&self, days: u32) -> FetchOutcome {
        self.cached(self.market_chart_request(days), self.ttls.market_chart_secs)
            .await
    }

    /// Dispatch by kind; `days` only applies to history queries
    pub async fn query(&self, kind: QueryKind, days: u32) -> FetchOutcome {
        match kind {
            QueryKind::Metadata => self.metadata().await,
            QueryKind::LivePrice => self.live_market().await,
            QueryKind::Ohlc => self.ohlc(days).await,
            QueryKind::MarketChart => self.market_chart(days).await,
        }
    }

    /// Load every section of the asset page, one query after another
    pub async fn load_page_data(&self) -> AssetMarketData {
        let live = self.live_market().await;
        let ohlc = self.ohlc(self.default_days).await;
        let market_chart = self.market_chart(self.default_days).await;
        let metadata = self.metadata().await;

        AssetMarketData {
            live,
            ohlc,
            market_chart,
            metadata,
        }
    }

    /// Best-effort cache pre-population for the page's default queries
    ///
    /// Meant to run detached. Nothing is returned and nothing is surfaced;
    /// outcomes are only logged at debug level.
    pub async fn warm_up(&self) {
        let live = self.live_market().await;
        let ohlc = self.ohlc(self.default_days).await;
        let metadata = self.metadata().await;

        log::debug!(
            "warm-up for {}: live={} ohlc={} metadata={}",
            self.coin_id,
            live.source(),
            ohlc.source(),
            metadata.source()
        );
    }

    async fn cached(&self, request: FetchRequest, ttl_secs: u64) -> FetchOutcome {
        let key = request.cache_key();
        if let Some(hit) = self.cache.get(&key) {
            return hit;
        }

        let outcome = self.fetcher.fetch_fresh(&request).await;
        self.cache
            .insert(key, outcome.clone(), Duration::from_secs(ttl_secs));
        outcome
    }
}
