//! Common types for the portal
//!
//! Requests, outcomes and cache keys shared by the fetcher, the caches and
//! the endpoint layer.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::error::DashboardError;

/// Semantic type of an upstream query
///
/// Carried explicitly with every request so fallback selection never has to
/// guess from the URL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    Metadata,
    LivePrice,
    Ohlc,
    MarketChart,
}

impl QueryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            QueryKind::Metadata => "metadata",
            QueryKind::LivePrice => "live_price",
            QueryKind::Ohlc => "ohlc",
            QueryKind::MarketChart => "market_chart",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryKind {
    type Err = DashboardError;

    /// Accepts the canonical names plus the short `price` and `chart` forms
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "metadata" => Ok(QueryKind::Metadata),
            "price" | "live_price" => Ok(QueryKind::LivePrice),
            "ohlc" => Ok(QueryKind::Ohlc),
            "chart" | "market_chart" => Ok(QueryKind::MarketChart),
            other => Err(DashboardError::BadRequest(format!("unknown query '{other}'"))),
        }
    }
}

/// An upstream GET request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    url: String,
    params: BTreeMap<String, String>,
    kind: QueryKind,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>, kind: QueryKind) -> Self {
        Self {
            url: url.into(),
            params: BTreeMap::new(),
            kind,
        }
    }

    /// Add a query parameter; primitive values are rendered with `Display`
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    pub fn kind(&self) -> QueryKind {
        self.kind
    }

    /// Params as `k=v` pairs joined by `&`, in key order
    pub fn canonical_query(&self) -> String {
        self.params
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    }

    pub fn cache_key(&self) -> CacheKey {
        CacheKey(format!("{}:{}?{}", self.kind, self.url, self.canonical_query()))
    }
}

/// Deterministic key derived from endpoint identity and canonical params
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of a resilient fetch
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Parsed upstream response
    Live(Arc<Value>),
    /// Last live response for the same request, served after every attempt failed
    Stale(Arc<Value>),
    /// Bundled snapshot served when there is no earlier live response
    Snapshot(Arc<Value>),
    /// Nothing to show
    Unavailable,
}

impl FetchOutcome {
    pub fn data(&self) -> Option<&Value> {
        match self {
            FetchOutcome::Live(v) | FetchOutcome::Stale(v) | FetchOutcome::Snapshot(v) => {
                Some(v.as_ref())
            }
            FetchOutcome::Unavailable => None,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, FetchOutcome::Live(_))
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, FetchOutcome::Stale(_))
    }

    pub fn is_snapshot(&self) -> bool {
        matches!(self, FetchOutcome::Snapshot(_))
    }

    /// Data is present but not from this fetch
    pub fn is_degraded(&self) -> bool {
        matches!(self, FetchOutcome::Stale(_) | FetchOutcome::Snapshot(_))
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, FetchOutcome::Unavailable)
    }

    /// Short label used in API responses and logs
    pub fn source(&self) -> &'static str {
        match self {
            FetchOutcome::Live(_) => "live",
            FetchOutcome::Stale(_) => "stale",
            FetchOutcome::Snapshot(_) => "snapshot",
            FetchOutcome::Unavailable => "unavailable",
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub environment: String,
    pub timestamp: String,
}

/// One registered asset as exposed by `/api/assets`
#[derive(Debug, Serialize)]
pub struct AssetSummary {
    pub id: String,
    pub coin_id: String,
    pub name: String,
    pub symbol: String,
    pub prediction_service: bool,
}

/// Cached endpoint result as exposed by `/api/market`
#[derive(Debug, Serialize)]
pub struct MarketDataResponse<'a> {
    pub asset: &'a str,
    pub query: QueryKind,
    pub source: &'static str,
    pub data: Option<&'a Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_kind_from_str() {
        assert_eq!("price".parse::<QueryKind>().unwrap(), QueryKind::LivePrice);
        assert_eq!(" OHLC ".parse::<QueryKind>().unwrap(), QueryKind::Ohlc);
        assert_eq!("market_chart".parse::<QueryKind>().unwrap(), QueryKind::MarketChart);
        assert!(matches!(
            "candles".parse::<QueryKind>(),
            Err(DashboardError::BadRequest(_))
        ));
    }

    #[test]
    fn test_cache_key_ignores_param_order() {
        let a = FetchRequest::new("https://api.test/coins/ethereum/ohlc", QueryKind::Ohlc)
            .param("vs_currency", "usd")
            .param("days", 90);
        let b = FetchRequest::new("https://api.test/coins/ethereum/ohlc", QueryKind::Ohlc)
            .param("days", 90)
            .param("vs_currency", "usd");

        assert_eq!(a.cache_key(), b.cache_key());
        assert_eq!(a.canonical_query(), "days=90&vs_currency=usd");
    }

    #[test]
    fn test_cache_key_many_params_any_order() {
        let pairs = [
            ("ids", "ethereum"),
            ("vs_currencies", "usd"),
            ("include_market_cap", "true"),
            ("include_24hr_vol", "true"),
            ("include_24hr_change", "true"),
        ];

        let forward = pairs
            .iter()
            .fold(FetchRequest::new("u", QueryKind::LivePrice), |r, (k, v)| r.param(*k, v));
        let backward = pairs
            .iter()
            .rev()
            .fold(FetchRequest::new("u", QueryKind::LivePrice), |r, (k, v)| r.param(*k, v));

        assert_eq!(forward.cache_key(), backward.cache_key());
    }

    #[test]
    fn test_cache_key_distinguishes_values_and_kinds() {
        let ninety = FetchRequest::new("u", QueryKind::Ohlc).param("days", 90);
        let thirty = FetchRequest::new("u", QueryKind::Ohlc).param("days", 30);
        let chart = FetchRequest::new("u", QueryKind::MarketChart).param("days", 90);

        assert_ne!(ninety.cache_key(), thirty.cache_key());
        assert_ne!(ninety.cache_key(), chart.cache_key());
    }

    #[test]
    fn test_outcome_accessors() {
        let live = FetchOutcome::Live(Arc::new(serde_json::json!({"a": 1})));
        assert!(live.is_live());
        assert_eq!(live.data().and_then(|v| v["a"].as_i64()), Some(1));
        assert_eq!(live.source(), "live");

        assert!(!live.is_degraded());

        let stale = FetchOutcome::Stale(Arc::new(serde_json::json!([1])));
        assert!(stale.is_stale() && stale.is_degraded());
        assert_eq!(stale.source(), "stale");
        assert!(stale.data().is_some());

        assert!(FetchOutcome::Unavailable.data().is_none());
        assert!(!FetchOutcome::Unavailable.is_degraded());
        assert_eq!(FetchOutcome::Unavailable.source(), "unavailable");
    }
}
