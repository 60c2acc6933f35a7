//! CoinGecko payload types
//!
//! Typed views over the JSON the endpoint layer caches. Parsing happens where
//! a widget is rendered, so a bad payload only takes that widget down.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{DashboardError, Result};

/// One coin's entry from `/simple/price`
#[derive(Debug, Clone, PartialEq)]
pub struct LiveQuote {
    pub price: f64,
    pub change_24h_percent: f64,
    pub market_cap: f64,
    pub volume_24h: f64,
}

impl LiveQuote {
    /// Pick `coin_id` out of a simple-price response quoted in `vs_currency`
    ///
    /// Missing optional fields read as zero; a missing coin or price is a
    /// shape error.
    pub fn from_simple_price(value: &Value, coin_id: &str, vs_currency: &str) -> Result<Self> {
        let entry = value
            .get(coin_id)
            .and_then(Value::as_object)
            .ok_or_else(|| DashboardError::Shape(format!("no simple price entry for {coin_id}")))?;

        let field = |suffix: &str| {
            let key = if suffix.is_empty() {
                vs_currency.to_string()
            } else {
                format!("{vs_currency}_{suffix}")
            };
            entry.get(&key).and_then(Value::as_f64)
        };

        let price = field("")
            .ok_or_else(|| DashboardError::Shape(format!("no {vs_currency} price for {coin_id}")))?;

        Ok(Self {
            price,
            change_24h_percent: field("24h_change").unwrap_or(0.0),
            market_cap: field("market_cap").unwrap_or(0.0),
            volume_24h: field("24h_vol").unwrap_or(0.0),
        })
    }
}

/// Fields of `/coins/{id}` shown on the fundamentals panel
#[derive(Debug, Clone, Deserialize)]
pub struct CoinMetadata {
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub hashing_algorithm: Option<String>,
    #[serde(default)]
    pub categories: Vec<Option<String>>,
    #[serde(default)]
    pub image: CoinImage,
    #[serde(default)]
    pub links: CoinLinks,
}

/// Logo variants
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoinImage {
    #[serde(default)]
    pub large: Option<String>,
}

/// Outbound links
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoinLinks {
    #[serde(default)]
    pub homepage: Vec<Option<String>>,
    #[serde(default)]
    pub blockchain_site: Vec<Option<String>>,
}

impl CoinMetadata {
    pub fn from_value(value: &Value) -> Result<Self> {
        Self::deserialize(value).map_err(|e| DashboardError::Shape(format!("coin metadata: {e}")))
    }

    /// Non-empty category names
    pub fn category_names(&self) -> Vec<&str> {
        self.categories
            .iter()
            .filter_map(Option::as_deref)
            .filter(|c| !c.is_empty())
            .collect()
    }

    pub fn homepage(&self) -> Option<&str> {
        self.links
            .homepage
            .iter()
            .filter_map(Option::as_deref)
            .find(|s| !s.is_empty())
    }

    pub fn explorer(&self) -> Option<&str> {
        self.links
            .blockchain_site
            .iter()
            .filter_map(Option::as_deref)
            .find(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_live_quote_parse() {
        let value = json!({
            "ethereum": {
                "usd": 3521.45,
                "usd_market_cap": 424_000_000_000.0,
                "usd_24h_vol": 18_500_000_000.0,
                "usd_24h_change": -1.25
            }
        });

        let quote = LiveQuote::from_simple_price(&value, "ethereum", "usd").unwrap();
        assert!((quote.price - 3521.45).abs() < f64::EPSILON);
        assert!((quote.change_24h_percent + 1.25).abs() < f64::EPSILON);
        assert!((quote.market_cap - 4.24e11).abs() < 1.0);
    }

    #[test]
    fn test_live_quote_missing_optional_fields() {
        let value = json!({"bitcoin": {"usd": 97000}});
        let quote = LiveQuote::from_simple_price(&value, "bitcoin", "usd").unwrap();
        assert!(quote.volume_24h.abs() < f64::EPSILON);
    }

    #[test]
    fn test_live_quote_wrong_coin() {
        let value = json!({"bitcoin": {"usd": 97000}});
        assert!(matches!(
            LiveQuote::from_simple_price(&value, "ethereum", "usd"),
            Err(DashboardError::Shape(_))
        ));
    }

    #[test]
    fn test_metadata_parse() {
        let value = json!({
            "name": "Ethereum",
            "symbol": "eth",
            "hashing_algorithm": "Ethash",
            "categories": ["Smart Contract Platform", null, ""],
            "image": {"large": "https://img.test/eth.png"},
            "links": {
                "homepage": ["https://www.ethereum.org/", ""],
                "blockchain_site": [null, "https://etherscan.io/"]
            }
        });

        let meta = CoinMetadata::from_value(&value).unwrap();
        assert_eq!(meta.category_names(), vec!["Smart Contract Platform"]);
        assert_eq!(meta.homepage(), Some("https://www.ethereum.org/"));
        assert_eq!(meta.explorer(), Some("https://etherscan.io/"));
    }

    #[test]
    fn test_metadata_minimal() {
        let meta = CoinMetadata::from_value(&json!({"name": "Solana", "symbol": "sol"})).unwrap();
        assert!(meta.hashing_algorithm.is_none());
        assert!(meta.homepage().is_none());
        assert!(meta.image.large.is_none());
    }

    #[test]
    fn test_metadata_missing_name_is_shape_error() {
        assert!(matches!(
            CoinMetadata::from_value(&json!({"symbol": "eth"})),
            Err(DashboardError::Shape(_))
        ));
    }
}
