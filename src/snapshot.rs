//! Bundled fallback snapshots
//!
//! Static JSON captured ahead of time and compiled into the worker. Only the
//! history queries have one, and only for the coin they were captured from;
//! every other coin and query degrades to "unavailable" instead.

use std::borrow::Cow;
use std::sync::Arc;

use serde_json::Value;

use crate::types::QueryKind;

const BUNDLED_MARKET_CHART: &str = include_str!("../fallback/backup_market_chart.json");
const BUNDLED_OHLC: &str = include_str!("../fallback/backup_ohlc.json");

/// CoinGecko id of the coin the bundled documents describe
pub const BUNDLED_COIN_ID: &str = "ethereum";

/// Read-only snapshot documents keyed by query kind
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    market_chart: Option<Cow<'static, str>>,
    ohlc: Option<Cow<'static, str>>,
}

impl SnapshotStore {
    /// Snapshots shipped with the deployment
    pub fn bundled() -> Self {
        Self {
            market_chart: Some(Cow::Borrowed(BUNDLED_MARKET_CHART)),
            ohlc: Some(Cow::Borrowed(BUNDLED_OHLC)),
        }
    }

    /// Bundled snapshots when they describe `coin_id`, otherwise none
    pub fn for_coin(coin_id: &str) -> Self {
        if coin_id == BUNDLED_COIN_ID {
            Self::bundled()
        } else {
            Self::empty()
        }
    }

    /// No snapshots at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// Replace the document for one kind; kinds without a slot are ignored
    #[must_use]
    pub fn with(mut self, kind: QueryKind, document: impl Into<Cow<'static, str>>) -> Self {
        match kind {
            QueryKind::MarketChart => self.market_chart = Some(document.into()),
            QueryKind::Ohlc => self.ohlc = Some(document.into()),
            QueryKind::Metadata | QueryKind::LivePrice => {}
        }
        self
    }

    /// Parse the snapshot for `kind`, if one exists and is valid JSON
    pub fn load(&self, kind: QueryKind) -> Option<Arc<Value>> {
        let document = match kind {
            QueryKind::MarketChart => self.market_chart.as_deref(),
            QueryKind::Ohlc => self.ohlc.as_deref(),
            QueryKind::Metadata | QueryKind::LivePrice => None,
        }?;

        match serde_json::from_str(document) {
            Ok(value) => Some(Arc::new(value)),
            Err(e) => {
                log::error!("Fallback snapshot for {kind} is not valid JSON: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_snapshots_parse() {
        let store = SnapshotStore::bundled();

        let ohlc = store.load(QueryKind::Ohlc).expect("bundled OHLC snapshot");
        let rows = ohlc.as_array().expect("OHLC snapshot is an array");
        assert!(!rows.is_empty());
        assert_eq!(rows[0].as_array().map(Vec::len), Some(5));

        let chart = store
            .load(QueryKind::MarketChart)
            .expect("bundled market chart snapshot");
        for key in ["prices", "market_caps", "total_volumes"] {
            assert!(chart[key].as_array().is_some_and(|a| !a.is_empty()), "{key}");
        }
    }

    #[test]
    fn test_no_snapshot_for_live_queries() {
        let store = SnapshotStore::bundled();
        assert!(store.load(QueryKind::Metadata).is_none());
        assert!(store.load(QueryKind::LivePrice).is_none());
    }

    #[test]
    fn test_snapshots_only_for_captured_coin() {
        let ethereum = SnapshotStore::for_coin(BUNDLED_COIN_ID);
        assert!(ethereum.load(QueryKind::Ohlc).is_some());
        assert!(ethereum.load(QueryKind::MarketChart).is_some());

        for coin_id in ["bitcoin", "solana", "ripple"] {
            let store = SnapshotStore::for_coin(coin_id);
            assert!(store.load(QueryKind::Ohlc).is_none(), "{coin_id}");
            assert!(store.load(QueryKind::MarketChart).is_none(), "{coin_id}");
        }
    }

    #[test]
    fn test_invalid_snapshot_is_ignored() {
        let store = SnapshotStore::empty().with(QueryKind::Ohlc, "{not json");
        assert!(store.load(QueryKind::Ohlc).is_none());
    }
}
