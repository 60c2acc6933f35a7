//! Page and API request routing
//!
//! Pages are selected by query parameter (`?asset=ethereum`); the older
//! `?student=` name is still honoured for shared links. Everything here is
//! independent of the worker runtime so it can be exercised natively.

use std::future::Future;

use chrono::NaiveDate;
use worker::Url;

use crate::config::Config;
use crate::dashboard::{self, PageContext};
use crate::endpoints::AssetMarketData;
use crate::error::{DashboardError, Result};
use crate::registry::{AssetPage, AssetProfile, AssetRegistry};
use crate::types::QueryKind;

/// Longest history window accepted by `/api/market`
pub const MAX_HISTORY_DAYS: u32 = 365;

const PAGE_PARAMS: [&str; 2] = ["asset", "student"];

fn query_value(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Requested page name, if any
pub fn page_param(url: &Url) -> Option<String> {
    PAGE_PARAMS.iter().find_map(|name| query_value(url, name))
}

/// Where a page request lands
#[derive(Debug)]
pub enum PageRoute<'a> {
    Landing,
    Asset(&'a AssetPage),
    Unknown(String),
}

pub fn resolve<'a>(registry: &'a AssetRegistry, requested: Option<&str>) -> PageRoute<'a> {
    match requested {
        None => PageRoute::Landing,
        Some(name) => registry
            .resolve(name)
            .map_or_else(|| PageRoute::Unknown(name.to_string()), PageRoute::Asset),
    }
}

/// Finished HTML response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub status: u16,
    pub html: String,
}

impl RenderedPage {
    fn ok(html: String) -> Self {
        Self { status: 200, html }
    }
}

/// Render the page for `requested`
///
/// `load` is only called for a known asset. Render failures become an
/// inline error page rather than a bare 500.
pub async fn dispatch<F, Fut>(
    registry: &AssetRegistry,
    requested: Option<&str>,
    config: &Config,
    today: NaiveDate,
    load: F,
) -> RenderedPage
where
    F: FnOnce(&'static AssetProfile) -> Fut,
    Fut: Future<Output = AssetMarketData>,
{
    let page = match resolve(registry, requested) {
        PageRoute::Landing => return RenderedPage::ok(dashboard::landing_page(registry)),
        PageRoute::Unknown(name) => {
            log::info!("unknown page requested: {name}");
            let message = format!("Unable to load page '{name}': no such asset.");
            return RenderedPage {
                status: 404,
                html: dashboard::error_page(registry, &message),
            };
        }
        PageRoute::Asset(page) => *page,
    };

    let profile = page.profile;
    let data = load(profile).await;
    let ctx = PageContext {
        profile,
        data: &data,
        prediction_url: config.prediction_url(profile.id),
        today,
        vs_currency: &config.vs_currency,
        history_days: config.history_days,
    };

    match (page.render)(&ctx) {
        Ok(html) => RenderedPage::ok(html),
        Err(e) => {
            log::error!("rendering {} failed: {e}", profile.id);
            let message = format!("Unable to load page '{}': {e}", profile.name);
            RenderedPage {
                status: 500,
                html: dashboard::error_page(registry, &message),
            }
        }
    }
}

/// Parsed `/api/market` parameters
#[derive(Debug, Clone, Copy)]
pub struct MarketQuery<'a> {
    pub page: &'a AssetPage,
    pub kind: QueryKind,
    /// History window; `None` means the configured default
    pub days: Option<u32>,
}

/// `?asset=<id>&query=<metadata|price|ohlc|chart>&days=<n>`
pub fn parse_market_query<'a>(registry: &'a AssetRegistry, url: &Url) -> Result<MarketQuery<'a>> {
    let name = page_param(url)
        .ok_or_else(|| DashboardError::BadRequest("missing 'asset' parameter".to_string()))?;
    let page = registry
        .resolve(&name)
        .ok_or(DashboardError::UnknownAsset(name))?;

    let kind = match query_value(url, "query") {
        Some(query) => query.parse()?,
        None => QueryKind::LivePrice,
    };

    let days = query_value(url, "days")
        .map(|raw| {
            raw.parse::<u32>()
                .ok()
                .filter(|days| (1..=MAX_HISTORY_DAYS).contains(days))
                .ok_or_else(|| {
                    DashboardError::BadRequest(format!(
                        "'days' must be between 1 and {MAX_HISTORY_DAYS}, got '{raw}'"
                    ))
                })
        })
        .transpose()?;

    Ok(MarketQuery { page, kind, days })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TRACKED_ASSETS;
    use crate::types::FetchOutcome;
    use std::cell::Cell;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 3).unwrap()
    }

    fn empty_data() -> AssetMarketData {
        AssetMarketData {
            live: FetchOutcome::Unavailable,
            ohlc: FetchOutcome::Unavailable,
            market_chart: FetchOutcome::Unavailable,
            metadata: FetchOutcome::Unavailable,
        }
    }

    #[test]
    fn test_page_param() {
        assert_eq!(page_param(&url("https://portal.test/?asset=solana")).as_deref(), Some("solana"));
        assert_eq!(
            page_param(&url("https://portal.test/?student=student_paul")).as_deref(),
            Some("student_paul")
        );
        assert_eq!(
            page_param(&url("https://portal.test/?asset=xrp&student=student_paul")).as_deref(),
            Some("xrp")
        );
        assert!(page_param(&url("https://portal.test/")).is_none());
        assert!(page_param(&url("https://portal.test/?asset=")).is_none());
    }

    #[test]
    fn test_resolve_routes() {
        let registry = AssetRegistry::with_tracked_assets();
        assert!(matches!(resolve(&registry, None), PageRoute::Landing));
        assert!(matches!(
            resolve(&registry, Some("student_nidhi")),
            PageRoute::Asset(page) if page.profile.id == "solana"
        ));
        assert!(matches!(resolve(&registry, Some("doge")), PageRoute::Unknown(name) if name == "doge"));
    }

    #[tokio::test]
    async fn test_dispatch_landing_does_not_load() {
        let registry = AssetRegistry::with_tracked_assets();
        let loaded = Cell::new(false);

        let page = dispatch(&registry, None, &Config::default(), today(), |_| {
            loaded.set(true);
            async { empty_data() }
        })
        .await;

        assert_eq!(page.status, 200);
        assert!(page.html.contains(r#"href="?asset=ethereum""#));
        assert!(!loaded.get());
    }

    #[tokio::test]
    async fn test_dispatch_unknown_asset() {
        let registry = AssetRegistry::with_tracked_assets();
        let page = dispatch(&registry, Some("dogecoin"), &Config::default(), today(), |_| async {
            empty_data()
        })
        .await;

        assert_eq!(page.status, 404);
        assert!(page.html.contains("Unable to load page &#x27;dogecoin&#x27;"));
    }

    #[tokio::test]
    async fn test_dispatch_asset_page() {
        let registry = AssetRegistry::with_tracked_assets();
        let page = dispatch(&registry, Some("student_twinkle"), &Config::default(), today(), |profile| {
            assert_eq!(profile.coin_id, "ethereum");
            async { empty_data() }
        })
        .await;

        assert_eq!(page.status, 200);
        assert!(page.html.contains("Ethereum Next-Day High Price Prediction"));
        assert!(page.html.contains("/predict/ethereum?date=2025-11-03"));
    }

    #[tokio::test]
    async fn test_dispatch_render_failure_is_inline_error() {
        fn failing(_: &PageContext<'_>) -> Result<String> {
            Err(DashboardError::Shape("broken widget".to_string()))
        }

        let mut registry = AssetRegistry::with_tracked_assets();
        registry.register(&TRACKED_ASSETS[3], failing);

        let page = dispatch(&registry, Some("bitcoin"), &Config::default(), today(), |_| async {
            empty_data()
        })
        .await;

        assert_eq!(page.status, 500);
        assert!(page.html.contains("Unable to load page &#x27;Bitcoin&#x27;"));
        assert!(page.html.contains("broken widget"));
    }

    #[test]
    fn test_parse_market_query() {
        let registry = AssetRegistry::with_tracked_assets();

        let query = parse_market_query(
            &registry,
            &url("https://portal.test/api/market?asset=xrp&query=ohlc&days=30"),
        )
        .unwrap();
        assert_eq!(query.page.profile.coin_id, "ripple");
        assert_eq!(query.kind, QueryKind::Ohlc);
        assert_eq!(query.days, Some(30));

        let query = parse_market_query(&registry, &url("https://portal.test/api/market?asset=bitcoin")).unwrap();
        assert_eq!(query.kind, QueryKind::LivePrice);
        assert!(query.days.is_none());
    }

    #[test]
    fn test_parse_market_query_errors() {
        let registry = AssetRegistry::with_tracked_assets();
        let parse = |s: &str| parse_market_query(&registry, &url(s)).map(|q| q.kind);

        assert!(matches!(
            parse("https://portal.test/api/market"),
            Err(DashboardError::BadRequest(_))
        ));
        assert!(matches!(
            parse("https://portal.test/api/market?asset=doge"),
            Err(DashboardError::UnknownAsset(_))
        ));
        assert!(matches!(
            parse("https://portal.test/api/market?asset=solana&query=candles"),
            Err(DashboardError::BadRequest(_))
        ));
        assert!(matches!(
            parse("https://portal.test/api/market?asset=solana&query=ohlc&days=0"),
            Err(DashboardError::BadRequest(_))
        ));
        assert!(matches!(
            parse("https://portal.test/api/market?asset=solana&query=ohlc&days=ninety"),
            Err(DashboardError::BadRequest(_))
        ));
    }
}
