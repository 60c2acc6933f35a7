//! Forecast Portal Worker - AI crypto forecast dashboard for Cloudflare Workers
//!
//! Server-rendered portal with one page per tracked asset: an embedded
//! next-day high prediction, live CoinGecko market data, history charts and
//! project fundamentals.
//!
//! # Architecture
//! - Resilient fetcher: retry with jittered backoff, per-attempt timeout,
//!   bundled snapshot fallback, response memo
//! - Cached endpoint layer: per-query TTLs over a shared LRU cache
//! - Router: `?asset=` page selection plus a small JSON API
//!
//! # Routes
//! - `GET /` landing page, asset page or inline error
//! - `GET /health`
//! - `GET /api/assets`
//! - `GET /api/market?asset=&query=&days=`

// Clippy configuration for dashboard code patterns
#![allow(clippy::cast_precision_loss)] // Float casts OK for display
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)] // Page templates
#![allow(clippy::doc_markdown)] // Doc style flexibility
#![allow(clippy::needless_pass_by_value)] // Worker framework patterns
#![allow(clippy::map_unwrap_or)] // Explicit fallback preference

mod cache;
mod charts;
mod coingecko;
mod config;
mod dashboard;
mod endpoints;
mod error;
mod fetcher;
mod logging;
mod registry;
mod router;
mod snapshot;
#[cfg(test)]
mod testing;
mod transport;
mod types;

use std::sync::{Arc, OnceLock};

use chrono::Utc;
use uuid::Uuid;
use wasm_bindgen_futures::spawn_local;
use worker::{Context, Env, Request, Response, Router, event};

pub use cache::{Clock, ResponseMemo, SystemClock, TtlCache};
pub use charts::{CandlestickChart, LineChart, OhlcRow, SeriesPoint};
pub use coingecko::{CoinMetadata, LiveQuote};
pub use config::{Config, EndpointTtls};
pub use dashboard::{PageContext, RenderFn};
pub use endpoints::{AssetMarketData, MarketEndpoints};
pub use error::DashboardError;
pub use fetcher::{ResilientFetcher, RetryPolicy};
pub use registry::{AssetPage, AssetProfile, AssetRegistry, TRACKED_ASSETS};
pub use router::{MarketQuery, PageRoute, RenderedPage};
pub use snapshot::SnapshotStore;
pub use transport::{HttpTransport, Sleeper, Transport, WorkerSleeper};
pub use types::*;

/// Result type alias for worker operations
type WResult<T> = std::result::Result<T, worker::Error>;

type LiveEndpoints = MarketEndpoints<HttpTransport, WorkerSleeper>;

/// Per-isolate state shared by every request
struct SharedState {
    registry: AssetRegistry,
    memo: Arc<ResponseMemo>,
    cache: Arc<TtlCache>,
}

static SHARED: OnceLock<SharedState> = OnceLock::new();

/// Created from the first request's configuration
fn shared(config: &Config) -> &'static SharedState {
    SHARED.get_or_init(|| {
        log::info!(
            "initialising shared state: memo={} cache={}",
            config.memo_capacity,
            config.cache_capacity
        );
        SharedState {
            registry: AssetRegistry::with_tracked_assets(),
            memo: Arc::new(ResponseMemo::new(config.memo_capacity)),
            cache: Arc::new(TtlCache::new(config.cache_capacity)),
        }
    })
}

fn endpoints_for(state: &SharedState, config: &Config, coin_id: &str) -> LiveEndpoints {
    let policy = config.retry_policy();
    let fetcher = ResilientFetcher::new(
        HttpTransport::new(policy.timeout()),
        WorkerSleeper,
        SnapshotStore::for_coin(coin_id),
        Arc::clone(&state.memo),
        policy,
    );
    MarketEndpoints::new(fetcher, Arc::clone(&state.cache), config, coin_id)
}

fn json_error(err: &DashboardError) -> WResult<Response> {
    Response::from_json(&serde_json::json!({
        "error": err.to_string(),
    }))
    .map(|response| response.with_status(err.status_code()))
}

#[event(start)]
fn start() {
    console_error_panic_hook::set_once();
    logging::init("info");
}

/// Main Worker entry point
#[event(fetch)]
async fn fetch(req: Request, env: Env, _ctx: Context) -> WResult<Response> {
    Router::new()
        // Landing page, asset pages and inline errors
        .get_async("/", |req, ctx| async move {
            let config = match Config::from_env(&ctx.env) {
                Ok(c) => c,
                Err(e) => return Response::error(format!("Config error: {e}"), 500),
            };
            logging::init(&config.log_level);

            let request_id = Uuid::new_v4();
            let url = req.url()?;
            let requested = router::page_param(&url);
            log::info!(
                "[{request_id}] page request: {}",
                requested.as_deref().unwrap_or("landing")
            );

            let state = shared(&config);
            let today = Utc::now().date_naive();

            let page = router::dispatch(
                &state.registry,
                requested.as_deref(),
                &config,
                today,
                |profile| {
                    let warm = endpoints_for(state, &config, profile.coin_id);
                    spawn_local(async move { warm.warm_up().await });

                    let endpoints = endpoints_for(state, &config, profile.coin_id);
                    async move { endpoints.load_page_data().await }
                },
            )
            .await;

            log::info!("[{request_id}] rendered with status {}", page.status);
            Response::from_html(page.html).map(|response| response.with_status(page.status))
        })
        // Health check
        .get_async("/health", |_req, ctx| async move {
            let config = match Config::from_env(&ctx.env) {
                Ok(c) => c,
                Err(e) => return Response::error(format!("Config error: {e}"), 500),
            };

            Response::from_json(&HealthResponse {
                status: "healthy".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                environment: config.environment,
                timestamp: Utc::now().to_rfc3339(),
            })
        })
        // Registered assets
        .get_async("/api/assets", |_req, ctx| async move {
            let config = match Config::from_env(&ctx.env) {
                Ok(c) => c,
                Err(e) => return Response::error(format!("Config error: {e}"), 500),
            };
            let state = shared(&config);

            let assets: Vec<AssetSummary> = state
                .registry
                .pages()
                .iter()
                .map(|page| AssetSummary {
                    id: page.profile.id.to_string(),
                    coin_id: page.profile.coin_id.to_string(),
                    name: page.profile.name.to_string(),
                    symbol: page.profile.symbol.to_string(),
                    prediction_service: config.prediction_url(page.profile.id).is_some(),
                })
                .collect();
            Response::from_json(&assets)
        })
        // Cached endpoint results (raw data)
        .get_async("/api/market", |req, ctx| async move {
            let config = match Config::from_env(&ctx.env) {
                Ok(c) => c,
                Err(e) => return Response::error(format!("Config error: {e}"), 500),
            };
            logging::init(&config.log_level);

            let state = shared(&config);
            let url = req.url()?;
            let query = match router::parse_market_query(&state.registry, &url) {
                Ok(q) => q,
                Err(e) => return json_error(&e),
            };

            let profile = query.page.profile;
            let endpoints = endpoints_for(state, &config, profile.coin_id);
            let days = query.days.unwrap_or(config.history_days);
            let outcome = endpoints.query(query.kind, days).await;
            log::debug!("market query {} for {}: {}", query.kind, profile.id, outcome.source());

            Response::from_json(&MarketDataResponse {
                asset: profile.id,
                query: query.kind,
                source: outcome.source(),
                data: outcome.data(),
            })
        })
        .run(req, env)
        .await
}
