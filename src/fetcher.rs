//! Resilient fetcher
//!
//! One JSON GET with retry, jittered backoff and a capped in-isolate memo.
//! When every attempt fails the memo's last live response is served as
//! stale, then the bundled snapshot. Upstream failures never escape: the
//! caller always gets a [`FetchOutcome`], at worst [`FetchOutcome::Unavailable`].

use std::sync::Arc;
use std::time::Duration;

use crate::cache::ResponseMemo;
use crate::snapshot::SnapshotStore;
use crate::transport::{Sleeper, Transport};
use crate::types::{FetchOutcome, FetchRequest};

/// Lower bound of the random part of each backoff, in seconds
pub const JITTER_MIN_SECS: f64 = 0.3;
/// Upper bound (exclusive) of the random part of each backoff, in seconds
pub const JITTER_MAX_SECS: f64 = 1.0;

/// How hard to try before falling back
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    attempts: u32,
    base_delay: Duration,
    timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(2), Duration::from_secs(20))
    }
}

impl RetryPolicy {
    /// `attempts` is clamped to at least one
    pub fn new(attempts: u32, base_delay: Duration, timeout: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            base_delay,
            timeout,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Per-attempt timeout enforced by the transport
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Wait before the next attempt for a jitter sample `unit` in `[0, 1)`
    pub fn backoff(&self, unit: f64) -> Duration {
        let unit = if unit.is_finite() { unit.clamp(0.0, 1.0) } else { 0.5 };
        let jitter = JITTER_MIN_SECS + (JITTER_MAX_SECS - JITTER_MIN_SECS) * unit;
        self.base_delay + Duration::from_secs_f64(jitter)
    }
}

/// Uniform sample in `[0, 1)`
fn jitter_unit() -> f64 {
    match getrandom::u32() {
        Ok(n) => f64::from(n) / (f64::from(u32::MAX) + 1.0),
        Err(_) => 0.5,
    }
}

/// Retrying JSON fetcher with snapshot fallback
pub struct ResilientFetcher<T, S> {
    transport: T,
    sleeper: S,
    snapshots: SnapshotStore,
    memo: Arc<ResponseMemo>,
    policy: RetryPolicy,
}

impl<T: Transport, S: Sleeper> ResilientFetcher<T, S> {
    pub fn new(
        transport: T,
        sleeper: S,
        snapshots: SnapshotStore,
        memo: Arc<ResponseMemo>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            sleeper,
            snapshots,
            memo,
            policy,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Memoized fetch: a previous live response for the same request is
    /// returned without touching the network
    pub async fn fetch(&self, request: &FetchRequest) -> FetchOutcome {
        if let Some(hit) = self.memo.get(&request.cache_key()) {
            log::debug!("memo hit for {}", request.cache_key());
            return FetchOutcome::Live(hit);
        }
        self.fetch_fresh(request).await
    }

    /// Always goes to the network; a live result still refreshes the memo
    pub async fn fetch_fresh(&self, request: &FetchRequest) -> FetchOutcome {
        let attempts = self.policy.attempts();

        for attempt in 1..=attempts {
            match self.transport.get_json(request).await {
                Ok(value) => {
                    let value = Arc::new(value);
                    self.memo.insert(request.cache_key(), Arc::clone(&value));
                    return FetchOutcome::Live(value);
                }
                Err(e) => {
                    log::warn!(
                        "{} fetch attempt {attempt}/{attempts} failed for {}: {e}",
                        request.kind(),
                        request.url()
                    );
                    if attempt < attempts {
                        self.sleeper.sleep(self.policy.backoff(jitter_unit())).await;
                    }
                }
            }
        }

        self.fall_back(request)
    }

    /// Last live response first, then the bundled snapshot
    fn fall_back(&self, request: &FetchRequest) -> FetchOutcome {
        if let Some(previous) = self.memo.get(&request.cache_key()) {
            log::warn!("{} upstream unavailable, serving last live response", request.kind());
            return FetchOutcome::Stale(previous);
        }

        match self.snapshots.load(request.kind()) {
            Some(snapshot) => {
                log::warn!("{} upstream unavailable, serving bundled snapshot", request.kind());
                FetchOutcome::Snapshot(snapshot)
            }
            None => {
                log::warn!("{} upstream unavailable and no snapshot to fall back on", request.kind());
                FetchOutcome::Unavailable
            }
        }
    }
}
