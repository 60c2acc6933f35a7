//! In-isolate caches
//!
//! Two tiers sit in front of the network:
//! - [`TtlCache`]: per-endpoint expiry, consulted first by the endpoint layer
//! - [`ResponseMemo`]: capped memo of live responses inside the fetcher
//!
//! Both are explicit objects shared through `Arc`, bounded by entry count with
//! LRU eviction. Values are immutable and replaced wholesale, so a plain
//! mutex is enough. Locks are never held across an await.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use lru::LruCache;
use serde_json::Value;

use crate::types::{CacheKey, FetchOutcome};

/// Source of "now" for expiry decisions
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

fn capacity(entries: usize) -> NonZeroUsize {
    NonZeroUsize::new(entries).unwrap_or(NonZeroUsize::MIN)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Memo of successful live responses keyed by request
pub struct ResponseMemo {
    entries: Mutex<LruCache<CacheKey, Arc<Value>>>,
}

impl ResponseMemo {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity(max_entries))),
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<Arc<Value>> {
        lock(&self.entries).get(key).cloned()
    }

    pub fn insert(&self, key: CacheKey, value: Arc<Value>) {
        lock(&self.entries).put(key, value);
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A stored outcome and when it stops being fresh
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: FetchOutcome,
    pub inserted_at: DateTime<Utc>,
    pub ttl: TimeDelta,
}

impl CacheEntry {
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.inserted_at) < self.ttl
    }
}

/// Time-based cache of fetch outcomes
pub struct TtlCache<C = SystemClock> {
    entries: Mutex<LruCache<CacheKey, CacheEntry>>,
    clock: C,
}

impl TtlCache<SystemClock> {
    pub fn new(max_entries: usize) -> Self {
        Self::with_clock(max_entries, SystemClock)
    }
}

impl<C: Clock> TtlCache<C> {
    pub fn with_clock(max_entries: usize, clock: C) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity(max_entries))),
            clock,
        }
    }

    /// Fresh value for `key`; stale entries stay until overwritten
    pub fn get(&self, key: &CacheKey) -> Option<FetchOutcome> {
        let now = self.clock.now();
        lock(&self.entries)
            .get(key)
            .filter(|entry| entry.is_fresh(now))
            .map(|entry| entry.value.clone())
    }

    /// Store `value` stamped with the current time
    pub fn insert(&self, key: CacheKey, value: FetchOutcome, ttl: Duration) {
        let entry = CacheEntry {
            value,
            inserted_at: self.clock.now(),
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
        };
        lock(&self.entries).put(key, entry);
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Hand-driven clock shared between a test and the cache under test
#[cfg(test)]
#[derive(Debug, Clone)]
pub(crate) struct ManualClock(Arc<Mutex<DateTime<Utc>>>);

#[cfg(test)]
impl ManualClock {
    pub(crate) fn at(start: DateTime<Utc>) -> Self {
        Self(Arc::new(Mutex::new(start)))
    }

    pub(crate) fn advance(&self, by: Duration) {
        let mut now = lock(&self.0);
        *now += TimeDelta::from_std(by).expect("test duration fits");
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *lock(&self.0)
    }
}
