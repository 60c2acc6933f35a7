//! Test doubles for the I/O seams

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;

use crate::error::{DashboardError, Result};
use crate::transport::{Sleeper, Transport};
use crate::types::FetchRequest;

/// One scripted upstream answer
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Json(Value),
    Status(u16),
    Garbage,
}

/// Transport that plays back queued replies, then a default (or an error)
#[derive(Debug, Clone, Default)]
pub(crate) struct ScriptedTransport {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    default: Arc<Mutex<Option<Value>>>,
    calls: Arc<AtomicUsize>,
    urls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(self, reply: Reply) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    /// Answer every unscripted call with `value`
    pub(crate) fn always(self, value: Value) -> Self {
        *self.default.lock().unwrap() = Some(value);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `url?canonical-query` of every call, in order
    pub(crate) fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    async fn get_json(&self, request: &FetchRequest) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls
            .lock()
            .unwrap()
            .push(format!("{}?{}", request.url(), request.canonical_query()));

        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some(Reply::Json(value)) => Ok(value),
            Some(Reply::Status(status)) => Err(DashboardError::Status {
                status,
                body: "scripted failure".to_string(),
            }),
            Some(Reply::Garbage) => Ok(serde_json::from_str("<html>")?),
            None => self
                .default
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| DashboardError::Http("connection refused".to_string())),
        }
    }
}

/// Sleeper that returns immediately and remembers what it was asked
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingSleeper {
    sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub(crate) fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}
