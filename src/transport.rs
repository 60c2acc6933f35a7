//! Upstream I/O seams
//!
//! The fetcher only talks to the outside world through [`Transport`] (one
//! JSON GET) and [`Sleeper`] (backoff waits). The Workers implementations
//! live here; tests supply scripted ones.

use std::time::Duration;

use futures::future::{Either, select};
use serde_json::Value;

use crate::error::{DashboardError, Result};
use crate::types::FetchRequest;

/// Issues a single GET and parses the JSON body
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn get_json(&self, request: &FetchRequest) -> Result<Value>;
}

/// Waits between retry attempts
#[allow(async_fn_in_trait)]
pub trait Sleeper {
    async fn sleep(&self, duration: Duration);
}

/// reqwest-backed transport with a per-attempt timeout
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }

    /// GET with the request's params encoded into the query string
    fn build(&self, request: &FetchRequest) -> reqwest::RequestBuilder {
        self.client
            .get(request.url())
            .query(request.params())
            .header("Accept", "application/json")
    }

    /// Check status and decode the body
    async fn handle_response(response: reqwest::Response) -> Result<Value> {
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".into());
            return Err(DashboardError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl Transport for HttpTransport {
    async fn get_json(&self, request: &FetchRequest) -> Result<Value> {
        let call = async {
            let response = self.build(request).send().await?;
            Self::handle_response(response).await
        };

        // No native request timeout on wasm, so race against a timer
        let deadline = worker::Delay::from(self.timeout);
        match select(Box::pin(call), Box::pin(deadline)).await {
            Either::Left((result, _)) => result,
            Either::Right(((), _)) => Err(DashboardError::Timeout(self.timeout.as_secs())),
        }
    }
}

/// Backoff sleeps on the Workers timer
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkerSleeper;

impl Sleeper for WorkerSleeper {
    async fn sleep(&self, duration: Duration) {
        worker::Delay::from(duration).await;
    }
}
