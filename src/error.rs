//! Error types for the forecast portal
//!
//! Uses thiserror for ergonomic error definitions.
//! Upstream failures never escape the fetch boundary; these errors describe
//! what went wrong on a single attempt or at a single widget.

use thiserror::Error;

/// Custom Result type using our Error
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Portal errors
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport-level HTTP errors (DNS, TLS, connection reset)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Upstream answered with a non-success status
    #[error("Upstream returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Upstream did not answer in time
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Payload parsed but did not have the expected structure
    #[error("Unexpected data shape: {0}")]
    Shape(String),

    /// No page registered under this identifier
    #[error("Unknown asset: {0}")]
    UnknownAsset(String),

    /// Malformed API query parameters
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Worker runtime errors
    #[error("Worker error: {0}")]
    Worker(String),
}

impl DashboardError {
    /// HTTP status used when this error is answered directly
    pub fn status_code(&self) -> u16 {
        match self {
            DashboardError::UnknownAsset(_) => 404,
            DashboardError::BadRequest(_) => 400,
            DashboardError::Status { .. } | DashboardError::Http(_) | DashboardError::Timeout(_) => 502,
            _ => 500,
        }
    }
}

impl From<worker::Error> for DashboardError {
    fn from(err: worker::Error) -> Self {
        DashboardError::Worker(err.to_string())
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        DashboardError::Http(err.to_string())
    }
}

impl From<DashboardError> for worker::Error {
    fn from(err: DashboardError) -> Self {
        worker::Error::RustError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DashboardError::Status {
            status: 429,
            body: "rate limited".to_string(),
        };
        assert_eq!(err.to_string(), "Upstream returned HTTP 429: rate limited");
    }

    #[test]
    fn test_error_conversion() {
        let json_err = serde_json::from_str::<i32>("invalid").unwrap_err();
        let err: DashboardError = json_err.into();
        assert!(matches!(err, DashboardError::Json(_)));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(DashboardError::UnknownAsset("doge".into()).status_code(), 404);
        assert_eq!(DashboardError::BadRequest("days".into()).status_code(), 400);
        assert_eq!(DashboardError::Timeout(20).status_code(), 502);
        assert_eq!(DashboardError::Config("x".into()).status_code(), 500);
    }
}
