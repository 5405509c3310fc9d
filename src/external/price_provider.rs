use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::models::DateRange;

#[derive(Debug, Clone, Error)]
pub enum UpstreamError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("too many requests")]
    TooManyRequests,
}

impl UpstreamError {
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout(err.to_string())
        } else if err.is_decode() {
            UpstreamError::Parse(err.to_string())
        } else {
            UpstreamError::Network(err.to_string())
        }
    }
}

/// Source of daily OHLC aggregates for a ticker.
///
/// The payload is returned untouched so callers can pass it through verbatim.
#[async_trait]
pub trait PriceAggregatesProvider: Send + Sync {
    async fn fetch_daily_aggregates(
        &self,
        ticker: &str,
        range: &DateRange,
    ) -> Result<Value, UpstreamError>;
}
