//! In-memory upstreams for handler and service tests, plus a loopback
//! server for exercising the real HTTP clients.

use std::sync::Mutex;

use async_trait::async_trait;
use axum::Router;
use serde_json::Value;
use tokio::net::TcpListener;
use url::Url;

use crate::external::price_provider::{PriceAggregatesProvider, UpstreamError};
use crate::external::trends_provider::TrendsProvider;
use crate::models::{DateRange, InterestPoint};

pub struct FakePriceProvider {
    result: Result<Value, UpstreamError>,
    calls: Mutex<Vec<(String, DateRange)>>,
}

impl FakePriceProvider {
    pub fn returning(payload: Value) -> Self {
        Self { result: Ok(payload), calls: Mutex::new(Vec::new()) }
    }

    pub fn failing(err: UpstreamError) -> Self {
        Self { result: Err(err), calls: Mutex::new(Vec::new()) }
    }

    pub fn calls(&self) -> Vec<(String, DateRange)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PriceAggregatesProvider for FakePriceProvider {
    async fn fetch_daily_aggregates(
        &self,
        ticker: &str,
        range: &DateRange,
    ) -> Result<Value, UpstreamError> {
        self.calls.lock().unwrap().push((ticker.to_string(), *range));
        self.result.clone()
    }
}

pub struct FakeTrendsProvider {
    result: Result<Vec<InterestPoint>, UpstreamError>,
    calls: Mutex<Vec<(String, DateRange)>>,
}

impl FakeTrendsProvider {
    pub fn returning(points: Vec<InterestPoint>) -> Self {
        Self { result: Ok(points), calls: Mutex::new(Vec::new()) }
    }

    pub fn failing(err: UpstreamError) -> Self {
        Self { result: Err(err), calls: Mutex::new(Vec::new()) }
    }

    pub fn calls(&self) -> Vec<(String, DateRange)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TrendsProvider for FakeTrendsProvider {
    async fn interest_over_time(
        &self,
        keyword: &str,
        range: &DateRange,
    ) -> Result<Vec<InterestPoint>, UpstreamError> {
        self.calls.lock().unwrap().push((keyword.to_string(), *range));
        self.result.clone()
    }
}

/// Serves `router` on an ephemeral loopback port and returns its base URL.
/// The server task lives until the test runtime shuts down.
pub async fn serve_upstream(router: Router) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Url::parse(&format!("http://{}/", addr)).unwrap()
}
