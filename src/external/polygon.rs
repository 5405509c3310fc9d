use crate::external::price_provider::{PriceAggregatesProvider, UpstreamError};
use crate::models::DateRange;
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.polygon.io";

pub struct PolygonProvider {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl PolygonProvider {
    pub fn new(client: reqwest::Client, base_url: Url, api_key: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }

    /// `/v2/aggs/ticker/{ticker}/range/1/day/{start}/{end}?apiKey=...`
    ///
    /// The ticker is pushed as a single path segment, so reserved characters
    /// are percent-encoded rather than altering the path.
    pub fn aggregates_url(&self, ticker: &str, range: &DateRange) -> Result<Url, UpstreamError> {
        let start = range.start_param();
        let end = range.end_param();

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::InvalidRequest(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(["v2", "aggs", "ticker", ticker, "range", "1", "day", start.as_str(), end.as_str()]);
        url.query_pairs_mut().append_pair("apiKey", &self.api_key);

        Ok(url)
    }
}

#[async_trait]
impl PriceAggregatesProvider for PolygonProvider {
    async fn fetch_daily_aggregates(
        &self,
        ticker: &str,
        range: &DateRange,
    ) -> Result<Value, UpstreamError> {
        let url = self.aggregates_url(ticker, range)?;

        // Never log the URL itself, it carries the API key.
        debug!("Requesting Polygon aggregates for {} ({} to {})", ticker, range.start, range.end);

        // Polygon reports errors as JSON bodies; the status code is left to the caller's
        // emptiness check rather than inspected here.
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(UpstreamError::from_reqwest)?;

        resp.json::<Value>()
            .await
            .map_err(|e| UpstreamError::Parse(e.to_string()))
    }
}
