use crate::config::TrendsSettings;
use crate::external::price_provider::UpstreamError;
use crate::external::trends_provider::TrendsProvider;
use crate::models::{DateRange, InterestPoint};
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://trends.google.com";

// Google prefixes its JSON bodies with `)]}'` (explore) or `)]}',` (widget data).
const EXPLORE_PREFIX_LEN: usize = 4;
const WIDGET_DATA_PREFIX_LEN: usize = 5;

const TIMESERIES_WIDGET_ID: &str = "TIMESERIES";

/// Client for the Google Trends web API.
///
/// Google Trends has no public REST surface. Each lookup is three requests
/// sharing a cookie jar:
/// 1. a one-time `GET /?geo=..` that hands out the `NID` session cookie
/// 2. `POST /trends/api/explore`, which returns widget tokens for the query
/// 3. `GET /trends/api/widgetdata/multiline` with the `TIMESERIES` token
pub struct GoogleTrendsClient {
    client: reqwest::Client,
    settings: TrendsSettings,
    session: OnceCell<()>,
}

impl GoogleTrendsClient {
    pub fn new(settings: TrendsSettings, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (compatible; stockchart/0.1)")
            .build()?;

        Ok(Self {
            client,
            settings,
            session: OnceCell::new(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, UpstreamError> {
        let mut url = self.settings.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::InvalidRequest(format!("{} cannot be a base URL", self.settings.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Fetches the session cookie once. Only a 2xx answer is remembered; any
    /// other outcome is retried on the next lookup.
    async fn ensure_session(&self) -> Result<(), UpstreamError> {
        self.session
            .get_or_try_init(|| async {
                let resp = self
                    .client
                    .get(self.settings.base_url.clone())
                    .query(&[("geo", self.settings.region())])
                    .send()
                    .await
                    .map_err(UpstreamError::from_reqwest)?;

                let status = resp.status();
                if status == StatusCode::TOO_MANY_REQUESTS {
                    return Err(UpstreamError::TooManyRequests);
                }
                if !status.is_success() {
                    return Err(UpstreamError::BadResponse(format!("session request returned HTTP {}", status)));
                }

                info!("Google Trends session established");
                Ok::<(), UpstreamError>(())
            })
            .await
            .map(|_| ())
    }

    async fn fetch_timeseries_widget(
        &self,
        keyword: &str,
        range: &DateRange,
    ) -> Result<TimeseriesWidget, UpstreamError> {
        let url = self.endpoint(&["trends", "api", "explore"])?;
        let req = explore_request(&self.settings, keyword, range).to_string();
        let tz = self.settings.tz.to_string();

        let resp = self
            .client
            .post(url)
            .query(&[("hl", self.settings.hl.as_str()), ("tz", tz.as_str()), ("req", req.as_str())])
            .send()
            .await
            .map_err(UpstreamError::from_reqwest)?;

        let body = read_body(resp).await?;
        parse_explore(&body)
    }

    async fn fetch_timeline(&self, widget: &TimeseriesWidget) -> Result<Vec<InterestPoint>, UpstreamError> {
        let url = self.endpoint(&["trends", "api", "widgetdata", "multiline"])?;
        let req = widget.request.to_string();
        let tz = self.settings.tz.to_string();

        let resp = self
            .client
            .get(url)
            .query(&[("req", req.as_str()), ("token", widget.token.as_str()), ("tz", tz.as_str())])
            .send()
            .await
            .map_err(UpstreamError::from_reqwest)?;

        let body = read_body(resp).await?;
        parse_multiline(&body)
    }
}

#[async_trait]
impl TrendsProvider for GoogleTrendsClient {
    async fn interest_over_time(
        &self,
        keyword: &str,
        range: &DateRange,
    ) -> Result<Vec<InterestPoint>, UpstreamError> {
        self.ensure_session().await?;

        let widget = self.fetch_timeseries_widget(keyword, range).await?;
        debug!("Resolved TIMESERIES widget for '{}'", keyword);

        let points = self.fetch_timeline(&widget).await?;
        if points.is_empty() {
            warn!("Google Trends returned an empty timeline for '{}'", keyword);
        }
        Ok(points)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct TimeseriesWidget {
    token: String,
    request: Value,
}

#[derive(Debug, Deserialize)]
struct ExploreResponse {
    widgets: Vec<ExploreWidget>,
}

#[derive(Debug, Deserialize)]
struct ExploreWidget {
    id: String,
    token: Option<String>,
    request: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct MultilineResponse {
    default: MultilineDefault,
}

#[derive(Debug, Deserialize)]
struct MultilineDefault {
    #[serde(rename = "timelineData", default)]
    timeline_data: Vec<TimelinePoint>,
}

#[derive(Debug, Deserialize)]
struct TimelinePoint {
    // Unix seconds, sent as a string
    time: String,
    value: Vec<f64>,
}

fn explore_request(settings: &TrendsSettings, keyword: &str, range: &DateRange) -> Value {
    json!({
        "comparisonItem": [{
            "keyword": keyword,
            "time": range.timeframe(),
            "geo": settings.geo,
        }],
        "category": 0,
        "property": settings.property,
    })
}

async fn read_body(resp: reqwest::Response) -> Result<String, UpstreamError> {
    let status = resp.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(UpstreamError::TooManyRequests);
    }
    if !status.is_success() {
        return Err(UpstreamError::BadResponse(format!("HTTP {}", status)));
    }

    resp.text().await.map_err(UpstreamError::from_reqwest)
}

fn strip_json_prefix(body: &str, chars: usize) -> &str {
    match body.char_indices().nth(chars) {
        Some((idx, _)) => &body[idx..],
        None => "",
    }
}

fn parse_explore(body: &str) -> Result<TimeseriesWidget, UpstreamError> {
    let explore: ExploreResponse = serde_json::from_str(strip_json_prefix(body, EXPLORE_PREFIX_LEN))
        .map_err(|e| UpstreamError::Parse(e.to_string()))?;

    let widget = explore
        .widgets
        .into_iter()
        .find(|w| w.id == TIMESERIES_WIDGET_ID)
        .ok_or_else(|| UpstreamError::BadResponse("explore response has no TIMESERIES widget".into()))?;

    match (widget.token, widget.request) {
        (Some(token), Some(request)) => Ok(TimeseriesWidget { token, request }),
        _ => Err(UpstreamError::BadResponse("TIMESERIES widget is missing its token".into())),
    }
}

fn parse_multiline(body: &str) -> Result<Vec<InterestPoint>, UpstreamError> {
    let data: MultilineResponse = serde_json::from_str(strip_json_prefix(body, WIDGET_DATA_PREFIX_LEN))
        .map_err(|e| UpstreamError::Parse(e.to_string()))?;

    data.default
        .timeline_data
        .into_iter()
        .map(|p| -> Result<InterestPoint, UpstreamError> {
            let secs = p
                .time
                .parse::<i64>()
                .map_err(|e| UpstreamError::Parse(format!("bad timestamp '{}': {}", p.time, e)))?;
            let date = DateTime::from_timestamp(secs, 0)
                .ok_or_else(|| UpstreamError::Parse(format!("timestamp out of range: {}", secs)))?
                .date_naive();
            let value = p
                .value
                .first()
                .copied()
                .ok_or_else(|| UpstreamError::Parse(format!("no value for timestamp {}", secs)))?;

            Ok(InterestPoint { date, value })
        })
        .collect()
}
