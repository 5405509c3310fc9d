use tracing::{error, info};

use crate::errors::TrendsError;
use crate::external::trends_provider::TrendsProvider;
use crate::models::{to_interest_series, DateRange, Ticker, TrendsResponse};

/// Interest over time for `"<TICKER> stock"`.
///
/// An empty ticker is not rejected; the keyword then degenerates to `" stock"`.
pub async fn get_google_trends(
    provider: &dyn TrendsProvider,
    ticker: Ticker,
    range: &DateRange,
) -> Result<TrendsResponse, TrendsError> {
    info!(
        "Fetching Google Trends for {} from {} to {}",
        ticker.as_str(),
        range.start_param(),
        range.end_param()
    );

    let points = provider
        .interest_over_time(&ticker.search_term(), range)
        .await
        .map_err(|e| {
            error!("Google Trends request failed for {}: {}", ticker.as_str(), e);
            TrendsError::from(e)
        })?;

    if points.is_empty() {
        return Err(TrendsError::EmptySeries);
    }

    Ok(TrendsResponse {
        trends: to_interest_series(&points),
        ticker: ticker.into_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::price_provider::UpstreamError;
    use crate::models::InterestPoint;
    use crate::testing::FakeTrendsProvider;
    use chrono::NaiveDate;

    fn range() -> DateRange {
        DateRange::trailing(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap())
    }

    fn points() -> Vec<InterestPoint> {
        vec![
            InterestPoint { date: NaiveDate::from_ymd_opt(2024, 6, 9).unwrap(), value: 61.0 },
            InterestPoint { date: NaiveDate::from_ymd_opt(2024, 6, 16).unwrap(), value: 99.6 },
            InterestPoint { date: NaiveDate::from_ymd_opt(2024, 6, 23).unwrap(), value: 74.0 },
        ]
    }

    #[tokio::test]
    async fn test_search_term_and_window() {
        let provider = FakeTrendsProvider::returning(points());

        get_google_trends(&provider, Ticker::normalize(Some("nvda")), &range())
            .await
            .unwrap();

        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "NVDA stock");
        assert_eq!(calls[0].1, range());
    }

    #[tokio::test]
    async fn test_empty_ticker_still_queries() {
        let provider = FakeTrendsProvider::returning(points());

        let response = get_google_trends(&provider, Ticker::normalize(None), &range())
            .await
            .unwrap();

        assert_eq!(provider.calls()[0].0, " stock");
        assert_eq!(response.ticker, "");
    }

    #[tokio::test]
    async fn test_series_is_reshaped() {
        let provider = FakeTrendsProvider::returning(points());

        let response = get_google_trends(&provider, Ticker::normalize(Some("nvda")), &range())
            .await
            .unwrap();

        assert_eq!(response.ticker, "NVDA");
        assert_eq!(response.trends.len(), 3);
        assert_eq!(response.trends["2024-06-09"], 61);
        assert_eq!(response.trends["2024-06-16"], 99);
        assert_eq!(response.trends["2024-06-23"], 74);
    }

    #[tokio::test]
    async fn test_empty_series() {
        let provider = FakeTrendsProvider::returning(Vec::new());

        let err = get_google_trends(&provider, Ticker::normalize(Some("nvda")), &range())
            .await
            .unwrap_err();

        assert!(matches!(err, TrendsError::EmptySeries));
    }

    #[tokio::test]
    async fn test_upstream_failure() {
        let provider = FakeTrendsProvider::failing(UpstreamError::TooManyRequests);

        let err = get_google_trends(&provider, Ticker::normalize(Some("nvda")), &range())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Google Trends request failed: too many requests");
    }
}
