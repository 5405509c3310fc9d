use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::date_range::format_date;

// One point of an interest-over-time series as reported upstream.
#[derive(Debug, Clone, PartialEq)]
pub struct InterestPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Date (`YYYY-MM-DD`) to integer interest score, keyed in ascending order.
pub type InterestSeries = BTreeMap<String, i64>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendsResponse {
    pub ticker: String,
    pub trends: InterestSeries,
}

/// Scores are truncated toward zero; a repeated date keeps its last value.
pub fn to_interest_series(points: &[InterestPoint]) -> InterestSeries {
    points
        .iter()
        .map(|p| (format_date(p.date), p.value.trunc() as i64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(y: i32, m: u32, d: u32, value: f64) -> InterestPoint {
        InterestPoint {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            value,
        }
    }

    #[test]
    fn test_one_entry_per_date() {
        let series = to_interest_series(&[
            point(2024, 1, 7, 42.0),
            point(2024, 1, 14, 100.0),
            point(2024, 1, 21, 0.0),
        ]);

        assert_eq!(series.len(), 3);
        assert_eq!(series["2024-01-07"], 42);
        assert_eq!(series["2024-01-14"], 100);
        assert_eq!(series["2024-01-21"], 0);
    }

    #[test]
    fn test_fractional_scores_truncate() {
        let series = to_interest_series(&[point(2024, 2, 1, 57.9), point(2024, 2, 2, 0.4)]);

        assert_eq!(series["2024-02-01"], 57);
        assert_eq!(series["2024-02-02"], 0);
    }

    #[test]
    fn test_serializes_ticker_and_trends() {
        let response = TrendsResponse {
            ticker: "NVDA".to_string(),
            trends: to_interest_series(&[point(2024, 3, 3, 12.0)]),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "ticker": "NVDA", "trends": { "2024-03-03": 12 } })
        );
    }
}
