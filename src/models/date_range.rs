use chrono::{Duration, Local, NaiveDate, Utc};

/// Length of the trailing window requested from both upstreams.
pub const LOOKBACK_DAYS: i64 = 180;

const DATE_FORMAT: &str = "%Y-%m-%d";

// Trailing window ending on `end`, always recomputed per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn trailing(end: NaiveDate) -> Self {
        Self {
            start: end - Duration::days(LOOKBACK_DAYS),
            end,
        }
    }

    /// Window ending on the server's local calendar date (price endpoint).
    pub fn ending_local_today() -> Self {
        Self::trailing(Local::now().date_naive())
    }

    /// Window ending on the current UTC date (trends endpoint).
    pub fn ending_utc_today() -> Self {
        Self::trailing(Utc::now().date_naive())
    }

    pub fn start_param(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    pub fn end_param(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }

    /// `"<start> <end>"`, the timeframe syntax Google Trends expects.
    pub fn timeframe(&self) -> String {
        format!("{} {}", self.start_param(), self.end_param())
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
