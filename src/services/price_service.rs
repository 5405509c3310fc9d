use serde_json::Value;
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::external::price_provider::PriceAggregatesProvider;
use crate::models::{DateRange, Ticker};

/// Daily aggregates for `ticker` over `range`, passed through verbatim.
///
/// Rejects an empty ticker before touching the upstream, and treats a payload
/// without a non-empty `results` field as "not found".
pub async fn get_stock_prices(
    provider: &dyn PriceAggregatesProvider,
    ticker: &Ticker,
    range: &DateRange,
) -> Result<Value, AppError> {
    if ticker.is_empty() {
        return Err(AppError::Validation("Ticker symbol is required".to_string()));
    }

    info!(
        "Fetching stock prices for {} from {} to {}",
        ticker.as_str(),
        range.start_param(),
        range.end_param()
    );

    let payload = provider
        .fetch_daily_aggregates(ticker.as_str(), range)
        .await
        .map_err(|e| {
            error!("Polygon request failed for {}: {}", ticker.as_str(), e);
            AppError::from(e)
        })?;

    if !has_results(&payload) {
        warn!("No stock data found for {}", ticker.as_str());
        return Err(AppError::NotFound("No stock data found".to_string()));
    }

    Ok(payload)
}

// Absent, null, false, zero and empty values all count as "no results".
fn has_results(payload: &Value) -> bool {
    match payload.get("results") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map_or(false, |v| v != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(fields)) => !fields.is_empty(),
    }
}
