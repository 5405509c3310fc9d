use axum::extract::{RawQuery, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::models::{DateRange, Ticker};
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_stock_prices))
}

pub async fn get_stock_prices(
    RawQuery(query): RawQuery,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let ticker = Ticker::from_query(query.as_deref());
    info!("GET /api/stock_prices?ticker={} - Getting daily aggregates", ticker.as_str());

    let range = DateRange::ending_local_today();
    let payload = services::price_service::get_stock_prices(
        state.price_provider.as_ref(),
        &ticker,
        &range,
    ).await?;
    Ok(Json(payload))
}
