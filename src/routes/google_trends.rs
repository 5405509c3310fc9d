use axum::extract::{RawQuery, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::info;

use crate::errors::TrendsError;
use crate::models::{DateRange, Ticker, TrendsResponse};
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_google_trends))
}

pub async fn get_google_trends(
    RawQuery(query): RawQuery,
    State(state): State<AppState>,
) -> Result<Json<TrendsResponse>, TrendsError> {
    let ticker = Ticker::from_query(query.as_deref());
    info!("GET /api/google_trends?ticker={} - Getting search interest", ticker.as_str());

    let range = DateRange::ending_utc_today();
    let trends = services::trends_service::get_google_trends(
        state.trends_provider.as_ref(),
        ticker,
        &range,
    ).await?;
    Ok(Json(trends))
}
