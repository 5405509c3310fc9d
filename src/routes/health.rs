use axum::{
    Router,
    routing::get,
};
use tracing::debug;

use crate::state::AppState;

// The frontend polls this to wake the backend before fetching charts.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health))
}

async fn health() -> &'static str {
    debug!("GET /health - Liveness probe");
    "OK"
}
