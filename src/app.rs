use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::routes::{google_trends, health, stock_prices};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    // Any origin may call any route.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api/stock_prices", stock_prices::router())
        .nest("/api/google_trends", google_trends::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
