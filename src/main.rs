mod app;
mod config;
mod errors;
mod external;
mod logging;
mod models;
mod routes;
mod services;
mod state;
#[cfg(test)]
mod testing;

use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::external::google_trends::GoogleTrendsClient;
use crate::external::polygon::PolygonProvider;
use crate::logging::LoggingConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    logging::init_logging(LoggingConfig::from_env())?;

    // Refuse to start without the Polygon key
    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("❌ Invalid configuration: {}", e);
        e
    })?;
    tracing::debug!("Loaded configuration: {:?}", config);

    let polygon_client = reqwest::Client::builder()
        .timeout(config.upstream_timeout)
        .build()?;
    let price_provider = PolygonProvider::new(
        polygon_client,
        config.polygon_base_url.clone(),
        config.polygon_api_key.clone(),
    );
    let trends_provider = GoogleTrendsClient::new(config.trends.clone(), config.upstream_timeout)?;

    let state = AppState {
        price_provider: Arc::new(price_provider),
        trends_provider: Arc::new(trends_provider),
    };
    let app = app::create_app(state);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Stockchart backend running at http://{}/", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
