mod api_client;
mod config;
mod error;
mod export;
mod indicators;
mod models;
mod routes;
mod services;
mod state;

use axum::{routing::get, Router};
use config::Config;
use state::AppState;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    let addr = config.addr;
    tracing::info!("Using market data from {}", config.data_url);

    let state = AppState::new(config)?;

    let api_routes = Router::new()
        .route("/health", get(routes::health::get_health))
        .route("/analysis", get(routes::analysis::get_analysis))
        .route("/analysis/export", get(routes::analysis::get_export));

    let app = Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
