//! Macadamia advisory API: pest-risk and chat HTTP server.
//!
//! Usage: `mb-api [config.toml]`. Environment variables override the file.

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use mb_api::config::ApiConfig;
use mb_api::routes;
use mb_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "mb-api starting");

    let config = match std::env::args().nth(1) {
        Some(path) => ApiConfig::from_file(&path)?,
        None => ApiConfig::default(),
    }
    .apply_env();

    let state = AppState::from_config(&config.engine);
    if !state.engine.has_model() {
        tracing::warn!(
            model_dir = %config.engine.model_dir.display(),
            "no trained model loaded, serving rule-based assessments"
        );
    }

    let app = routes::build_router_with_cors(state, routes::cors_layer(&config.cors_origins));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
