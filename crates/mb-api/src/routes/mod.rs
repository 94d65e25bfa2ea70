//! API route definitions and router builder.

pub mod chat;
pub mod classify;
pub mod health;
pub mod history;
pub mod pest_risk;
pub mod pests;

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// CORS for the given origins; an empty list allows any origin.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}

/// Build the Axum router with all routes and permissive CORS.
pub fn build_router(state: AppState) -> Router {
    build_router_with_cors(state, cors_layer(&[]))
}

pub fn build_router_with_cors(state: AppState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/pest-risk", post(pest_risk::assess))
        .route("/chat", post(chat::chat))
        .route("/classify", post(classify::classify))
        // Knowledge base
        .route("/pests", get(pests::list_pests))
        .route("/pests/{id}", get(pests::get_pest))
        // Conversation history
        .route("/history", get(history::summary))
        .route("/history/entries", get(history::entries));

    Router::new()
        .route("/health", get(health::health))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}
