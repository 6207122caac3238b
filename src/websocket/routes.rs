use crate::metrics::MetricsSnapshot;
use crate::protocol::PublicRoomEntry;
use crate::server::GameServer;
use axum::extract::State;
use axum::routing::get;
use axum::Json;
use std::sync::Arc;
use tower_http::services::ServeDir;

use super::handler::websocket_handler;

/// Create the Axum router: WebSocket endpoint, the public room list, and
/// static asset serving.
pub fn create_router(cors_origins: &str, static_dir: &str) -> axum::Router<Arc<GameServer>> {
    use tower_http::cors::{Any, CorsLayer};
    use tower_http::trace::TraceLayer;

    // Parse CORS origins
    let cors = if cors_origins == "*" {
        CorsLayer::permissive()
    } else {
        let origins: Vec<_> = cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse::<axum::http::HeaderValue>().ok())
            .collect();

        if origins.is_empty() {
            tracing::warn!("No valid CORS origins configured, using permissive CORS");
            CorsLayer::permissive()
        } else {
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    };

    axum::Router::new()
        .route("/ws", get(websocket_handler))
        .route("/api/rooms", get(list_rooms_handler))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .fallback_service(ServeDir::new(static_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// `GET /api/rooms` — joinable lobbies, as projected by the core.
async fn list_rooms_handler(
    State(server): State<Arc<GameServer>>,
) -> Json<Vec<PublicRoomEntry>> {
    Json(server.list_public_rooms().await)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// `GET /metrics` — counters as JSON.
async fn metrics_handler(State(server): State<Arc<GameServer>>) -> Json<MetricsSnapshot> {
    Json(server.metrics().snapshot())
}
