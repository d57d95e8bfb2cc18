//! Route Configuration
//!
//! Configures the WebSocket endpoint, health probes, metrics and the
//! internal API.

use axum::{
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Router,
};

use super::handlers;
use crate::infrastructure::metrics;
use crate::presentation::middleware::internal_auth_middleware;
use crate::presentation::websocket::ws_handler;
use crate::startup::AppState;

/// Create the main router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // WebSocket endpoint, authenticated from the `jwt` cookie
        .route("/socket", get(ws_handler))
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler))
        .nest("/internal", internal_routes(state.clone()))
        .with_state(state)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    let metrics = metrics::gather_metrics();
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        metrics,
    )
}

/// Internal routes (require the internal API key)
fn internal_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/events", post(handlers::internal::emit_event))
        .route("/messages", post(handlers::internal::send_message))
        .route("/presence", get(handlers::internal::presence))
        .route_layer(middleware::from_fn_with_state(state, internal_auth_middleware))
}
