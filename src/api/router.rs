use axum::{
    extract::Request,
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info_span;

use super::health;
use super::middleware::logging_middleware;
use super::prompt;
use super::state::AppState;
use crate::config::ServerConfig;

/// Create the full router with application state.
///
/// Every request gets an `x-request-id` (generated when absent, echoed on the
/// response) and is cut off after `server.request_timeout_secs`.
pub fn create_router(state: AppState, server: &ServerConfig) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/live", get(health::live_check))
        .route("/prompt", post(prompt::prompt))
        .route("/chat", post(prompt::chat))
        .route("/ama", post(prompt::ama))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
                    let request_id = request
                        .headers()
                        .get("x-request-id")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("-");

                    info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id
                    )
                }))
                .layer(TimeoutLayer::new(server.request_timeout()))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(middleware::from_fn(logging_middleware)),
        )
}
