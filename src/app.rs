use axum::{extract::DefaultBodyLimit, middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::timeout::TimeoutLayer;

use crate::config::ServerConfig;
use crate::handlers::{
    api::{self, ApiState},
    cors_middleware, health_check, home, metrics_handler, request_validation_middleware,
    security_headers_middleware, RequestLimits,
};
use crate::observability::{observability_middleware, Metrics};

/// Build the application router with every route and middleware layer
pub fn create_app(api_state: ApiState, metrics: Arc<Metrics>, server: &ServerConfig) -> Router {
    let metrics_for_middleware = metrics.clone();
    let limits = RequestLimits {
        max_request_size: server.max_request_size,
    };

    Router::new()
        .route("/", get(home))
        // Health and metrics endpoints (with metrics state)
        .route("/health/status", get(health_check))
        .route("/metrics", get(metrics_handler))
        .with_state(metrics)
        .merge(api::create_api_router(api_state))
        // Add middleware layers (order matters - inner to outer)
        .layer(middleware::from_fn_with_state(
            limits,
            request_validation_middleware,
        ))
        .layer(DefaultBodyLimit::max(server.max_request_size))
        .layer(TimeoutLayer::new(server.request_timeout()))
        // Header layers wrap the rejecting layers so 408/413/415 carry them too
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(cors_middleware))
        .layer(middleware::from_fn(move |req, next| {
            observability_middleware(metrics_for_middleware.clone(), req, next)
        }))
}
