use axum::{
    extract::State,
    http::{header, StatusCode},
    response::Json,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

use super::api::error_payload;
use crate::observability::Metrics;

type Exposition = ([(header::HeaderName, &'static str); 1], String);

/// Expose the registry in the Prometheus text format
#[instrument(name = "metrics_handler", skip(metrics))]
pub async fn metrics_handler(
    State(metrics): State<Arc<Metrics>>,
) -> Result<Exposition, (StatusCode, Json<Value>)> {
    let text = metrics.encode().map_err(|e| {
        crate::error_with_trace!("Failed to encode metrics: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_payload("Internal Server Error", "Failed to encode metrics"),
        )
    })?;

    Ok(([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], text))
}
