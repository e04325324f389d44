//! Health check endpoint

use super::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use tracing::{debug, warn};

/// Store reachability check for load balancers
pub async fn health_check(State(state): State<AppState>) -> Response {
    debug!("Performing health check");

    match state.store.ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "healthy" }))).into_response(),
        Err(e) => {
            warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(e.to_error_response()),
            )
                .into_response()
        }
    }
}
