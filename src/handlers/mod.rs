//! Handlers module for the log API endpoints
//!
//! Every endpoint runs one fixed read against the event store and returns
//! JSON; store failures become `{"error": ...}` with a 500 status.

pub mod dashboard;
pub mod health;
pub mod logs;

use crate::store::EventStore;
use axum::{routing::get, Router};
use std::sync::Arc;

pub use dashboard::{get_activity_overview, get_critical_count, get_severity_distribution};
pub use health::health_check;
pub use logs::{get_correlated_logs, get_snort_logs, get_wazuh_logs};

/// Shared application state containing the event store
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EventStore>,
}

impl AppState {
    pub fn new<S: EventStore + 'static>(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Create router for all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/wazuh-logs", get(get_wazuh_logs))
        .route("/api/snort-logs", get(get_snort_logs))
        .route("/api/activity-overview", get(get_activity_overview))
        .route("/api/severity-distribution", get(get_severity_distribution))
        .route("/api/dashboard/critical-count", get(get_critical_count))
        .route("/api/correlated-logs", get(get_correlated_logs))
        .route("/health", get(health_check))
        .with_state(state)
}
