//! Dashboard aggregates over the event store

use super::AppState;
use crate::error_handling::ApiResult;
use crate::models::{ActivityOverview, CriticalCount, SeverityBucket};
use axum::{extract::State, response::Json};
use tracing::info;

/// Hourly event counts over the trailing 24 hours for each feed and the correlated subset
pub async fn get_activity_overview(
    State(state): State<AppState>,
) -> ApiResult<Json<ActivityOverview>> {
    let overview = state.store.activity_overview().await?;
    info!(
        "Activity overview: {} snort, {} wazuh, {} correlated hour buckets",
        overview.snort.len(),
        overview.wazuh.len(),
        overview.correlated.len()
    );
    Ok(Json(overview))
}

pub async fn get_severity_distribution(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<SeverityBucket>>> {
    let buckets = state.store.severity_distribution().await?;
    info!("Severity distribution has {} buckets", buckets.len());
    Ok(Json(buckets))
}

pub async fn get_critical_count(State(state): State<AppState>) -> ApiResult<Json<CriticalCount>> {
    let critical = state.store.critical_count().await?;
    info!("Critical correlated events: {}", critical);
    Ok(Json(CriticalCount { critical }))
}
