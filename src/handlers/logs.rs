//! Event listings: raw sensor feeds and normalized correlated events

use super::AppState;
use crate::error_handling::ApiResult;
use crate::models::{CorrelatedLog, EventRecord, Feed};
use crate::normalizer::display_message;
use axum::{extract::State, response::Json};
use tracing::info;

/// Most recent host-based sensor events
pub async fn get_wazuh_logs(State(state): State<AppState>) -> ApiResult<Json<Vec<EventRecord>>> {
    list_feed(&state, Feed::Wazuh).await
}

/// Most recent network-based sensor events
pub async fn get_snort_logs(State(state): State<AppState>) -> ApiResult<Json<Vec<EventRecord>>> {
    list_feed(&state, Feed::Snort).await
}

async fn list_feed(state: &AppState, feed: Feed) -> ApiResult<Json<Vec<EventRecord>>> {
    let events = state.store.recent_feed_events(feed).await?;
    info!("Returning {} {:?} events", events.len(), feed);
    Ok(Json(events))
}

/// Most recent correlated events, each with a derived display message
pub async fn get_correlated_logs(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<CorrelatedLog>>> {
    let records = state.store.recent_correlated_events().await?;

    let logs: Vec<CorrelatedLog> = records
        .into_iter()
        .map(|record| {
            let message = display_message(&record);
            CorrelatedLog::from_record(record, message)
        })
        .collect();

    info!("Returning {} correlated events", logs.len());
    Ok(Json(logs))
}
