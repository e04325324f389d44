//! Display message derivation for correlated events
//!
//! Correlated rows are frequently stored with an empty `message`; the
//! description then lives somewhere inside `raw_json`. Rules, first match wins:
//!
//! 1. non-empty stored `message`
//! 2. payload `message`
//! 3. payload `correlation_type`
//! 4. `stage1` / `stage2` objects, rendered from their `wazuh_alert` values
//! 5. [`NO_DESCRIPTION`]

use crate::models::EventRecord;
use serde_json::{Map, Value};

pub const NO_DESCRIPTION: &str = "No description available";
pub const UNKNOWN_STAGE_ALERT: &str = "Unknown event";

/// Why a stored payload could not be used
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("payload is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("payload is not a JSON object")]
    NotAnObject,
}

/// Parse a stored `raw_json` value into a JSON object
pub fn parse_payload(raw: &str) -> Result<Map<String, Value>, PayloadError> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Object(map) => Ok(map),
        _ => Err(PayloadError::NotAnObject),
    }
}

/// Derive the display message for a record. Never returns an empty string.
pub fn display_message(record: &EventRecord) -> String {
    if let Some(message) = record.message.as_deref().filter(|m| !m.is_empty()) {
        return message.to_string();
    }

    let payload = match record.raw_json.as_deref().map(parse_payload) {
        Some(Ok(payload)) => payload,
        // Unusable payloads carry no structured data
        Some(Err(_)) | None => return NO_DESCRIPTION.to_string(),
    };

    message_from_payload(&payload).unwrap_or_else(|| NO_DESCRIPTION.to_string())
}

fn message_from_payload(payload: &Map<String, Value>) -> Option<String> {
    if let Some(message) = non_empty_str(payload, "message") {
        return Some(message.to_string());
    }

    if let Some(correlation_type) = non_empty_str(payload, "correlation_type") {
        return Some(correlation_type.to_string());
    }

    match (
        payload.get("stage1").and_then(Value::as_object),
        payload.get("stage2").and_then(Value::as_object),
    ) {
        (Some(stage1), Some(stage2)) => Some(format!(
            "Correlated events: {} → {}",
            stage_alert(stage1),
            stage_alert(stage2)
        )),
        _ => None,
    }
}

fn non_empty_str<'a>(payload: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn stage_alert(stage: &Map<String, Value>) -> &str {
    stage
        .get("wazuh_alert")
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_STAGE_ALERT)
}
