//! Event and aggregate models
//!
//! Rows are read-only snapshots of the event store at request time. Field
//! names match the store columns and are serialized unchanged.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Maximum rows returned by the raw feed listings
pub const FEED_EVENT_LIMIT: usize = 100;

/// Maximum rows returned by the correlated listing
pub const CORRELATED_EVENT_LIMIT: usize = 50;

/// Trailing window for the hourly activity overview
pub const ACTIVITY_WINDOW_HOURS: i64 = 24;

/// Raw sensor feeds stored in separate tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feed {
    /// Host-based intrusion detection
    Wazuh,
    /// Network-based intrusion detection
    Snort,
}

/// Security event record as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct EventRecord {
    pub id: i64,
    /// Sensor-reported time, passed through as text
    pub timestamp: Option<String>,
    /// Tag of the originating sensor
    pub source: Option<String>,
    pub message: Option<String>,
    pub severity: Option<String>,
    /// Serialized JSON payload, possibly malformed
    pub raw_json: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Correlated event as returned to clients, with a guaranteed display message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelatedLog {
    pub id: i64,
    pub timestamp: Option<String>,
    pub source: Option<String>,
    pub message: String,
    pub severity: Option<String>,
    pub raw_json: Option<String>,
    pub created_at: NaiveDateTime,
}

impl CorrelatedLog {
    /// Attach the derived display message to a stored record
    pub fn from_record(record: EventRecord, message: String) -> Self {
        Self {
            id: record.id,
            timestamp: record.timestamp,
            source: record.source,
            message,
            severity: record.severity,
            raw_json: record.raw_json,
            created_at: record.created_at,
        }
    }
}

/// Event count for one hour of the day (0-23)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct HourlyBucket {
    pub hour: i64,
    pub count: i64,
}

/// Event count for one severity value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SeverityBucket {
    pub severity: Option<String>,
    pub count: i64,
}

/// Hourly series for both feeds and the correlated subset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityOverview {
    pub snort: Vec<HourlyBucket>,
    pub wazuh: Vec<HourlyBucket>,
    pub correlated: Vec<HourlyBucket>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriticalCount {
    pub critical: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_activity_overview_keys() {
        let overview = ActivityOverview {
            snort: vec![HourlyBucket { hour: 3, count: 7 }],
            ..Default::default()
        };

        let value = serde_json::to_value(&overview).unwrap();
        assert_eq!(value["snort"][0]["hour"], 3);
        assert_eq!(value["snort"][0]["count"], 7);
        assert!(value["wazuh"].as_array().unwrap().is_empty());
        assert!(value["correlated"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_correlated_log_keeps_record_fields() {
        let created_at = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        let record = EventRecord {
            id: 42,
            timestamp: Some("2024-05-01 10:30:00".to_string()),
            source: Some("correlator".to_string()),
            message: None,
            severity: Some("high".to_string()),
            raw_json: Some("{}".to_string()),
            created_at,
        };

        let log = CorrelatedLog::from_record(record, "No description available".to_string());
        assert_eq!(log.id, 42);
        assert_eq!(log.message, "No description available");
        assert_eq!(log.severity.as_deref(), Some("high"));
        assert_eq!(log.raw_json.as_deref(), Some("{}"));
    }
}
