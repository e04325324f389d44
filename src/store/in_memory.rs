use super::EventStore;
use crate::error_handling::{ApiError, ApiResult};
use crate::models::{
    ActivityOverview, EventRecord, Feed, HourlyBucket, SeverityBucket, ACTIVITY_WINDOW_HOURS,
    CORRELATED_EVENT_LIMIT, FEED_EVENT_LIMIT,
};
use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime, Timelike, Utc};
use std::collections::BTreeMap;

/// Row in the unified table
#[derive(Debug, Clone)]
struct UnifiedRow {
    record: EventRecord,
    correlated: bool,
}

/// Event store held in memory, with a fixed reference time for the activity window
#[derive(Debug, Clone)]
pub struct InMemoryEventStore {
    wazuh: Vec<EventRecord>,
    snort: Vec<EventRecord>,
    unified: Vec<UnifiedRow>,
    now: NaiveDateTime,
    available: bool,
}

impl Default for InMemoryEventStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self {
            wazuh: Vec::new(),
            snort: Vec::new(),
            unified: Vec::new(),
            now: Utc::now().naive_utc(),
            available: true,
        }
    }

    /// A store whose every call fails as if the server were unreachable
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    /// Pin the reference time used for the trailing activity window
    pub fn with_now(mut self, now: NaiveDateTime) -> Self {
        self.now = now;
        self
    }

    pub fn with_feed_event(mut self, feed: Feed, record: EventRecord) -> Self {
        match feed {
            Feed::Wazuh => self.wazuh.push(record),
            Feed::Snort => self.snort.push(record),
        }
        self
    }

    pub fn with_unified_event(mut self, record: EventRecord, correlated: bool) -> Self {
        self.unified.push(UnifiedRow { record, correlated });
        self
    }

    fn check_available(&self) -> ApiResult<()> {
        if self.available {
            Ok(())
        } else {
            Err(ApiError::store_connection("in-memory store marked unavailable"))
        }
    }

    fn correlated(&self) -> impl Iterator<Item = &EventRecord> {
        self.unified
            .iter()
            .filter(|row| row.correlated)
            .map(|row| &row.record)
    }

    fn hourly<'a>(&self, records: impl Iterator<Item = &'a EventRecord>) -> Vec<HourlyBucket> {
        let since = self.now - Duration::hours(ACTIVITY_WINDOW_HOURS);
        let mut counts: BTreeMap<u32, i64> = BTreeMap::new();

        for record in records.filter(|r| r.created_at >= since) {
            *counts.entry(record.created_at.hour()).or_insert(0) += 1;
        }

        counts
            .into_iter()
            .map(|(hour, count)| HourlyBucket {
                hour: i64::from(hour),
                count,
            })
            .collect()
    }
}

fn newest_first<'a>(
    records: impl Iterator<Item = &'a EventRecord>,
    limit: usize,
) -> Vec<EventRecord> {
    let mut rows: Vec<EventRecord> = records.cloned().collect();
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    rows.truncate(limit);
    rows
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn recent_feed_events(&self, feed: Feed) -> ApiResult<Vec<EventRecord>> {
        self.check_available()?;
        let rows = match feed {
            Feed::Wazuh => &self.wazuh,
            Feed::Snort => &self.snort,
        };
        Ok(newest_first(rows.iter(), FEED_EVENT_LIMIT))
    }

    async fn activity_overview(&self) -> ApiResult<ActivityOverview> {
        self.check_available()?;
        Ok(ActivityOverview {
            snort: self.hourly(self.snort.iter()),
            wazuh: self.hourly(self.wazuh.iter()),
            correlated: self.hourly(self.correlated()),
        })
    }

    async fn severity_distribution(&self) -> ApiResult<Vec<SeverityBucket>> {
        self.check_available()?;
        let mut counts: BTreeMap<Option<String>, i64> = BTreeMap::new();
        for record in self.correlated() {
            *counts.entry(record.severity.clone()).or_insert(0) += 1;
        }

        Ok(counts
            .into_iter()
            .map(|(severity, count)| SeverityBucket { severity, count })
            .collect())
    }

    async fn critical_count(&self) -> ApiResult<i64> {
        self.check_available()?;
        let count = self
            .correlated()
            .filter(|r| {
                r.severity
                    .as_deref()
                    .is_some_and(|s| s.eq_ignore_ascii_case("critical"))
            })
            .count();
        Ok(count as i64)
    }

    async fn recent_correlated_events(&self) -> ApiResult<Vec<EventRecord>> {
        self.check_available()?;
        Ok(newest_first(self.correlated(), CORRELATED_EVENT_LIMIT))
    }

    async fn ping(&self) -> ApiResult<()> {
        self.check_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn event(id: i64, created_at: NaiveDateTime, severity: &str) -> EventRecord {
        EventRecord {
            id,
            timestamp: Some(created_at.to_string()),
            source: Some("wazuh".to_string()),
            message: Some(format!("event {}", id)),
            severity: Some(severity.to_string()),
            raw_json: None,
            created_at,
        }
    }

    #[tokio::test]
    async fn test_hourly_window_and_grouping() {
        let store = InMemoryEventStore::new()
            .with_now(at(10, 12, 0))
            .with_feed_event(Feed::Snort, event(1, at(10, 11, 5), "low"))
            .with_feed_event(Feed::Snort, event(2, at(10, 11, 50), "low"))
            .with_feed_event(Feed::Snort, event(3, at(9, 13, 0), "low"))
            // outside the trailing 24 hours
            .with_feed_event(Feed::Snort, event(4, at(9, 11, 59), "low"));

        let overview = store.activity_overview().await.unwrap();
        assert_eq!(
            overview.snort,
            vec![
                HourlyBucket { hour: 11, count: 2 },
                HourlyBucket { hour: 13, count: 1 },
            ]
        );
        assert!(overview.wazuh.is_empty());
        assert!(overview.correlated.is_empty());
    }

    #[tokio::test]
    async fn test_correlated_hourly_ignores_uncorrelated() {
        let store = InMemoryEventStore::new()
            .with_now(at(10, 12, 0))
            .with_unified_event(event(1, at(10, 1, 0), "high"), true)
            .with_unified_event(event(2, at(10, 1, 30), "high"), false);

        let overview = store.activity_overview().await.unwrap();
        assert_eq!(overview.correlated, vec![HourlyBucket { hour: 1, count: 1 }]);
    }

    #[tokio::test]
    async fn test_feed_listing_newest_first_and_capped() {
        let mut store = InMemoryEventStore::new();
        for i in 0..120 {
            store = store.with_feed_event(
                Feed::Wazuh,
                event(i, at(1, 0, 0) + Duration::minutes(i), "low"),
            );
        }

        let rows = store.recent_feed_events(Feed::Wazuh).await.unwrap();
        assert_eq!(rows.len(), FEED_EVENT_LIMIT);
        assert_eq!(rows[0].id, 119);
        assert!(rows.windows(2).all(|w| w[0].created_at >= w[1].created_at));
        assert!(store.recent_feed_events(Feed::Snort).await.unwrap().is_empty());
    }

    #[test]
    fn test_critical_count_case_insensitive() {
        let store = InMemoryEventStore::new()
            .with_unified_event(event(1, at(1, 0, 0), "CRITICAL"), true)
            .with_unified_event(event(2, at(1, 0, 0), "Critical"), true)
            .with_unified_event(event(3, at(1, 0, 0), "critical"), false)
            .with_unified_event(event(4, at(1, 0, 0), "high"), true);

        assert_eq!(tokio_test::block_on(store.critical_count()).unwrap(), 2);
        assert_eq!(
            tokio_test::block_on(InMemoryEventStore::new().critical_count()).unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_severity_distribution_correlated_only() {
        let store = InMemoryEventStore::new()
            .with_unified_event(event(1, at(1, 0, 0), "high"), true)
            .with_unified_event(event(2, at(1, 0, 0), "high"), true)
            .with_unified_event(event(3, at(1, 0, 0), "low"), true)
            .with_unified_event(event(4, at(1, 0, 0), "medium"), false);

        let buckets = store.severity_distribution().await.unwrap();
        assert_eq!(
            buckets,
            vec![
                SeverityBucket { severity: Some("high".to_string()), count: 2 },
                SeverityBucket { severity: Some("low".to_string()), count: 1 },
            ]
        );
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_everywhere() {
        let store = InMemoryEventStore::unavailable();

        assert!(matches!(store.ping().await, Err(ApiError::StoreConnection(_))));
        assert!(store.recent_feed_events(Feed::Snort).await.is_err());
        assert!(store.activity_overview().await.is_err());
        assert!(store.severity_distribution().await.is_err());
        assert!(store.critical_count().await.is_err());
        assert!(store.recent_correlated_events().await.is_err());
    }
}
