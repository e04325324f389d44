//! Event store trait abstraction
//!
//! Every query the service runs is fixed; implementations differ only in
//! where the rows come from.

pub mod in_memory;
pub mod mysql;

use crate::error_handling::ApiResult;
use crate::models::{ActivityOverview, EventRecord, Feed, SeverityBucket};
use async_trait::async_trait;

pub use in_memory::InMemoryEventStore;
pub use mysql::MySqlEventStore;

/// Read-only access to the event store
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Most recent raw events for one feed, newest first, at most `FEED_EVENT_LIMIT`
    async fn recent_feed_events(&self, feed: Feed) -> ApiResult<Vec<EventRecord>>;

    /// Hourly counts over the trailing window; empty hours are absent
    async fn activity_overview(&self) -> ApiResult<ActivityOverview>;

    /// Correlated events grouped by severity
    async fn severity_distribution(&self) -> ApiResult<Vec<SeverityBucket>>;

    /// Correlated events whose severity is "critical", ignoring case
    async fn critical_count(&self) -> ApiResult<i64>;

    /// Most recent correlated events, newest first, at most `CORRELATED_EVENT_LIMIT`
    async fn recent_correlated_events(&self) -> ApiResult<Vec<EventRecord>>;

    /// Connectivity probe
    async fn ping(&self) -> ApiResult<()>;
}
