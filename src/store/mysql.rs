//! MySQL-backed event store
//!
//! No pool: each call opens its own connection and closes it before the
//! result is handed back, on success and on failure alike.

use super::EventStore;
use crate::config::Config;
use crate::error_handling::{ApiError, ApiResult};
use crate::models::{
    ActivityOverview, EventRecord, Feed, HourlyBucket, SeverityBucket, ACTIVITY_WINDOW_HOURS,
    CORRELATED_EVENT_LIMIT, FEED_EVENT_LIMIT,
};
use async_trait::async_trait;
use futures::future::BoxFuture;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::Connection;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Pass-through columns are cast so that unsigned ids, textual timestamps and
/// `JSON` payload columns decode the same as their canonical types
const EVENT_COLUMNS: &str = "CAST(id AS SIGNED) AS id, \
     CAST(timestamp AS CHAR) AS timestamp, \
     source, \
     message, \
     severity, \
     CAST(raw_json AS CHAR) AS raw_json, \
     created_at";

/// Fixed SQL, rendered once from the configured table names
#[derive(Debug, Clone)]
struct Queries {
    wazuh_recent: String,
    snort_recent: String,
    wazuh_hourly: String,
    snort_hourly: String,
    correlated_hourly: String,
    severity_distribution: String,
    critical_count: String,
    correlated_recent: String,
}

impl Queries {
    fn new(config: &Config) -> Self {
        let tables = &config.database.tables;

        let recent = |table: &str| {
            format!(
                "SELECT {} FROM {} ORDER BY created_at DESC LIMIT {}",
                EVENT_COLUMNS, table, FEED_EVENT_LIMIT
            )
        };

        let hourly = |table: &str, filter: &str| {
            format!(
                "SELECT CAST(HOUR(created_at) AS SIGNED) AS hour, COUNT(*) AS count \
                 FROM {} \
                 WHERE {}created_at >= DATE_SUB(NOW(), INTERVAL {} HOUR) \
                 GROUP BY hour \
                 ORDER BY hour",
                table, filter, ACTIVITY_WINDOW_HOURS
            )
        };

        Self {
            wazuh_recent: recent(&tables.wazuh),
            snort_recent: recent(&tables.snort),
            wazuh_hourly: hourly(&tables.wazuh, ""),
            snort_hourly: hourly(&tables.snort, ""),
            correlated_hourly: hourly(&tables.unified, "correlated = 1 AND "),
            severity_distribution: format!(
                "SELECT severity, COUNT(*) AS count FROM {} WHERE correlated = 1 GROUP BY severity",
                tables.unified
            ),
            critical_count: format!(
                "SELECT COUNT(*) AS critical FROM {} \
                 WHERE correlated = 1 AND LOWER(severity) = 'critical'",
                tables.unified
            ),
            correlated_recent: format!(
                "SELECT {} FROM {} WHERE correlated = 1 ORDER BY created_at DESC LIMIT {}",
                EVENT_COLUMNS, tables.unified, CORRELATED_EVENT_LIMIT
            ),
        }
    }
}

pub struct MySqlEventStore {
    options: MySqlConnectOptions,
    connect_timeout: Duration,
    queries: Queries,
}

impl MySqlEventStore {
    /// Build a store from configuration. No connection is opened here.
    pub fn new(config: &Config) -> Self {
        let db = &config.database;
        let options = MySqlConnectOptions::new()
            .host(&db.host)
            .port(db.port)
            .username(&db.username)
            .password(&db.password)
            .database(&db.database);

        info!(
            "Event store configured for database '{}' at {}:{}",
            db.database, db.host, db.port
        );

        Self {
            options,
            connect_timeout: config.connect_timeout(),
            queries: Queries::new(config),
        }
    }

    async fn connect(&self) -> ApiResult<MySqlConnection> {
        match tokio::time::timeout(
            self.connect_timeout,
            MySqlConnection::connect_with(&self.options),
        )
        .await
        {
            Ok(Ok(conn)) => Ok(conn),
            Ok(Err(e)) => Err(ApiError::store_connection(format!(
                "Failed to connect to event store: {}",
                e
            ))),
            Err(_) => Err(ApiError::store_connection(format!(
                "Timed out connecting to event store after {:?}",
                self.connect_timeout
            ))),
        }
    }

    /// Run `operation` on a fresh connection and close it before returning
    async fn with_connection<T, F>(&self, operation: F) -> ApiResult<T>
    where
        T: Send,
        F: for<'c> FnOnce(&'c mut MySqlConnection) -> BoxFuture<'c, ApiResult<T>> + Send,
    {
        let mut conn = self.connect().await?;
        let result = operation(&mut conn).await;

        if let Err(e) = conn.close().await {
            warn!("Failed to close event store connection cleanly: {}", e);
        } else {
            debug!("Event store connection closed");
        }

        result
    }

    async fn fetch_events(&self, sql: String) -> ApiResult<Vec<EventRecord>> {
        self.with_connection(move |conn| {
            Box::pin(async move {
                let rows = sqlx::query_as::<_, EventRecord>(&sql)
                    .fetch_all(conn)
                    .await?;
                Ok::<_, ApiError>(rows)
            })
        })
        .await
    }
}

#[async_trait]
impl EventStore for MySqlEventStore {
    async fn recent_feed_events(&self, feed: Feed) -> ApiResult<Vec<EventRecord>> {
        let sql = match feed {
            Feed::Wazuh => self.queries.wazuh_recent.clone(),
            Feed::Snort => self.queries.snort_recent.clone(),
        };
        self.fetch_events(sql).await
    }

    async fn activity_overview(&self) -> ApiResult<ActivityOverview> {
        let snort_sql = self.queries.snort_hourly.clone();
        let wazuh_sql = self.queries.wazuh_hourly.clone();
        let correlated_sql = self.queries.correlated_hourly.clone();

        self.with_connection(move |conn| {
            Box::pin(async move {
                let snort = sqlx::query_as::<_, HourlyBucket>(&snort_sql)
                    .fetch_all(&mut *conn)
                    .await?;
                let wazuh = sqlx::query_as::<_, HourlyBucket>(&wazuh_sql)
                    .fetch_all(&mut *conn)
                    .await?;
                let correlated = sqlx::query_as::<_, HourlyBucket>(&correlated_sql)
                    .fetch_all(&mut *conn)
                    .await?;

                Ok::<_, ApiError>(ActivityOverview {
                    snort,
                    wazuh,
                    correlated,
                })
            })
        })
        .await
    }

    async fn severity_distribution(&self) -> ApiResult<Vec<SeverityBucket>> {
        let sql = self.queries.severity_distribution.clone();
        self.with_connection(move |conn| {
            Box::pin(async move {
                let rows = sqlx::query_as::<_, SeverityBucket>(&sql)
                    .fetch_all(conn)
                    .await?;
                Ok::<_, ApiError>(rows)
            })
        })
        .await
    }

    async fn critical_count(&self) -> ApiResult<i64> {
        let sql = self.queries.critical_count.clone();
        self.with_connection(move |conn| {
            Box::pin(async move {
                let count = sqlx::query_scalar::<_, i64>(&sql)
                    .fetch_optional(conn)
                    .await?;
                Ok::<_, ApiError>(count.unwrap_or(0))
            })
        })
        .await
    }

    async fn recent_correlated_events(&self) -> ApiResult<Vec<EventRecord>> {
        self.fetch_events(self.queries.correlated_recent.clone()).await
    }

    async fn ping(&self) -> ApiResult<()> {
        self.with_connection(|conn| {
            Box::pin(async move {
                conn.ping().await?;
                Ok::<_, ApiError>(())
            })
        })
        .await
    }
}
