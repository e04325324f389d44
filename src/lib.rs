//! SIEM Log API Library
//!
//! Read-only HTTP query layer over a relational store of security events:
//! two raw sensor feeds (Wazuh, Snort) and a unified table of correlated events.
//!
//! # Modules
//!
//! - `config`: Service configuration loaded from TOML and environment
//! - `error_handling`: Error types and the uniform JSON error response
//! - `models`: Event records and dashboard aggregates
//! - `normalizer`: Display message derivation for correlated events
//! - `store`: Event store trait with MySQL and in-memory implementations
//! - `handlers`: Axum routes

pub mod config;
pub mod error_handling;
pub mod handlers;
pub mod models;
pub mod normalizer;
pub mod store;

// Re-export the main types for convenience
pub use config::Config;
pub use error_handling::{ApiError, ApiResult, ErrorResponse};
pub use handlers::{create_router, AppState};
pub use models::{ActivityOverview, CorrelatedLog, EventRecord, Feed, HourlyBucket, SeverityBucket};
pub use normalizer::display_message;
pub use store::{EventStore, InMemoryEventStore, MySqlEventStore};
