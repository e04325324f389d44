//! Error handling for the log API
//! Store failures are reported uniformly at the request boundary

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Error body returned by every endpoint on failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error types surfaced by the query layer
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Store connection error: {0}")]
    StoreConnection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ApiError {
    /// Create a store connection error
    pub fn store_connection<S: Into<String>>(message: S) -> Self {
        Self::StoreConnection(message.into())
    }

    /// Create a query error
    pub fn query<S: Into<String>>(message: S) -> Self {
        Self::Query(message.into())
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration(message.into())
    }

    /// Connectivity and query failures share one status so clients cannot tell them apart
    pub fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Configuration(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => ApiError::StoreConnection(err.to_string()),
            _ => ApiError::Query(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("Request failed: {}", self);
        (self.status_code(), Json(self.to_error_response())).into_response()
    }
}

/// Result type alias for query layer operations
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_has_only_error_key() {
        let response = ApiError::query("syntax error near FROM").to_error_response();
        let value = serde_json::to_value(&response).unwrap();

        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert_eq!(object["error"], "Query error: syntax error near FROM");
    }

    #[test]
    fn test_store_failures_share_status() {
        assert_eq!(
            ApiError::store_connection("refused").status_code(),
            ApiError::query("bad column").status_code()
        );
        assert_eq!(
            ApiError::query("bad column").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_sqlx_error_classification() {
        let io = sqlx::Error::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        ));
        assert!(matches!(ApiError::from(io), ApiError::StoreConnection(_)));

        let missing = sqlx::Error::RowNotFound;
        assert!(matches!(ApiError::from(missing), ApiError::Query(_)));

        let timed_out = sqlx::Error::PoolTimedOut;
        assert!(matches!(ApiError::from(timed_out), ApiError::StoreConnection(_)));
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::store_connection("unreachable").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
