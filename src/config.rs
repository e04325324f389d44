//! Configuration for the log API
//! Server binding, event store connection parameters and table names

use crate::error_handling::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration structure for the service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Event store configuration
    pub database: DatabaseConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server bind address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Enable permissive CORS
    pub enable_cors: bool,
}

/// Event store connection parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Database (schema) name
    pub database: String,
    /// Upper bound on establishing a connection, in seconds
    pub connect_timeout_secs: u64,
    pub tables: TableConfig,
}

/// Table names for the two sensor feeds and the unified event table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Host-based sensor feed
    pub wazuh: String,
    /// Network-based sensor feed
    pub snort: String,
    /// Unified events carrying the `correlated` flag
    pub unified: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            enable_cors: true,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            username: "root".to_string(),
            password: String::new(),
            database: "security_logs".to_string(),
            connect_timeout_secs: 10,
            tables: TableConfig::default(),
        }
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            wazuh: "wazuh_logs".to_string(),
            snort: "snort_logs".to_string(),
            unified: "security_logs".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> ApiResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ApiError::configuration(format!("Failed to read config file {}: {}", path, e))
        })?;

        let config = Self::from_toml_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text; missing sections fall back to defaults
    pub fn from_toml_str(content: &str) -> ApiResult<Self> {
        toml::from_str(content)
            .map_err(|e| ApiError::configuration(format!("Failed to parse config: {}", e)))
    }

    /// Load from an optional file, then apply environment overrides and validate
    pub fn load(path: Option<&str>) -> ApiResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Override values from environment variables
    pub fn apply_env_overrides(&mut self) -> ApiResult<()> {
        if let Ok(host) = std::env::var("LOG_API_HOST") {
            self.server.host = host;
        }

        if let Ok(port) = std::env::var("LOG_API_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ApiError::configuration("Invalid LOG_API_PORT"))?;
        }

        if let Ok(host) = std::env::var("DB_HOST") {
            self.database.host = host;
        }

        if let Ok(port) = std::env::var("DB_PORT") {
            self.database.port = port
                .parse()
                .map_err(|_| ApiError::configuration("Invalid DB_PORT"))?;
        }

        if let Ok(username) = std::env::var("DB_USER") {
            self.database.username = username;
        }

        if let Ok(password) = std::env::var("DB_PASSWORD") {
            self.database.password = password;
        }

        if let Ok(database) = std::env::var("DB_NAME") {
            self.database.database = database;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> ApiResult<()> {
        if self.server.port == 0 {
            return Err(ApiError::configuration("Server port cannot be 0"));
        }

        if self.database.host.trim().is_empty() {
            return Err(ApiError::configuration("Database host cannot be empty"));
        }

        if self.database.database.trim().is_empty() {
            return Err(ApiError::configuration("Database name cannot be empty"));
        }

        if self.database.connect_timeout_secs == 0 {
            return Err(ApiError::configuration("Connect timeout cannot be 0"));
        }

        // Table names are interpolated into the fixed queries
        for (key, table) in [
            ("wazuh", &self.database.tables.wazuh),
            ("snort", &self.database.tables.snort),
            ("unified", &self.database.tables.unified),
        ] {
            if !is_plain_identifier(table) {
                return Err(ApiError::configuration(format!(
                    "Table name for {} is not a plain identifier: {:?}",
                    key, table
                )));
            }
        }

        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.database.connect_timeout_secs)
    }
}

fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
