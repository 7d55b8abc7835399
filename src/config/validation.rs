//! Configuration validation logic
//!
//! This module provides validation methods for all configuration structures
//! to ensure configuration values are within acceptable ranges and formats.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::error::ConfigError;
use crate::config::settings::{
    CorsConfig, DatabaseConfig, FileSettings, FrontendConfig, LoggerSettings, ServerConfig,
    Settings,
};

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

/// Valid rotation strategies
const VALID_ROTATION_STRATEGIES: &[&str] = &[
    "size",
    "time",
    "count",
    "combined",
    "time_daily",
    "daily",
    "time_hourly",
    "hourly",
    "time_weekly",
    "weekly",
    "time_monthly",
    "monthly",
];

/// Accepted database URL schemes
const VALID_DATABASE_SCHEMES: &[&str] = &["postgres://", "postgresql://"];

/// Scheme, host and optional port; no path, query or trailing slash.
static ORIGIN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://[A-Za-z0-9.-]+(:\d{1,5})?$").expect("origin regex is valid")
});

impl ServerConfig {
    /// Validate server configuration
    ///
    /// # Validation Rules
    /// - Port must be between 1 and 65535
    /// - Request timeout must be greater than 0
    /// - Body limit must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535. Please specify a valid port number.",
            ));
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::validation(
                "server.request_timeout",
                "Request timeout must be greater than 0 seconds.",
            ));
        }

        if self.body_limit == 0 {
            return Err(ConfigError::validation(
                "server.body_limit",
                "Body limit must be greater than 0 bytes.",
            ));
        }

        Ok(())
    }
}

impl CorsConfig {
    /// Validate CORS configuration
    ///
    /// Every configured origin must look like `http(s)://host[:port]`.
    /// An empty `client_url` is allowed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for origin in &self.allowed_origins {
            if !is_valid_origin(origin) {
                return Err(ConfigError::ValidationError {
                    field: "cors.allowed_origins".to_string(),
                    message: format!(
                        "Invalid origin '{}'. Expected format: http(s)://host[:port]",
                        origin
                    ),
                });
            }
        }

        if !self.client_url.trim().is_empty() && !is_valid_origin(&self.client_url) {
            return Err(ConfigError::ValidationError {
                field: "cors.client_url".to_string(),
                message: format!(
                    "Invalid client URL '{}'. Expected format: http(s)://host[:port]",
                    self.client_url
                ),
            });
        }

        Ok(())
    }
}

fn is_valid_origin(origin: &str) -> bool {
    ORIGIN_REGEX.is_match(origin.trim().trim_end_matches('/'))
}

impl FrontendConfig {
    /// Validate frontend configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dist_dir.trim().is_empty() {
            return Err(ConfigError::validation(
                "frontend.dist_dir",
                "Frontend dist directory must not be empty.",
            ));
        }

        if self.index_file.trim().is_empty() {
            return Err(ConfigError::validation(
                "frontend.index_file",
                "Frontend index file must not be empty.",
            ));
        }

        Ok(())
    }
}

impl DatabaseConfig {
    /// Validate database configuration
    ///
    /// # Validation Rules
    /// - An empty URL disables the database and skips the remaining checks
    /// - URL must use the postgres scheme
    /// - Max connections must be greater than 0
    /// - Min connections must not exceed max connections
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.is_configured() {
            return Ok(());
        }

        if !VALID_DATABASE_SCHEMES
            .iter()
            .any(|scheme| self.url.starts_with(scheme))
        {
            return Err(ConfigError::validation(
                "database.url",
                "Invalid database URL format. Expected format: postgres://[user:password@]host[:port]/database",
            ));
        }

        if self.max_connections == 0 {
            return Err(ConfigError::validation(
                "database.max_connections",
                "Max connections must be greater than 0.",
            ));
        }

        if self.min_connections > self.max_connections {
            return Err(ConfigError::ValidationError {
                field: "database.min_connections".to_string(),
                message: format!(
                    "Min connections ({}) cannot exceed max connections ({}).",
                    self.min_connections, self.max_connections
                ),
            });
        }

        Ok(())
    }
}

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            });
        }

        if !VALID_ROTATION_STRATEGIES.contains(&self.rotation.strategy.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.file.rotation.strategy".to_string(),
                message: format!(
                    "Invalid rotation strategy '{}'. Valid strategies are: {}",
                    self.rotation.strategy,
                    VALID_ROTATION_STRATEGIES.join(", ")
                ),
            });
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger settings
    ///
    /// # Validation Rules
    /// - Log level must be one of: trace, debug, info, warn, error
    /// - If file logging is enabled, path must not be empty
    /// - Log format must be one of: full, compact, json
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        self.file.validate()
    }
}

impl Settings {
    /// Validate all configuration settings
    ///
    /// Returns the first validation error encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.cors.validate()?;
        self.frontend.validate()?;
        self.database.validate()?;
        self.logger.validate()?;
        Ok(())
    }
}
