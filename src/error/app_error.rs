use thiserror::Error;

use crate::config::error::ConfigError;

/// Message returned for any `/api` path that no route group handles.
pub const API_NOT_FOUND_MESSAGE: &str = "API endpoint not found";

/// Message returned for every unhandled server-side failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Application-wide error type.
///
/// Every variant maps onto a single HTTP status and a `{"message": ...}` body
/// (see `api::middleware::error_handler`). Server-side variants carry their
/// source so it can be logged before the generic response is produced.
#[derive(Error, Debug)]
pub enum AppError {
    /// Requested resource or route does not exist
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Malformed or invalid request
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// Validation error for a named field
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Missing or invalid credentials
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Authenticated but not allowed
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    /// Request body exceeded the configured limit
    #[error("Payload too large")]
    PayloadTooLarge,

    /// A dependency (database, static assets) is not available right now
    #[error("Service unavailable: {message}")]
    ServiceUnavailable { message: String },

    /// Database operation error with operation context
    #[error("Database operation failed: {operation}")]
    Database {
        operation: String,
        #[source]
        source: anyhow::Error,
    },

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// The 404 returned for unmatched `/api` paths.
    pub fn api_not_found() -> Self {
        AppError::NotFound {
            message: API_NOT_FOUND_MESSAGE.to_string(),
        }
    }

    /// Wraps any error as an internal failure.
    pub fn internal<E>(error: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        AppError::Internal {
            source: error.into(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        AppError::Configuration {
            key: error.key().to_string(),
            source: anyhow::Error::new(error),
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_not_found_message() {
        match AppError::api_not_found() {
            AppError::NotFound { message } => assert_eq!(message, "API endpoint not found"),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_from_config_validation_error_keeps_field() {
        let error: AppError = ConfigError::validation("server.port", "bad port").into();
        match error {
            AppError::Configuration { key, .. } => assert_eq!(key, "server.port"),
            other => panic!("Expected Configuration, got {:?}", other),
        }
    }

    #[test]
    fn test_from_config_env_error_keeps_variable() {
        let error: AppError = ConfigError::InvalidEnvVar {
            var: "PORT",
            value: "0".to_string(),
            expected: "a port number between 1 and 65535",
        }
        .into();
        match error {
            AppError::Configuration { key, source } => {
                assert_eq!(key, "PORT");
                assert!(source.to_string().contains("got '0'"));
            }
            other => panic!("Expected Configuration, got {:?}", other),
        }
    }
}
