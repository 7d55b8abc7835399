//! Errors raised while resolving `Settings`.

use std::path::PathBuf;

use thiserror::Error;

/// Why the server could not resolve its configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required TOML file (`default.toml`, or the `CHAT_CONFIG_FILE` target)
    /// does not exist
    #[error("Configuration file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// `CHAT_CONFIG_DIR` and `CHAT_CONFIG_FILE` were both set
    #[error(
        "{dir_var} and {file_var} cannot both be set. Use {dir_var} for layered \
         configuration or {file_var} for a single configuration file"
    )]
    ConflictingSources {
        dir_var: &'static str,
        file_var: &'static str,
    },

    /// A plain deployment variable (`PORT`, `NODE_ENV`) holds an unusable value
    #[error("{var} must be {expected}, got '{value}'")]
    InvalidEnvVar {
        var: &'static str,
        value: String,
        expected: &'static str,
    },

    /// A resolved setting failed validation
    #[error("Invalid {field}: {message}")]
    ValidationError {
        /// Dotted settings key, e.g. `server.port`
        field: String,
        message: String,
    },

    /// The layered sources could not be read, merged or deserialized
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

impl ConfigError {
    /// Validation failure for the dotted settings key `field`
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Settings key or variable the error is about, used as the
    /// `AppError::Configuration` key.
    pub fn key(&self) -> &str {
        match self {
            ConfigError::ValidationError { field, .. } => field,
            ConfigError::InvalidEnvVar { var, .. } => var,
            ConfigError::FileNotFound { .. } | ConfigError::ConflictingSources { .. } => {
                "config_file"
            }
            ConfigError::Load(_) => "settings",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_env_var_message_names_variable() {
        let error = ConfigError::InvalidEnvVar {
            var: "PORT",
            value: "eighty".to_string(),
            expected: "a port number between 1 and 65535",
        };
        assert_eq!(
            error.to_string(),
            "PORT must be a port number between 1 and 65535, got 'eighty'"
        );
        assert_eq!(error.key(), "PORT");
    }

    #[test]
    fn test_keys() {
        assert_eq!(ConfigError::validation("cors.client_url", "bad").key(), "cors.client_url");
        assert_eq!(
            ConfigError::FileNotFound {
                path: PathBuf::from("config/default.toml")
            }
            .key(),
            "config_file"
        );
    }
}
