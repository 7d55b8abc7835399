//! Configuration loader for chat-server
//!
//! This module provides the `ConfigLoader` struct that handles loading
//! configuration from multiple sources with proper precedence.

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};

use crate::config::environment::Environment as AppEnvironment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

/// Environment variable for configuration directory
const CONFIG_DIR_ENV: &str = "CHAT_CONFIG_DIR";

/// Environment variable for specific configuration file
const CONFIG_FILE_ENV: &str = "CHAT_CONFIG_FILE";

/// Default configuration directory
const DEFAULT_CONFIG_DIR: &str = "config";

/// Environment variable prefix for configuration overrides
const ENV_PREFIX: &str = "CHAT";

/// Separator for nested configuration keys in environment variables
const ENV_SEPARATOR: &str = "__";

/// Plain deployment variables and the settings keys they override.
const PORT_ENV: &str = "PORT";
const CLIENT_URL_ENV: &str = "CLIENT_URL";
const DATABASE_URL_ENV: &str = "DATABASE_URL";

type Builder = ConfigBuilder<DefaultState>;

/// Configuration loader that handles layered configuration loading
///
/// The loader supports the following configuration sources (in order of priority):
/// 1. `default.toml` - Base default configuration (required)
/// 2. `{environment}.toml` - Environment-specific configuration (optional)
/// 3. `local.toml` - Local development overrides (optional)
/// 4. `CHAT_*` environment variables
/// 5. `PORT`, `CLIENT_URL` and `DATABASE_URL` (highest priority)
#[derive(Debug)]
pub struct ConfigLoader {
    /// Configuration directory path
    config_dir: PathBuf,
    /// Specific configuration file path (if set, skips layered loading)
    config_file: Option<PathBuf>,
    /// Current application environment
    environment: AppEnvironment,
}

impl ConfigLoader {
    /// Create a new configuration loader
    ///
    /// This reads environment variables to determine:
    /// - Configuration directory (`CHAT_CONFIG_DIR`)
    /// - Specific configuration file (`CHAT_CONFIG_FILE`)
    /// - Application environment (`NODE_ENV`)
    ///
    /// # Errors
    ///
    /// Returns an error if both `CHAT_CONFIG_DIR` and `CHAT_CONFIG_FILE` are set,
    /// as they are mutually exclusive.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = std::env::var(CONFIG_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_DIR));

        let config_file = std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from);

        if config_file.is_some() && std::env::var(CONFIG_DIR_ENV).is_ok() {
            return Err(ConfigError::ConflictingSources {
                dir_var: CONFIG_DIR_ENV,
                file_var: CONFIG_FILE_ENV,
            });
        }

        Ok(Self {
            config_dir,
            config_file,
            environment: AppEnvironment::from_env(),
        })
    }

    /// Replace the environment picked up from `NODE_ENV`
    pub fn with_environment(mut self, environment: AppEnvironment) -> Self {
        self.environment = environment;
        self
    }

    /// Load only `path`, as if `CHAT_CONFIG_FILE` pointed at it
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Get the current application environment
    pub fn environment(&self) -> AppEnvironment {
        self.environment
    }

    /// Load configuration from all sources
    ///
    /// If `CHAT_CONFIG_FILE` is set, loads only that file.
    /// Otherwise, performs layered loading from the configuration directory.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `default.toml` is not found (when using layered loading)
    /// - `PORT` is not a number
    /// - Configuration parsing fails
    /// - Configuration validation fails
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let config = self.build_config()?;
        let mut settings: Settings = config.try_deserialize()?;
        settings.environment = self.environment;

        settings.validate()?;

        Ok(settings)
    }

    /// Build the config::Config instance from all sources
    fn build_config(&self) -> Result<Config, ConfigError> {
        let builder = Config::builder();

        let builder = if let Some(ref config_file) = self.config_file {
            Self::add_file_source(builder, config_file, true)?
        } else {
            self.build_layered_config(builder)?
        };

        // CHAT_SERVER__PORT -> server.port
        let builder = Self::add_env_source(builder);
        let builder = Self::add_deployment_overrides(builder)?;

        builder.build().map_err(ConfigError::from)
    }

    /// Build layered configuration from multiple files
    fn build_layered_config(&self, builder: Builder) -> Result<Builder, ConfigError> {
        let default_path = self.config_dir.join("default.toml");
        let builder = Self::add_file_source(builder, &default_path, true)?;

        let env_path = self.config_dir.join(self.environment.config_file_name());
        let builder = Self::add_file_source(builder, &env_path, false)?;

        let local_path = self.config_dir.join("local.toml");
        Self::add_file_source(builder, &local_path, false)
    }

    /// Add a file source to the config builder
    fn add_file_source(
        builder: Builder,
        path: &Path,
        required: bool,
    ) -> Result<Builder, ConfigError> {
        if required && !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        Ok(builder.add_source(
            File::new(path.to_str().unwrap_or_default(), FileFormat::Toml).required(required),
        ))
    }

    /// Add environment variable source to the config builder
    ///
    /// Environment variables with prefix `CHAT_` are mapped to configuration keys.
    /// Double underscores (`__`) are used as separators for nested keys.
    ///
    /// Examples:
    /// - `CHAT_SERVER__PORT` -> `server.port`
    /// - `CHAT_CORS__CLIENT_URL` -> `cors.client_url`
    fn add_env_source(builder: Builder) -> Builder {
        builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .ignore_empty(true)
                .try_parsing(true),
        )
    }

    /// Apply the unprefixed variables every hosting platform sets.
    ///
    /// Empty values are ignored.
    fn add_deployment_overrides(builder: Builder) -> Result<Builder, ConfigError> {
        let port = non_empty_env(PORT_ENV).map(|raw| parse_port(&raw)).transpose()?;

        let builder = builder
            .set_override_option("server.port", port.map(i64::from))?
            .set_override_option("cors.client_url", non_empty_env(CLIENT_URL_ENV))?
            .set_override_option("database.url", non_empty_env(DATABASE_URL_ENV))?;

        Ok(builder)
    }
}

fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    raw.trim()
        .parse::<u16>()
        .ok()
        .filter(|port| *port > 0)
        .ok_or_else(|| ConfigError::InvalidEnvVar {
            var: PORT_ENV,
            value: raw.to_string(),
            expected: "a port number between 1 and 65535",
        })
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            config_file: None,
            environment: AppEnvironment::default(),
        })
    }
}
