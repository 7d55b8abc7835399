//! Configuration merger for CLI arguments and config files
//!
//! CLI arguments override every file and environment variable source.

use super::parser::{Cli, Commands};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, Environment, Settings};
use std::path::Path;

/// Applies CLI overrides on top of file-based configuration
pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    /// Create a new configuration merger with base configuration
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Load the base configuration for `cli`
    ///
    /// `--config` selects a single file and `--env` replaces `NODE_ENV`;
    /// otherwise the default layered loader is used.
    ///
    /// # Errors
    /// Returns ConfigError if configuration loading or validation fails
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        Self::load(cli.config.as_deref(), cli.env.map(Environment::from))
    }

    fn load(config_path: Option<&Path>, environment: Option<Environment>) -> Result<Self, ConfigError> {
        let mut loader = ConfigLoader::new()?;

        if let Some(path) = config_path {
            Self::validate_config_file_access(path)?;
            loader = loader.with_config_file(path);
        }
        if let Some(environment) = environment {
            loader = loader.with_environment(environment);
        }

        Ok(Self::new(loader.load()?))
    }

    /// Validate that the configuration file is accessible and readable
    fn validate_config_file_access(path: &Path) -> Result<(), ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::validation(
                "config_file".to_string(),
                format!("Configuration file does not exist: '{}'", path.display()),
            ));
        }

        std::fs::File::open(path).map(|_| ()).map_err(|e| {
            ConfigError::validation(
                "config_file".to_string(),
                format!("Cannot read configuration file '{}': {}", path.display(), e),
            )
        })
    }

    /// Merge CLI arguments with the base configuration
    ///
    /// Command-specific flags win over global ones.
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }

        if let Some(ref command) = cli.command {
            Self::apply_command_overrides(&mut config, command);
        }

        config.validate()?;

        Ok(config)
    }

    fn apply_command_overrides(config: &mut Settings, command: &Commands) {
        match command {
            Commands::Serve {
                host,
                port,
                log_level,
                dry_run: _,
            } => {
                if let Some(host_addr) = host {
                    config.server.host = host_addr.clone();
                }
                if let Some(port_num) = port {
                    config.server.port = *port_num;
                }
                if let Some(level) = log_level {
                    config.logger.level = (*level).into();
                }
            }
        }
    }

    /// Get the base configuration
    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}
