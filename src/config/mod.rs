//! Configuration management module for chat-server
//!
//! This module provides layered configuration loading with support for:
//! - TOML configuration files
//! - Environment variable overrides
//! - Multiple environment configurations (development, test, staging, production)
//!
//! # Configuration Priority (lowest to highest)
//! 1. `default.toml` - Base default configuration
//! 2. `{environment}.toml` - Environment-specific configuration
//! 3. `local.toml` - Local development overrides (not committed to version control)
//! 4. `CHAT_*` environment variables
//! 5. `PORT`, `CLIENT_URL` and `DATABASE_URL`

pub mod environment;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use environment::Environment;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use settings::{
    ApplicationConfig, ConsoleSettings, CorsConfig, DatabaseConfig, FileSettings,
    FrontendConfig, LoggerSettings, RotationSettings, ServerConfig, Settings,
};
