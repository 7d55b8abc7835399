//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// HTTP server for the chat application
#[derive(Parser, Debug)]
#[command(name = "chat-server")]
#[command(about = "HTTP server for the chat application")]
#[command(long_about = "
chat-server hosts the chat application's JSON API under /api and, in
production, the built single-page frontend.

EXAMPLES:
    # Start the server with default configuration
    chat-server

    # Start server on a custom port
    chat-server serve --port 8080

    # Use a custom configuration file
    chat-server --config /etc/chat-server/production.toml serve

    # Serve the built frontend the way production does
    chat-server --env production serve

    # Check configuration without starting the server
    chat-server serve --dry-run

PORT, NODE_ENV and CLIENT_URL are read from the environment (or a .env file).
")]
#[command(version = crate::clap_long_version())]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    ///
    /// Load this single TOML file instead of the layered files under `config/`.
    ///
    /// Example: --config /etc/chat-server/production.toml
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection
    ///
    /// Takes precedence over NODE_ENV. Production enables static frontend
    /// serving and restricts CORS to CLIENT_URL.
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Enable verbose logging
    ///
    /// Raises the log level to debug. Cannot be used with --quiet.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    ///
    /// Lowers the log level to error. Cannot be used with --verbose.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web server (default)
    ///
    /// Examples:
    ///   chat-server serve                      # Start with defaults
    ///   chat-server serve --port 8080          # Listen on port 8080
    ///   chat-server serve --dry-run            # Validate config without starting
    Serve {
        /// Host address to bind to
        ///
        /// Use 127.0.0.1 for localhost only, or 0.0.0.0 to accept
        /// connections from any interface.
        ///
        /// Default: 0.0.0.0
        #[arg(long, value_name = "ADDRESS", value_parser = super::validation::validate_host_address)]
        host: Option<String>,

        /// Port number to listen on
        ///
        /// Overrides PORT and the configuration files.
        ///
        /// Default: 5001
        #[arg(short, long, value_name = "PORT", value_parser = super::validation::validate_port)]
        port: Option<u16>,

        /// Log level override
        ///
        /// Overrides the configuration files and the global --verbose/--quiet flags.
        #[arg(long, value_enum)]
        log_level: Option<LogLevel>,

        /// Validate configuration and exit
        ///
        /// Prints the resolved bind address, CORS origins and static serving
        /// decision without starting the server.
        #[arg(long)]
        dry_run: bool,
    },
}

/// Environment options
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "production", alias = "prod")]
    Production,
    #[value(name = "staging", alias = "stage")]
    Staging,
    #[value(name = "test")]
    Test,
}

/// Log level options
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum LogLevel {
    #[value(name = "error")]
    Error,
    #[value(name = "warn", alias = "warning")]
    Warn,
    #[value(name = "info")]
    Info,
    #[value(name = "debug")]
    Debug,
    #[value(name = "trace")]
    Trace,
}

impl Cli {
    /// Validate argument combinations clap cannot express
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use --verbose and --quiet together".to_string());
        }

        Ok(())
    }

    /// Whether the invocation only checks configuration
    pub fn is_dry_run(&self) -> bool {
        matches!(self.command, Some(Commands::Serve { dry_run: true, .. }))
    }

    /// Get detailed help for validation errors
    pub fn get_validation_help() -> &'static str {
        r#"
Common validation errors and solutions:

Port validation:
  - Port must be between 1 and 65535
  - Ports below 1024 require root privileges on most systems
  - Example: --port 8080

Host validation:
  - Use 'localhost' or '127.0.0.1' for local access only
  - Use '0.0.0.0' to accept connections from any interface
  - Example: --host 0.0.0.0

Configuration file validation:
  - File must exist and be readable
  - File must be in TOML format
  - Example: --config /path/to/config.toml

For more help, use: chat-server help <subcommand>
"#
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => "error".to_string(),
            LogLevel::Warn => "warn".to_string(),
            LogLevel::Info => "info".to_string(),
            LogLevel::Debug => "debug".to_string(),
            LogLevel::Trace => "trace".to_string(),
        }
    }
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Production => crate::config::Environment::Production,
            Environment::Staging => crate::config::Environment::Staging,
            Environment::Test => crate::config::Environment::Test,
        }
    }
}
