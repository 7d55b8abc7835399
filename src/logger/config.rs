//! Runtime configuration for the logger
//!
//! These types are built from `config::LoggerSettings` once the settings tree
//! has been loaded and are validated on construction.

use std::path::PathBuf;
use std::str::FromStr;

use jiff::tz::TimeZone;
use jiff::{SignedDuration, Timestamp, ToSpan};
use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::logger::error::LoggerError;

/// Main logger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerConfig {
    pub console: ConsoleConfig,
    pub file: FileConfig,
    /// Default filter level; `RUST_LOG` takes precedence when set
    pub level: String,
}

impl LoggerConfig {
    /// Create a new logger configuration with validation
    pub fn new(console: ConsoleConfig, file: FileConfig, level: String) -> Result<Self, LoggerError> {
        let config = Self {
            console,
            file,
            level,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), LoggerError> {
        self.parse_level()?;
        self.file.validate()?;

        if !self.console.enabled && !self.file.enabled {
            return Err(LoggerError::config(
                "At least one output (console or file) must be enabled",
            ));
        }

        Ok(())
    }

    /// Parse the level string into a `tracing::Level`
    pub fn parse_level(&self) -> Result<Level, LoggerError> {
        match self.level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => Err(LoggerError::config(format!(
                "Invalid log level '{}'. Valid levels are: trace, debug, info, warn, error",
                self.level
            ))),
        }
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            console: ConsoleConfig::default(),
            file: FileConfig::default(),
            level: "info".to_string(),
        }
    }
}

/// Console output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    pub enabled: bool,
    /// Colors are only emitted when stdout is a terminal
    pub colored: bool,
}

impl ConsoleConfig {
    pub fn new(enabled: bool, colored: bool) -> Self {
        Self { enabled, colored }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            colored: true,
        }
    }
}

/// File output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    pub enabled: bool,
    pub path: PathBuf,
    pub append: bool,
    pub format: LogFormat,
    pub rotation: RotationConfig,
}

impl FileConfig {
    /// Create a new file configuration with validation
    pub fn new(
        enabled: bool,
        path: PathBuf,
        append: bool,
        format: LogFormat,
        rotation: RotationConfig,
    ) -> Result<Self, LoggerError> {
        let config = Self {
            enabled,
            path,
            append,
            format,
            rotation,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate file configuration.
    ///
    /// Does not touch the filesystem; the writer creates directories.
    pub fn validate(&self) -> Result<(), LoggerError> {
        if !self.enabled {
            return Ok(());
        }

        if self.path.as_os_str().is_empty() {
            return Err(LoggerError::config(
                "File path cannot be empty when file output is enabled",
            ));
        }

        self.rotation.validate()
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: PathBuf::from("logs/app.log"),
            append: true,
            format: LogFormat::Json,
            rotation: RotationConfig::default(),
        }
    }
}

/// Log line format for file output
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(LogFormat::Full),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => Err(LoggerError::format(format!(
                "Invalid log format '{}'. Valid formats are: full, compact, json",
                s
            ))),
        }
    }
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Full => "full",
            LogFormat::Compact => "compact",
            LogFormat::Json => "json",
        }
    }
}

/// File rotation configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RotationConfig {
    pub strategy: RotationStrategy,
    /// Bytes written before a size-based rotation
    pub max_size: u64,
    /// Rotated files kept next to the active log
    pub max_files: usize,
    /// Gzip rotated files
    pub compress: bool,
}

impl RotationConfig {
    /// Create a new rotation configuration with validation
    pub fn new(
        strategy: RotationStrategy,
        max_size: u64,
        max_files: usize,
        compress: bool,
    ) -> Result<Self, LoggerError> {
        let config = Self {
            strategy,
            max_size,
            max_files,
            compress,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), LoggerError> {
        if self.max_size == 0 {
            return Err(LoggerError::rotation("Maximum file size must be greater than 0"));
        }
        if self.max_files == 0 {
            return Err(LoggerError::rotation(
                "Maximum number of files must be greater than 0",
            ));
        }
        Ok(())
    }
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            strategy: RotationStrategy::Size,
            max_size: 10 * 1024 * 1024,
            max_files: 5,
            compress: false,
        }
    }
}

/// When the active log file is rotated
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum RotationStrategy {
    #[default]
    Size,
    Time(TimeUnit),
    /// Never rotates on write; only caps the number of kept files
    Count,
    /// Size or daily, whichever comes first
    Combined,
}

/// Period for time-based rotation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TimeUnit {
    Hourly,
    Daily,
    Weekly,
    Monthly,
}

impl TimeUnit {
    /// Length of the rotation period starting at `from`.
    ///
    /// Monthly periods follow the calendar (in UTC), so February is shorter
    /// than March. Falls back to 30 days if the date arithmetic overflows.
    pub fn duration_from(&self, from: Timestamp) -> SignedDuration {
        match self {
            TimeUnit::Hourly => SignedDuration::from_hours(1),
            TimeUnit::Daily => SignedDuration::from_hours(24),
            TimeUnit::Weekly => SignedDuration::from_hours(24 * 7),
            TimeUnit::Monthly => from
                .to_zoned(TimeZone::UTC)
                .checked_add(1.month())
                .map(|next| next.timestamp().duration_since(from))
                .unwrap_or(SignedDuration::from_hours(24 * 30)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(LoggerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_log_level() {
        let config = LoggerConfig {
            level: "verbose".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(LoggerError::Config { .. })));
    }

    #[test]
    fn test_both_outputs_disabled() {
        let result = LoggerConfig::new(
            ConsoleConfig::new(false, false),
            FileConfig::default(),
            "info".to_string(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_enabled_file_requires_path() {
        let result = FileConfig::new(
            true,
            PathBuf::new(),
            true,
            LogFormat::Json,
            RotationConfig::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rotation_config_validation() {
        assert!(RotationConfig::new(RotationStrategy::Size, 0, 5, false).is_err());
        assert!(RotationConfig::new(RotationStrategy::Size, 1024, 0, false).is_err());
        assert!(RotationConfig::new(RotationStrategy::Combined, 1024, 3, true).is_ok());
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert_eq!("full".parse::<LogFormat>().unwrap().as_str(), "full");
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_fixed_time_units() {
        let now = Timestamp::now();
        assert_eq!(TimeUnit::Hourly.duration_from(now), SignedDuration::from_secs(3600));
        assert_eq!(TimeUnit::Daily.duration_from(now), SignedDuration::from_secs(86400));
        assert_eq!(TimeUnit::Weekly.duration_from(now), SignedDuration::from_secs(604800));
    }

    #[test]
    fn test_monthly_follows_calendar() {
        let feb: Timestamp = "2025-02-01T00:00:00Z".parse().unwrap();
        let mar: Timestamp = "2025-03-01T00:00:00Z".parse().unwrap();
        assert_eq!(
            TimeUnit::Monthly.duration_from(feb),
            SignedDuration::from_hours(24 * 28)
        );
        assert_eq!(
            TimeUnit::Monthly.duration_from(mar),
            SignedDuration::from_hours(24 * 31)
        );
    }
}
