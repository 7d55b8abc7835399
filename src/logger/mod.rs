//! Logging built on `tracing-subscriber`
//!
//! - Console output with optional colors
//! - File output in full, compact or JSON format
//! - Size, time, count or combined rotation of the log file
//! - Gzip compression of rotated files
//! - Fallback to stderr when the log file becomes unwritable

pub mod compression;
pub mod config;
pub mod error;
pub mod rotation;
pub(crate) mod writer;

pub use config::*;
pub use error::LoggerError;

use std::io::IsTerminal;

use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use writer::RotatingFileWriter;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber described by `config`.
///
/// `RUST_LOG`, when set, replaces `config.level` as the filter.
pub fn init_logger(config: LoggerConfig) -> anyhow::Result<()> {
    config.validate()?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let layers = build_layers(&config)?;

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| LoggerError::Init {
            message: e.to_string(),
        })?;

    Ok(())
}

fn build_layers(config: &LoggerConfig) -> Result<Vec<BoxedLayer>, LoggerError> {
    let mut layers = Vec::with_capacity(2);

    // The file layer goes first so span fields are not formatted with the
    // console's ANSI codes (tokio-rs/tracing#1817).
    if config.file.enabled {
        layers.push(file_layer(&config.file)?);
    }

    if config.console.enabled {
        let ansi = config.console.colored && std::io::stdout().is_terminal();
        layers.push(
            fmt::layer()
                .with_ansi(ansi)
                .with_target(true)
                .with_level(true)
                .boxed(),
        );
    }

    Ok(layers)
}

fn file_layer(config: &FileConfig) -> Result<BoxedLayer, LoggerError> {
    let writer = RotatingFileWriter::new(config)?;
    let base = fmt::layer().with_ansi(false).with_target(true);

    let layer = match config.format {
        LogFormat::Full => base.with_writer(writer).boxed(),
        LogFormat::Compact => base.compact().with_writer(writer).boxed(),
        LogFormat::Json => base.json().with_writer(writer).boxed(),
    };
    Ok(layer)
}
