//! Console and JSONL file logging for Flora Map
//!
//! Wraps `tracing-subscriber` with a small builder so every binary in the
//! workspace configures logging the same way.
//!
//! # Quick Start
//!
//! ```ignore
//! use flora_logging::{FloraSubscriberBuilder, LogConfig};
//!
//! // JSONL to console with defaults
//! let _guard = FloraSubscriberBuilder::new().init();
//!
//! // Pretty output while developing
//! let _guard = FloraSubscriberBuilder::new()
//!     .with_config(LogConfig::development())
//!     .init();
//! ```
//!
//! `RUST_LOG` always takes precedence over the configured default level.
//! Keep the returned guard alive for as long as file output should be
//! flushed.

pub mod config;

pub use config::{ConsoleConfig, FileConfig, JsonlConfig, LogConfig, RotationStrategy};

use std::fs::{self, File};
use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Errors raised while installing the subscriber
#[derive(Debug, Error)]
pub enum LogError {
    #[error("failed to create log file {path}: {source}")]
    File { path: PathBuf, source: io::Error },

    #[error("failed to create rolling appender: {0}")]
    Appender(#[from] InitError),

    #[error("a global subscriber is already installed")]
    AlreadyInitialized,
}

/// Builder for configuring and initializing the Flora logging subscriber
///
/// By default, console output uses JSONL format. Use `LogConfig::development()`
/// for human-readable pretty output.
pub struct FloraSubscriberBuilder {
    config: LogConfig,
}

impl FloraSubscriberBuilder {
    /// Create a new subscriber builder with default configuration
    pub fn new() -> Self {
        Self {
            config: LogConfig::default(),
        }
    }

    /// Use a specific configuration
    pub fn with_config(mut self, config: LogConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the default log level
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.config.default_level = level.into();
        self
    }

    /// Enable or disable console output
    pub fn with_console(mut self, enabled: bool) -> Self {
        self.config.console.enabled = enabled;
        self
    }

    /// Switch the console between pretty and JSONL output
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.config.console.pretty = pretty;
        self.config.console.ansi = pretty;
        self
    }

    /// Configure file output
    pub fn with_file_output(mut self, config: FileConfig) -> Self {
        self.config.file = Some(config);
        self
    }

    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    /// Install the subscriber globally.
    ///
    /// Returns the file writer guard when file output is configured.
    pub fn try_init(self) -> Result<Option<WorkerGuard>, LogError> {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.config.default_level));

        let console = &self.config.console;
        let jsonl = &self.config.jsonl;

        let pretty_layer = (console.enabled && console.pretty).then(|| {
            tracing_subscriber::fmt::layer()
                .with_ansi(console.ansi)
                .with_target(true)
        });

        let json_layer = (console.enabled && !console.pretty).then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(jsonl.include_current_span)
                .with_span_list(jsonl.include_spans)
                .flatten_event(jsonl.flatten_events)
                .with_file(jsonl.include_location)
                .with_line_number(jsonl.include_location)
                .with_thread_ids(jsonl.include_thread_info)
                .with_thread_names(jsonl.include_thread_info)
        });

        let (file_layer, guard) = match &self.config.file {
            Some(file_config) => {
                let (writer, guard) = file_writer(file_config)?;
                let layer = tracing_subscriber::fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_current_span(jsonl.include_current_span)
                    .with_span_list(jsonl.include_spans)
                    .flatten_event(jsonl.flatten_events)
                    .with_file(jsonl.include_location)
                    .with_line_number(jsonl.include_location)
                    .with_thread_ids(jsonl.include_thread_info)
                    .with_thread_names(jsonl.include_thread_info)
                    .with_writer(writer);
                (Some(layer), Some(guard))
            }
            None => (None, None),
        };

        Registry::default()
            .with(env_filter)
            .with(pretty_layer)
            .with(json_layer)
            .with(file_layer)
            .try_init()
            .map_err(|_| LogError::AlreadyInitialized)?;

        tracing::debug!(
            level = %self.config.default_level,
            file_output = guard.is_some(),
            "Logging initialized"
        );
        Ok(guard)
    }

    /// Install the subscriber globally, reporting failures on stderr.
    pub fn init(self) -> Option<WorkerGuard> {
        match self.try_init() {
            Ok(guard) => guard,
            Err(e) => {
                eprintln!("Warning: Failed to initialize logging: {}", e);
                None
            }
        }
    }
}

impl Default for FloraSubscriberBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Opens the non-blocking writer for `config`.
///
/// `Never` truncates a single file; the other strategies append to rolling
/// files named after the prefix.
fn file_writer(config: &FileConfig) -> Result<(NonBlocking, WorkerGuard), LogError> {
    let rotation = match config.rotation {
        RotationStrategy::Never => {
            let path = config.single_file_path();
            let file = fs::create_dir_all(&config.directory)
                .and_then(|_| File::create(&path))
                .map_err(|source| LogError::File { path, source })?;
            return Ok(tracing_appender::non_blocking(file));
        }
        RotationStrategy::Daily => Rotation::DAILY,
        RotationStrategy::Hourly => Rotation::HOURLY,
    };

    let mut builder = RollingFileAppender::builder()
        .rotation(rotation)
        .filename_prefix(&config.prefix)
        .filename_suffix("log");
    if let Some(max_files) = config.max_files {
        builder = builder.max_log_files(max_files);
    }
    let appender = builder.build(&config.directory)?;
    Ok(tracing_appender::non_blocking(appender))
}

/// Initialize logging for testing (minimal output). Safe to call repeatedly.
pub fn init_testing() {
    let _ = FloraSubscriberBuilder::new()
        .with_config(LogConfig::testing())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_creation() {
        let builder = FloraSubscriberBuilder::new();
        assert_eq!(builder.config().default_level, "info");
    }

    #[test]
    fn test_default_is_jsonl() {
        let builder = FloraSubscriberBuilder::new();
        assert!(!builder.config().console.pretty);
    }

    #[test]
    fn test_builder_with_config() {
        let builder = FloraSubscriberBuilder::new().with_config(LogConfig::development());
        assert_eq!(builder.config().default_level, "debug");
        assert!(builder.config().console.pretty);
    }

    #[test]
    fn test_builder_overrides() {
        let builder = FloraSubscriberBuilder::new()
            .with_level("trace")
            .with_console(false)
            .with_pretty(true);
        assert_eq!(builder.config().default_level, "trace");
        assert!(!builder.config().console.enabled);
        assert!(builder.config().console.ansi);
    }

    #[test]
    fn test_single_file_writer_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = FileConfig {
            directory: dir.path().join("nested"),
            prefix: "run".to_string(),
            rotation: RotationStrategy::Never,
            max_files: None,
        };

        let (_writer, _guard) = file_writer(&config).unwrap();
        assert!(config.single_file_path().exists());
    }

    #[test]
    fn test_rolling_writer_builds() {
        let dir = tempfile::tempdir().unwrap();
        let config = FileConfig {
            directory: dir.path().to_path_buf(),
            rotation: RotationStrategy::Hourly,
            ..FileConfig::default()
        };
        assert!(file_writer(&config).is_ok());
    }
}
