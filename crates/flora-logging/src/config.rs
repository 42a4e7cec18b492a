//! Logging settings: console format, optional file output, JSONL shape.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Logging configuration consumed by [`FloraSubscriberBuilder`](crate::FloraSubscriberBuilder)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive used when RUST_LOG is unset
    pub default_level: String,

    /// Stderr/stdout output
    pub console: ConsoleConfig,

    /// JSONL file output, off when `None`
    pub file: Option<FileConfig>,

    /// Shape of JSONL records (console and file)
    pub jsonl: JsonlConfig,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_level: "info".to_string(),
            console: ConsoleConfig::default(),
            file: None,
            jsonl: JsonlConfig::default(),
        }
    }
}

impl LogConfig {
    /// Verbose, human-readable console output
    pub fn development() -> Self {
        Self {
            default_level: "debug".to_string(),
            console: ConsoleConfig {
                enabled: true,
                pretty: true,
                ansi: true,
            },
            ..Default::default()
        }
    }

    /// JSONL to rotated files only
    pub fn production(log_dir: PathBuf) -> Self {
        Self {
            default_level: "info".to_string(),
            console: ConsoleConfig {
                enabled: false,
                pretty: false,
                ansi: false,
            },
            file: Some(FileConfig {
                directory: log_dir,
                ..FileConfig::default()
            }),
            jsonl: JsonlConfig::default(),
        }
    }

    /// Minimal output for test runs
    pub fn testing() -> Self {
        Self {
            default_level: "warn".to_string(),
            console: ConsoleConfig {
                enabled: true,
                pretty: false,
                ansi: false,
            },
            ..Default::default()
        }
    }
}

/// Console sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Write to the console at all
    pub enabled: bool,
    /// Human-readable lines instead of JSONL
    pub pretty: bool,
    /// Colour escapes (pretty mode only)
    pub ansi: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            pretty: false, // JSONL by default
            ansi: false,
        }
    }
}

/// File sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Created if missing
    pub directory: PathBuf,
    pub prefix: String,
    pub rotation: RotationStrategy,
    /// Older rotated files beyond this count are deleted
    pub max_files: Option<usize>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./logs"),
            prefix: "flora".to_string(),
            rotation: RotationStrategy::Daily,
            max_files: Some(7),
        }
    }
}

impl FileConfig {
    /// Path of the log file when rotation is disabled
    pub fn single_file_path(&self) -> PathBuf {
        self.directory.join(format!("{}.log", self.prefix))
    }
}

/// When a new log file is started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RotationStrategy {
    #[default]
    Daily,
    Hourly,
    /// One `<prefix>.log`, truncated on start
    Never,
}

/// JSONL record options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonlConfig {
    /// Event fields at the top level instead of under `fields`
    pub flatten_events: bool,
    /// Every enclosing span
    pub include_spans: bool,
    /// The innermost span
    pub include_current_span: bool,
    /// Thread id and name
    pub include_thread_info: bool,
    /// Source file and line
    pub include_location: bool,
}

impl Default for JsonlConfig {
    fn default() -> Self {
        Self {
            flatten_events: true,
            include_spans: true,
            include_current_span: true,
            include_thread_info: false,
            include_location: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.default_level, "info");
        assert!(config.console.enabled);
        assert!(!config.console.pretty); // JSONL by default
        assert!(config.file.is_none());
    }

    #[test]
    fn test_development_config() {
        let config = LogConfig::development();
        assert_eq!(config.default_level, "debug");
        assert!(config.console.pretty);
        assert!(config.console.ansi);
    }

    #[test]
    fn test_production_config() {
        let config = LogConfig::production(PathBuf::from("/var/log/flora"));
        assert!(!config.console.enabled);
        let file = config.file.unwrap();
        assert_eq!(file.directory, PathBuf::from("/var/log/flora"));
        assert_eq!(file.prefix, "flora");
    }

    #[test]
    fn test_testing_config_is_quiet() {
        let config = LogConfig::testing();
        assert_eq!(config.default_level, "warn");
        assert!(!config.console.ansi);
    }

    #[test]
    fn test_single_file_path() {
        let file = FileConfig {
            directory: PathBuf::from("logs"),
            prefix: "viewer".to_string(),
            rotation: RotationStrategy::Never,
            max_files: None,
        };
        assert_eq!(file.single_file_path(), PathBuf::from("logs/viewer.log"));
    }
}
