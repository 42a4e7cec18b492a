//! Error types for Flora Map

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for Flora Map
#[derive(Debug, Error)]
pub enum FloraError {
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors that end a load attempt.
///
/// Rows with unusable coordinates are not errors; they are skipped and
/// counted in [`LoadReport`](crate::LoadReport).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Dataset unreachable at {path}: {reason}")]
    Unreachable { path: PathBuf, reason: String },

    #[error("Dataset contains no usable rows")]
    Empty,

    #[error("Dataset could not be decoded: {0}")]
    Malformed(String),
}

impl LoadError {
    /// Short machine-friendly name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            LoadError::Unreachable { .. } => "unreachable",
            LoadError::Empty => "empty",
            LoadError::Malformed(_) => "malformed",
        }
    }
}

impl From<csv::Error> for LoadError {
    fn from(err: csv::Error) -> Self {
        LoadError::Malformed(err.to_string())
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::Malformed(err.to_string())
    }
}

/// Errors related to configuration files
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {reason}")]
    Io { path: PathBuf, reason: String },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Result type alias for Flora operations
pub type FloraResult<T> = Result<T, FloraError>;
