//! Error types for tsbuild
//!
//! This module defines all error types used throughout the application,
//! providing detailed error information for debugging and user feedback.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for tsbuild operations
#[derive(Error, Debug)]
pub enum TsBuildError {
    /// I/O error during file operations
    #[error("I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// User configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// tsconfig.json could not be located
    #[error("tsconfig file '{name}' not found in '{search_root}' or any parent directory")]
    TsConfigNotFound {
        name: PathBuf,
        search_root: PathBuf,
    },

    /// tsconfig.json parsing or resolution error
    #[error("tsconfig error at '{path}': {message}")]
    TsConfig { path: PathBuf, message: String },

    /// Invalid glob pattern
    #[error("Invalid glob pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// The esbuild binary is not installed or not on PATH
    #[error("esbuild not found: {0}")]
    BundlerNotFound(String),

    /// The esbuild invocation exited with a non-zero status
    #[error("esbuild failed with {status}:\n{stderr}")]
    BundlerFailed { status: String, stderr: String },

    /// No source files to transpile
    #[error("no source files found: tsconfig matched nothing and no entry points were configured")]
    NoEntryPoints,
}

impl TsBuildError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Create a tsconfig error with path context
    pub fn tsconfig(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::TsConfig {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid-pattern error
    pub fn pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Get the path associated with this error, if any
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } | Self::TsConfig { path, .. } => Some(path),
            Self::TsConfigNotFound { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Result type alias for tsbuild operations
pub type Result<T> = std::result::Result<T, TsBuildError>;

impl From<std::io::Error> for TsBuildError {
    fn from(err: std::io::Error) -> Self {
        TsBuildError::Io {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<globset::Error> for TsBuildError {
    fn from(err: globset::Error) -> Self {
        TsBuildError::InvalidPattern {
            pattern: err.glob().unwrap_or("<set>").to_string(),
            message: err.kind().to_string(),
        }
    }
}

/// Extension trait for adding path context to std::io::Result
pub trait IoResultExt<T> {
    /// Add path context to an I/O error
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| TsBuildError::io(path, e))
    }
}
