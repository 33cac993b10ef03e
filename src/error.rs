//! Structured error types for configuration store operations.

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error categories for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad caller input, raised before any I/O.
    InvalidArgument,
    /// A persisted file is not a valid JSON object.
    Parse,
    /// Filesystem failure.
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InvalidArgument => write!(f, "invalid argument"),
            ErrorKind::Parse => write!(f, "parse error"),
            ErrorKind::Io => write!(f, "I/O error"),
        }
    }
}

/// Error raised by the configuration store.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    InvalidArgument { field: &'static str, reason: String },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{} is not a JSON object", .path.display())]
    NotAnObject { path: PathBuf },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// The category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfigError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            ConfigError::Parse { .. } | ConfigError::NotAnObject { .. } => ErrorKind::Parse,
            ConfigError::Io { .. } => ErrorKind::Io,
        }
    }

    // Convenience constructors

    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidArgument {
            field,
            reason: reason.into(),
        }
    }

    pub fn parse(path: &Path, source: serde_json::Error) -> Self {
        ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn not_an_object(path: &Path) -> Self {
        ConfigError::NotAnObject {
            path: path.to_path_buf(),
        }
    }

    pub fn io(path: &Path, source: std::io::Error) -> Self {
        ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result type for configuration store operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
