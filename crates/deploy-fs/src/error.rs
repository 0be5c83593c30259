//! Error types for deploy-fs

use std::path::PathBuf;

/// Result type for deploy-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in deploy-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{field}: {message}")]
    InvalidArgument { field: String, message: String },

    #[error("{what} does not exist: {path}")]
    NotFound { what: String, path: String },

    #[error("Failed to parse {format} config at {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported config format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(what: impl Into<String>, path: impl Into<String>) -> Self {
        Self::NotFound {
            what: what.into(),
            path: path.into(),
        }
    }
}
