//! Error types for the MCP server
//!
//! Lower-crate errors are folded into one taxonomy here. The dispatcher
//! renders any of them as a single `❌ Error: ` line for the caller.

use thiserror::Error;

/// Result type alias for MCP operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or missing input
    #[error("{0}")]
    InvalidArgument(String),

    /// Project directory, bundle directory or manifest absent
    #[error("{0}")]
    NotFound(String),

    /// Content discovery found nothing to deploy
    #[error("{0}")]
    NoContent(String),

    /// Template bundle missing or malformed
    #[error("{0}")]
    TemplateError(String),

    /// `skaffold` apply or delete failed or timed out
    #[error("{0}")]
    DeploymentFailed(String),

    /// `kubectl` query failed or timed out
    #[error("{0}")]
    QueryFailed(String),

    /// Tool name not recognized
    #[error("Unknown tool: {0}")]
    UnknownOperation(String),

    /// Error during JSON serialization/deserialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Stable name of the error class, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "InvalidArgument",
            Self::NotFound(_) => "NotFound",
            Self::NoContent(_) => "NoContent",
            Self::TemplateError(_) => "TemplateError",
            Self::DeploymentFailed(_) => "DeploymentFailed",
            Self::QueryFailed(_) => "QueryFailed",
            Self::UnknownOperation(_) => "UnknownOperation",
            Self::Json(_) => "Json",
            Self::Io(_) => "Io",
        }
    }
}

impl From<deploy_fs::Error> for Error {
    fn from(err: deploy_fs::Error) -> Self {
        use deploy_fs::Error as FsError;
        match err {
            FsError::InvalidArgument { .. }
            | FsError::ConfigParse { .. }
            | FsError::UnsupportedFormat { .. } => Self::InvalidArgument(err.to_string()),
            FsError::NotFound { .. } => Self::NotFound(err.to_string()),
            FsError::Io { .. } | FsError::LockFailed { .. } => {
                Self::Io(std::io::Error::other(err.to_string()))
            }
        }
    }
}

impl From<deploy_content::Error> for Error {
    fn from(err: deploy_content::Error) -> Self {
        use deploy_content::Error as ContentError;
        match err {
            ContentError::Fs(inner) => inner.into(),
            ContentError::NoContent { .. } => Self::NoContent(err.to_string()),
            ContentError::TemplateNotFound { .. }
            | ContentError::TemplateRead { .. }
            | ContentError::Parse { .. } => Self::TemplateError(err.to_string()),
        }
    }
}

impl From<deploy_driver::Error> for Error {
    fn from(err: deploy_driver::Error) -> Self {
        use deploy_driver::Error as DriverError;
        match err {
            DriverError::Fs(inner) => inner.into(),
            DriverError::DeploymentFailed { .. } => Self::DeploymentFailed(err.to_string()),
            DriverError::QueryFailed { .. } => Self::QueryFailed(err.to_string()),
        }
    }
}
