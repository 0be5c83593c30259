//! Error types for deploy-driver

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Fs(#[from] deploy_fs::Error),

    /// `skaffold` exited non-zero, timed out, or could not be started
    #[error("{action} failed: {reason}")]
    DeploymentFailed { action: String, reason: String },

    /// `kubectl` exited non-zero, timed out, or could not be started
    #[error("Failed to {action}: {reason}")]
    QueryFailed { action: String, reason: String },
}

impl Error {
    pub fn deployment(action: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DeploymentFailed {
            action: action.into(),
            reason: reason.into(),
        }
    }

    pub fn query(action: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::QueryFailed {
            action: action.into(),
            reason: reason.into(),
        }
    }
}
