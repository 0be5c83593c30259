//! Error types for deploy-content

use std::path::PathBuf;

/// Result type for deploy-content operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while collecting or rendering content
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Fs(#[from] deploy_fs::Error),

    #[error(
        "No static content found in {project}. Add some HTML, CSS, or JS files."
    )]
    NoContent { project: String },

    #[error("Template bundle not found: {}", path.display())]
    TemplateNotFound { path: PathBuf },

    #[error("Template file {} is unreadable: {message}", path.display())]
    TemplateRead { path: PathBuf, message: String },

    #[error("Malformed static content at line {line}: {message}")]
    Parse { line: usize, message: String },
}

impl Error {
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}
