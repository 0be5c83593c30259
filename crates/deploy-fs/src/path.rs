//! Normalized path handling for cross-platform compatibility

use std::path::{Path, PathBuf};

/// A path normalized to use forward slashes internally.
///
/// Content keys and bundle-relative file names must look the same on every
/// platform, so all paths are stored with forward slashes, with `.` and `..`
/// segments resolved, and converted to platform-native form only at I/O
/// boundaries.
///
/// For relative paths, leading `..` segments are dropped rather than kept,
/// so a normalized relative path can never climb above its base.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        Self {
            inner: clean(&path_str),
        }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment, resolving dot segments.
    pub fn join(&self, segment: &str) -> Self {
        let joined = if self.inner.is_empty() {
            segment.to_string()
        } else if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment)
        } else {
            format!("{}/{}", self.inner, segment)
        };
        Self {
            inner: clean(&joined),
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Get the extension if present, lowercased.
    ///
    /// Dotfiles such as `.env` have no extension.
    pub fn extension(&self) -> Option<String> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 || idx + 1 == name.len() {
                None
            } else {
                Some(name[idx + 1..].to_ascii_lowercase())
            }
        })
    }
}

/// Collapse separators and resolve `.`/`..` segments.
///
/// A leading `//` (but not `///`) is kept for network paths.
fn clean(raw: &str) -> String {
    let unified = raw.replace('\\', "/");
    let is_network = unified.starts_with("//") && !unified.starts_with("///");
    let is_absolute = unified.starts_with('/');

    let mut parts: Vec<&str> = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                // Above the root (absolute) or above the base (relative): drop it
                parts.pop();
            }
            other => parts.push(other),
        }
    }

    let body = parts.join("/");
    if is_network {
        format!("//{}", body)
    } else if is_absolute {
        format!("/{}", body)
    } else {
        body
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}
