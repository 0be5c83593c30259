//! Well-known names for the rendered bundle on disk.

use std::path::Path;

/// Label applied to every workload this system creates.
pub const MANAGED_BY_LABEL: &str = "managed-by=roobrowser";

/// Directory names that are never walked when collecting content.
pub const EXCLUDED_DIRS: &[&str] = &["node_modules"];

/// Standard bundle markers and paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundlePath {
    /// The `.roobrowser` marker directory inside a project
    MarkerDir,
    /// The `skaffold` bundle directory inside the marker directory
    BundleDir,
    /// The primary manifest the orchestrator reads
    PrimaryManifest,
}

impl BundlePath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MarkerDir => ".roobrowser",
            Self::BundleDir => "skaffold",
            Self::PrimaryManifest => "skaffold.yaml",
        }
    }
}

impl AsRef<Path> for BundlePath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for BundlePath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for BundlePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
