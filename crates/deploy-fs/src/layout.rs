//! Bundle layout for one deployment target
//!
//! A target's bundle always lives at `<project>/.roobrowser/skaffold/`.
//! Lifecycle state is never stored; it is read back from this layout.

use std::path::{Path, PathBuf};

use crate::constants::BundlePath;
use crate::{Error, Result};

/// Where a project's rendered bundle lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleLayout {
    /// Workspace-relative project path, as the caller supplied it
    project_path: String,
    /// Absolute project directory
    project_dir: PathBuf,
}

/// Lifecycle state of a target, inferred from the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    /// No bundle directory yet
    Unscaffolded,
    /// Bundle directory exists but the primary manifest is missing
    Incomplete,
    /// Bundle and primary manifest exist; deploy and cleanup are legal
    Scaffolded,
}

impl BundleLayout {
    pub fn new(project_path: impl Into<String>, project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_path: project_path.into(),
            project_dir: project_dir.into(),
        }
    }

    pub fn project_path(&self) -> &str {
        &self.project_path
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// `<project>/.roobrowser/skaffold`
    pub fn bundle_dir(&self) -> PathBuf {
        self.project_dir
            .join(BundlePath::MarkerDir.as_str())
            .join(BundlePath::BundleDir.as_str())
    }

    /// `<project>/.roobrowser/skaffold/skaffold.yaml`
    pub fn manifest_path(&self) -> PathBuf {
        self.bundle_dir().join(BundlePath::PrimaryManifest.as_str())
    }

    /// Bundle location relative to the workspace root, for messages.
    pub fn display_bundle_dir(&self) -> String {
        format!(
            "{}/{}/{}/",
            self.project_path.trim_end_matches('/'),
            BundlePath::MarkerDir,
            BundlePath::BundleDir
        )
    }

    /// Inspect the filesystem for the target's state.
    pub fn state(&self) -> TargetState {
        if !self.bundle_dir().is_dir() {
            TargetState::Unscaffolded
        } else if !self.manifest_path().is_file() {
            TargetState::Incomplete
        } else {
            TargetState::Scaffolded
        }
    }

    /// Require the bundle directory to exist.
    pub fn require_bundle(&self) -> Result<PathBuf> {
        let dir = self.bundle_dir();
        if !dir.is_dir() {
            return Err(Error::not_found(
                "Bundle directory (run scaffold_configmap_app first)",
                self.display_bundle_dir(),
            ));
        }
        Ok(dir)
    }

    /// Require both the bundle directory and its primary manifest.
    pub fn require_manifest(&self) -> Result<PathBuf> {
        let dir = self.require_bundle()?;
        if !self.manifest_path().is_file() {
            return Err(Error::not_found(
                "Primary manifest",
                format!(
                    "{}{}",
                    self.display_bundle_dir(),
                    BundlePath::PrimaryManifest
                ),
            ));
        }
        Ok(dir)
    }
}
