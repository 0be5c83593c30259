//! Input validation for names and paths
//!
//! Every check here runs before any filesystem write or process spawn.
//! `app_name` and `project_path` both flow into external command lines and
//! the on-disk layout, so they are constrained here rather than escaped later.

use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::{Error, Result};

static APP_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").unwrap());

/// Check that `name` is a lowercase alphanumeric-with-hyphens token.
pub fn validate_app_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::invalid("app_name", "is required"));
    }
    if !APP_NAME_PATTERN.is_match(name) {
        return Err(Error::invalid(
            "app_name",
            format!(
                "'{}' must be lowercase alphanumeric with hyphens only",
                name
            ),
        ));
    }
    Ok(())
}

/// Check that an ingress path starts with `/`.
pub fn validate_ingress_path(path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(Error::invalid("ingress_path", "is required"));
    }
    if !path.starts_with('/') {
        return Err(Error::invalid(
            "ingress_path",
            format!("'{}' must start with /", path),
        ));
    }
    Ok(())
}

/// Resolve a workspace-relative project path to an existing directory.
///
/// A leading `/` is accepted and treated as workspace-relative. Parent
/// segments are rejected outright, and the canonical result must still lie
/// under the canonical workspace root (symlinks cannot escape it).
pub fn resolve_project_dir(workspace_root: &Path, project_path: &str) -> Result<PathBuf> {
    let trimmed = project_path.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid("project_path", "is required"));
    }

    let relative = Path::new(trimmed.trim_start_matches(['/', '\\']));
    for component in relative.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => {
                return Err(Error::invalid(
                    "project_path",
                    format!("'{}' must not contain '..' segments", project_path),
                ));
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(Error::invalid(
                    "project_path",
                    format!("'{}' must be relative to the workspace root", project_path),
                ));
            }
        }
    }

    let candidate = workspace_root.join(relative);
    if !candidate.is_dir() {
        return Err(Error::not_found("Project directory", project_path));
    }

    let root = dunce::canonicalize(workspace_root).map_err(|e| Error::io(workspace_root, e))?;
    let resolved = dunce::canonicalize(&candidate).map_err(|e| Error::io(&candidate, e))?;
    if !resolved.starts_with(&root) {
        return Err(Error::invalid(
            "project_path",
            format!("'{}' resolves outside the workspace root", project_path),
        ));
    }

    tracing::debug!(project_path, resolved = %resolved.display(), "Resolved project directory");
    Ok(resolved)
}
