//! Content Collector
//!
//! Best-effort: a file that cannot be read is skipped with a warning, and
//! collection only fails when nothing usable was found.

use std::fs;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use deploy_fs::NormalizedPath;

use crate::asset::{AssetKind, ContentSet, StaticAsset};
use crate::walk::{CandidateFile, ProjectWalk};
use crate::{Error, Result};

/// An allow-listed file that could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: NormalizedPath,
    pub reason: String,
}

/// Output of a collection run.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    pub content: ContentSet,
    pub skipped: Vec<SkippedFile>,
}

/// Collect every allow-listed file under `project_dir`.
///
/// Returns [`Error::NoContent`] when the resulting set is empty.
pub fn collect(project_dir: &Path) -> Result<Collection> {
    let mut collection = Collection::default();

    for item in ProjectWalk::new(project_dir) {
        let candidate = match item {
            Ok(candidate) => candidate,
            Err(e) if e.directory => {
                tracing::warn!(path = %e.relative, error = %e.message, "Skipping unreadable directory");
                continue;
            }
            Err(e) => {
                if AssetKind::classify(&e.relative).is_some() {
                    tracing::warn!(path = %e.relative, error = %e.message, "Skipping unreadable file");
                    collection.skipped.push(SkippedFile {
                        path: e.relative,
                        reason: e.message,
                    });
                } else {
                    tracing::debug!(path = %e.relative, error = %e.message, "Ignoring unreadable path");
                }
                continue;
            }
        };

        let Some(kind) = AssetKind::classify(&candidate.relative) else {
            continue;
        };

        match read_asset(&candidate, kind) {
            Ok(asset) => {
                collection.content.insert(asset);
            }
            Err(reason) => {
                tracing::warn!(path = %candidate.relative, error = %reason, "Skipping unreadable file");
                collection.skipped.push(SkippedFile {
                    path: candidate.relative,
                    reason,
                });
            }
        }
    }

    if collection.content.is_empty() {
        return Err(Error::NoContent {
            project: project_dir.display().to_string(),
        });
    }

    tracing::debug!(
        files = collection.content.len(),
        skipped = collection.skipped.len(),
        "Collected static content"
    );
    Ok(collection)
}

fn read_asset(candidate: &CandidateFile, kind: AssetKind) -> std::result::Result<StaticAsset, String> {
    let content = match kind {
        AssetKind::Binary => {
            let bytes = fs::read(&candidate.absolute).map_err(|e| e.to_string())?;
            STANDARD.encode(bytes)
        }
        AssetKind::Text => fs::read_to_string(&candidate.absolute).map_err(|e| e.to_string())?,
    };

    Ok(StaticAsset {
        path: candidate.relative.clone(),
        kind,
        content,
    })
}
