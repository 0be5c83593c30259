//! Bundle file I/O: staged writes, config reads, directory reset

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::{Error, NormalizedPath, Result};

/// Write one rendered bundle file in place of whatever is at `path`.
///
/// The bytes go to a hidden staging file next to the target, which is
/// renamed over it once flushed to disk. skaffold and kubectl reading the
/// bundle concurrently see either the previous manifest or the new one. A
/// failed write removes its staging file.
pub fn write_bundle_file(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let target = path.to_native();
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let staging = staging_path(&target);
    let result = stage(&staging, &target, content)
        .and_then(|()| fs::rename(&staging, &target).map_err(|e| Error::io(&target, e)));
    if result.is_err() {
        let _ = fs::remove_file(&staging);
    }
    result
}

/// `k8s/ingress.yaml` stages as `k8s/.ingress.yaml.<pid>.staging`.
fn staging_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    target.with_file_name(format!(".{}.{}.staging", name, std::process::id()))
}

/// Lock, fill and fsync the staging file. The lock ends when it is closed.
fn stage(staging: &Path, target: &Path, content: &[u8]) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(staging)
        .map_err(|e| Error::io(staging, e))?;
    file.lock_exclusive().map_err(|_| Error::LockFailed {
        path: target.to_path_buf(),
    })?;
    file.write_all(content)
        .and_then(|()| file.sync_all())
        .map_err(|e| Error::io(staging, e))
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Replace a directory with an empty one.
///
/// Anything previously under `dir` is removed, so a re-render never leaves
/// stale files behind.
pub fn reset_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    }
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))
}
