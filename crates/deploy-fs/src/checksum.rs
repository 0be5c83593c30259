//! SHA-256 checksum utilities
//!
//! Checksums use one format, `sha256:<hex>`. The bundle checksum lets
//! callers confirm that re-scaffolding with the same inputs produced
//! byte-identical output.

use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::{Error, NormalizedPath, Result};

/// Prefix for all checksums produced by this module
const PREFIX: &str = "sha256:";

/// Compute one checksum over every file under `dir`.
///
/// Files are visited in sorted relative-path order and both the path and
/// the bytes feed the digest, so renames change the result too.
pub fn compute_dir_checksum(dir: &Path) -> Result<String> {
    let mut files = Vec::new();
    collect_files(dir, dir, &mut files)?;
    files.sort();

    let mut hasher = Sha256::new();
    for relative in &files {
        let native = dir.join(relative.to_native());
        let content = fs::read(&native).map_err(|e| Error::io(&native, e))?;
        hasher.update(relative.as_str().as_bytes());
        hasher.update([0u8]);
        hasher.update((content.len() as u64).to_le_bytes());
        hasher.update(&content);
    }
    Ok(format!("{}{:x}", PREFIX, hasher.finalize()))
}

fn collect_files(base: &Path, dir: &Path, out: &mut Vec<NormalizedPath>) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();
        if path.is_dir() {
            collect_files(base, &path, out)?;
        } else if path.is_file() {
            let relative = path.strip_prefix(base).unwrap_or(&path);
            out.push(NormalizedPath::new(relative));
        }
    }
    Ok(())
}
