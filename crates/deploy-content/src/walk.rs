//! Lazy walk over a project tree
//!
//! [`ProjectWalk`] yields one record per regular file, depth first, with
//! directory entries visited in sorted name order so the same tree always
//! produces the same sequence. Excluded directories are pruned before they
//! are read. The walk owns no shared state and is restarted by building a
//! new one.

use std::fs;
use std::path::{Path, PathBuf};

use deploy_fs::NormalizedPath;
use deploy_fs::constants::EXCLUDED_DIRS;

/// A file discovered by the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    /// Path relative to the walk root
    pub relative: NormalizedPath,
    /// Absolute on-disk path
    pub absolute: PathBuf,
    /// Size in bytes
    pub size: u64,
}

/// A path the walk could not read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkError {
    pub relative: NormalizedPath,
    pub message: String,
    /// The path is a directory whose entries could not be listed
    pub directory: bool,
}

/// Whether a directory is pruned: dot-directories and dependency caches.
pub fn is_excluded_dir(name: &str) -> bool {
    name.starts_with('.') || EXCLUDED_DIRS.contains(&name)
}

struct Entry {
    name: String,
    path: PathBuf,
}

/// Depth-first iterator over the files under a project directory.
pub struct ProjectWalk {
    /// One pending-entry list per open directory, innermost last
    stack: Vec<(NormalizedPath, std::vec::IntoIter<Entry>)>,
    /// Error for the root itself, reported on the first `next()`
    root_error: Option<WalkError>,
}

impl ProjectWalk {
    pub fn new(root: &Path) -> Self {
        match read_sorted(root) {
            Ok(entries) => Self {
                stack: vec![(NormalizedPath::new(""), entries.into_iter())],
                root_error: None,
            },
            Err(e) => Self {
                stack: Vec::new(),
                root_error: Some(WalkError {
                    relative: NormalizedPath::new(""),
                    message: e.to_string(),
                    directory: true,
                }),
            },
        }
    }
}

impl Iterator for ProjectWalk {
    type Item = Result<CandidateFile, WalkError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(err) = self.root_error.take() {
            return Some(Err(err));
        }

        loop {
            let (parent, entries) = self.stack.last_mut()?;
            let Some(entry) = entries.next() else {
                self.stack.pop();
                continue;
            };
            let relative = parent.join(&entry.name);

            // Follows symlinks for files; symlinked directories are not entered
            let metadata = match fs::metadata(&entry.path) {
                Ok(m) => m,
                Err(e) => {
                    return Some(Err(WalkError {
                        relative,
                        message: e.to_string(),
                        directory: false,
                    }));
                }
            };

            if metadata.is_dir() {
                let is_link = fs::symlink_metadata(&entry.path)
                    .map(|m| m.file_type().is_symlink())
                    .unwrap_or(true);
                if is_link || is_excluded_dir(&entry.name) {
                    continue;
                }
                match read_sorted(&entry.path) {
                    Ok(children) => self.stack.push((relative, children.into_iter())),
                    Err(e) => {
                        return Some(Err(WalkError {
                            relative,
                            message: e.to_string(),
                            directory: true,
                        }));
                    }
                }
            } else if metadata.is_file() {
                return Some(Ok(CandidateFile {
                    relative,
                    absolute: entry.path,
                    size: metadata.len(),
                }));
            }
        }
    }
}

fn read_sorted(dir: &Path) -> std::io::Result<Vec<Entry>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        entries.push(Entry {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: entry.path(),
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}
