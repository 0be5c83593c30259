//! Template bundles
//!
//! A bundle is a directory tree of UTF-8 files containing `{{NAME}}`
//! placeholders. Rendering maps it 1:1 onto the target's bundle directory.

use std::fs;
use std::path::{Path, PathBuf};

use deploy_fs::NormalizedPath;
use deploy_fs::io::{reset_dir, write_bundle_file};

use crate::template::TemplateVariables;
use crate::{Error, Result};

/// Name of the bundle shipped with the binary.
pub const BUILTIN_BUNDLE: &str = "configmap-static";

const BUILTIN_FILES: &[(&str, &str)] = &[
    (
        "k8s/configmap.yaml",
        include_str!("../templates/configmap-static/k8s/configmap.yaml"),
    ),
    (
        "k8s/deployment.yaml",
        include_str!("../templates/configmap-static/k8s/deployment.yaml"),
    ),
    (
        "k8s/ingress.yaml",
        include_str!("../templates/configmap-static/k8s/ingress.yaml"),
    ),
    (
        "k8s/service.yaml",
        include_str!("../templates/configmap-static/k8s/service.yaml"),
    ),
    (
        "skaffold.yaml",
        include_str!("../templates/configmap-static/skaffold.yaml"),
    ),
];

/// One file of a bundle, template or rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    /// Path relative to the bundle root
    pub path: NormalizedPath,
    pub content: String,
}

/// A set of template files, sorted by relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateBundle {
    name: String,
    files: Vec<TemplateFile>,
}

impl TemplateBundle {
    /// The `configmap-static` bundle compiled into the binary.
    pub fn builtin() -> Self {
        Self {
            name: BUILTIN_BUNDLE.to_string(),
            files: BUILTIN_FILES
                .iter()
                .map(|(path, content)| TemplateFile {
                    path: NormalizedPath::new(path),
                    content: (*content).to_string(),
                })
                .collect(),
        }
    }

    /// Load a bundle from a directory on disk.
    pub fn load(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(Error::TemplateNotFound {
                path: dir.to_path_buf(),
            });
        }

        let mut files = Vec::new();
        load_recursive(dir, dir, &mut files)?;
        files.sort_by(|a, b| a.path.cmp(&b.path));

        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| BUILTIN_BUNDLE.to_string());
        tracing::debug!(bundle = %name, files = files.len(), "Loaded template bundle");

        Ok(Self { name, files })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn files(&self) -> &[TemplateFile] {
        &self.files
    }

    /// Substitute `vars` into every file.
    pub fn render(&self, vars: &TemplateVariables) -> RenderedBundle {
        RenderedBundle {
            files: self
                .files
                .iter()
                .map(|file| TemplateFile {
                    path: file.path.clone(),
                    content: vars.substitute(&file.content),
                })
                .collect(),
        }
    }
}

fn load_recursive(base: &Path, dir: &Path, out: &mut Vec<TemplateFile>) -> Result<()> {
    let read_err = |path: &Path, e: std::io::Error| Error::TemplateRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    for entry in fs::read_dir(dir).map_err(|e| read_err(dir, e))? {
        let entry = entry.map_err(|e| read_err(dir, e))?;
        let path = entry.path();
        if path.is_dir() {
            load_recursive(base, &path, out)?;
        } else if path.is_file() {
            let content = fs::read_to_string(&path).map_err(|e| read_err(&path, e))?;
            let relative = path.strip_prefix(base).unwrap_or(&path);
            out.push(TemplateFile {
                path: NormalizedPath::new(relative),
                content,
            });
        }
    }
    Ok(())
}

/// A bundle with all placeholders substituted, ready to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBundle {
    files: Vec<TemplateFile>,
}

impl RenderedBundle {
    pub fn files(&self) -> &[TemplateFile] {
        &self.files
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.files
            .iter()
            .find(|f| f.path.as_str() == path)
            .map(|f| f.content.as_str())
    }

    /// Replace `dir` with the rendered files.
    ///
    /// The directory is emptied first so nothing from a previous render
    /// survives. Each file is replaced atomically; the set as a whole is not.
    pub fn write_to(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        reset_dir(dir)?;

        let mut written = Vec::with_capacity(self.files.len());
        for file in &self.files {
            let target = dir.join(file.path.to_native());
            write_bundle_file(&NormalizedPath::new(&target), file.content.as_bytes())?;
            written.push(target);
        }

        tracing::debug!(dir = %dir.display(), files = written.len(), "Wrote rendered bundle");
        Ok(written)
    }
}
