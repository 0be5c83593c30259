//! Server configuration
//!
//! Layered lowest to highest: built-in defaults, an optional config file
//! (TOML, JSON or YAML by extension), then `WORKSPACE_ROOT` and CLI flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use deploy_content::TemplateBundle;
use deploy_content::bundle::BUILTIN_BUNDLE;
use deploy_driver::{DriverConfig, ReporterConfig};
use deploy_fs::{ConfigStore, NormalizedPath};
use serde::{Deserialize, Serialize};

use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Root every `project_path` is resolved against
    pub workspace_root: PathBuf,
    /// Directory holding a `configmap-static/` bundle; `None` uses the built-in one
    pub templates_dir: Option<PathBuf>,
    pub skaffold_bin: String,
    pub kubectl_bin: String,
    pub apply_timeout_secs: u64,
    pub delete_timeout_secs: u64,
    /// Bound for status queries and log snapshots
    pub query_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            workspace_root: PathBuf::from("/workspace"),
            templates_dir: None,
            skaffold_bin: "skaffold".to_string(),
            kubectl_bin: "kubectl".to_string(),
            apply_timeout_secs: 60,
            delete_timeout_secs: 30,
            query_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// Defaults, overlaid with `path` when given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let config = ConfigStore::new().load(&NormalizedPath::new(path))?;
                tracing::debug!(path = %path.display(), "Loaded server config");
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment and CLI values, which win over the file.
    pub fn with_overrides(
        mut self,
        workspace_root: Option<PathBuf>,
        templates_dir: Option<PathBuf>,
    ) -> Self {
        if let Some(root) = workspace_root {
            self.workspace_root = root;
        }
        if templates_dir.is_some() {
            self.templates_dir = templates_dir;
        }
        self
    }

    pub fn driver_config(&self) -> DriverConfig {
        DriverConfig {
            skaffold_bin: self.skaffold_bin.clone(),
            apply_timeout: Duration::from_secs(self.apply_timeout_secs),
            delete_timeout: Duration::from_secs(self.delete_timeout_secs),
        }
    }

    pub fn reporter_config(&self) -> ReporterConfig {
        ReporterConfig {
            kubectl_bin: self.kubectl_bin.clone(),
            query_timeout: Duration::from_secs(self.query_timeout_secs),
        }
    }

    pub fn template_source(&self) -> TemplateSource {
        match &self.templates_dir {
            Some(dir) => TemplateSource::Directory(dir.join(BUILTIN_BUNDLE)),
            None => TemplateSource::Builtin,
        }
    }
}

/// Where the scaffold templates come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    Builtin,
    /// Re-read on every scaffold so edits apply without a restart
    Directory(PathBuf),
}

impl TemplateSource {
    pub fn load(&self) -> Result<TemplateBundle> {
        match self {
            Self::Builtin => Ok(TemplateBundle::builtin()),
            Self::Directory(dir) => Ok(TemplateBundle::load(dir)?),
        }
    }
}
