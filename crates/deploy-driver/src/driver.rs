//! Deployment driver
//!
//! Runs `skaffold` inside a target's bundle directory. The bundle is
//! re-checked on every call; nothing about a previous apply is remembered.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use deploy_fs::BundleLayout;

use crate::runner::{CommandOutput, CommandRunner, ExternalCommand, RunError};
use crate::{Error, Result};

/// How skaffold applies the bundle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeployMode {
    /// `skaffold dev`: continuous apply with live reload
    #[default]
    Dev,
    /// `skaffold run`: one-shot apply
    Run,
}

impl DeployMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Run => "run",
        }
    }
}

impl fmt::Display for DeployMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeployMode {
    type Err = deploy_fs::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "dev" => Ok(Self::Dev),
            "run" => Ok(Self::Run),
            other => Err(deploy_fs::Error::invalid(
                "mode",
                format!("must be 'dev' or 'run', got '{}'", other),
            )),
        }
    }
}

/// Binary and timeouts for [`Driver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    pub skaffold_bin: String,
    pub apply_timeout: Duration,
    pub delete_timeout: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            skaffold_bin: "skaffold".to_string(),
            apply_timeout: Duration::from_secs(60),
            delete_timeout: Duration::from_secs(30),
        }
    }
}

/// Applies and deletes rendered bundles.
#[derive(Clone)]
pub struct Driver {
    runner: Arc<dyn CommandRunner>,
    config: DriverConfig,
}

impl Driver {
    pub fn new(runner: Arc<dyn CommandRunner>, config: DriverConfig) -> Self {
        Self { runner, config }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// `skaffold <mode>` in the bundle directory.
    ///
    /// Requires the bundle directory and `skaffold.yaml`.
    pub async fn apply(&self, layout: &BundleLayout, mode: DeployMode) -> Result<CommandOutput> {
        let bundle_dir = layout.require_manifest()?;
        let command = ExternalCommand::new(&self.config.skaffold_bin)
            .arg(mode.as_str())
            .current_dir(bundle_dir)
            .timeout(self.config.apply_timeout);

        tracing::info!(project = layout.project_path(), %mode, "Applying bundle");
        self.execute(&command, "Skaffold deployment").await
    }

    /// `skaffold delete` in the bundle directory.
    ///
    /// Only the bundle directory is required; a missing manifest is left
    /// for skaffold to report.
    pub async fn delete(&self, layout: &BundleLayout) -> Result<CommandOutput> {
        let bundle_dir = layout.require_bundle()?;
        let command = ExternalCommand::new(&self.config.skaffold_bin)
            .arg("delete")
            .current_dir(bundle_dir)
            .timeout(self.config.delete_timeout);

        tracing::info!(project = layout.project_path(), "Deleting deployment");
        self.execute(&command, "Cleanup").await
    }

    async fn execute(&self, command: &ExternalCommand, action: &str) -> Result<CommandOutput> {
        let output = self
            .runner
            .run(command)
            .await
            .map_err(|e| run_error(action, e))?;

        if !output.success() {
            tracing::warn!(command = %command, exit_code = ?output.exit_code, "Deployment command failed");
            return Err(Error::deployment(action, output.failure_reason()));
        }
        Ok(output)
    }
}

fn run_error(action: &str, err: RunError) -> Error {
    tracing::warn!(error = %err, "Deployment command did not complete");
    Error::deployment(action, err.to_string())
}
