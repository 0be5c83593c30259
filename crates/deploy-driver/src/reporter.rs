//! Status and log queries
//!
//! Read-only `kubectl` calls filtered by a label selector. An empty result
//! is a normal answer, not an error.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use deploy_fs::constants::MANAGED_BY_LABEL;
use deploy_fs::validate_app_name;

use crate::runner::{CommandRunner, ExternalCommand};
use crate::{Error, Result};

/// Shown when a status query matches nothing.
pub const NO_RESOURCES: &str = "No resources found";

/// Shown when a log query returns nothing.
pub const NO_LOGS: &str = "No logs available";

const LOG_TAIL: &str = "--tail=100";

/// `key=value` filter for cluster queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelSelector {
    /// `app=<name>`
    App(String),
    /// Everything this tool manages
    Managed,
}

impl LabelSelector {
    /// Selector for one app, validated like every other app name.
    pub fn app(name: &str) -> Result<Self> {
        validate_app_name(name)?;
        Ok(Self::App(name.to_string()))
    }

    /// `app=<name>` when a non-empty name is given, else the managed set.
    pub fn for_app(name: Option<&str>) -> Result<Self> {
        match name.map(str::trim) {
            Some(name) if !name.is_empty() => Self::app(name),
            _ => Ok(Self::Managed),
        }
    }
}

impl fmt::Display for LabelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::App(name) => write!(f, "app={}", name),
            Self::Managed => f.write_str(MANAGED_BY_LABEL),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReporterConfig {
    pub kubectl_bin: String,
    /// Bound for status and log snapshot queries
    pub query_timeout: Duration,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            kubectl_bin: "kubectl".to_string(),
            query_timeout: Duration::from_secs(30),
        }
    }
}

/// Runs status and log queries against the cluster.
#[derive(Clone)]
pub struct Reporter {
    runner: Arc<dyn CommandRunner>,
    config: ReporterConfig,
}

impl Reporter {
    pub fn new(runner: Arc<dyn CommandRunner>, config: ReporterConfig) -> Self {
        Self { runner, config }
    }

    /// `kubectl get pods,services,ingress -l <selector> -o wide`
    pub async fn status(&self, selector: &LabelSelector) -> Result<String> {
        let command = ExternalCommand::new(&self.config.kubectl_bin)
            .args(["get", "pods,services,ingress", "-l"])
            .arg(selector.to_string())
            .args(["-o", "wide"])
            .timeout(self.config.query_timeout);

        tracing::info!(%selector, "Querying deployment status");
        let stdout = self.query(&command, "get deployment status").await?;
        Ok(or_placeholder(stdout, NO_RESOURCES))
    }

    /// `kubectl logs -l app=<name> [-f] --tail=100`
    ///
    /// A snapshot is bounded by the query timeout. A follow has no bound:
    /// it ends when the pods stop logging or the caller drops the future,
    /// which kills `kubectl`. Output is buffered, so a follow yields every
    /// line at once when `kubectl` exits, and a dropped follow yields none.
    pub async fn logs(&self, app_name: &str, follow: bool) -> Result<String> {
        let selector = LabelSelector::app(app_name)?;
        let mut command = ExternalCommand::new(&self.config.kubectl_bin)
            .args(["logs", "-l"])
            .arg(selector.to_string());
        if follow {
            command = command.arg("-f");
        } else {
            command = command.timeout(self.config.query_timeout);
        }
        let command = command.arg(LOG_TAIL);

        tracing::info!(app = app_name, follow, "Fetching logs");
        let stdout = self.query(&command, "get logs").await?;
        Ok(or_placeholder(stdout, NO_LOGS))
    }

    async fn query(&self, command: &ExternalCommand, action: &str) -> Result<String> {
        let output = self.runner.run(command).await.map_err(|e| {
            tracing::warn!(error = %e, "Query did not complete");
            Error::query(action, e.to_string())
        })?;

        if !output.success() {
            tracing::warn!(command = %command, exit_code = ?output.exit_code, "Query failed");
            return Err(Error::query(action, output.failure_reason()));
        }
        Ok(output.stdout)
    }
}

fn or_placeholder(stdout: String, placeholder: &str) -> String {
    if stdout.trim().is_empty() {
        placeholder.to_string()
    } else {
        stdout
    }
}
