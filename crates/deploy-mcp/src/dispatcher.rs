//! Tool dispatch
//!
//! Maps a tool name plus JSON arguments onto the content pipeline, the
//! driver or the reporter, and turns every outcome into one text result.
//! Failures never escape as protocol errors: they become a `❌ Error: `
//! text flagged `isError`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use deploy_content::{ScaffoldReport, ScaffoldRequest, scaffold};
use deploy_driver::{CommandOutput, CommandRunner, DeployMode, Driver, LabelSelector, Reporter};
use deploy_fs::{BundleLayout, resolve_project_dir};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::OwnedMutexGuard;

use crate::config::{ServerConfig, TemplateSource};
use crate::tools::{
    CLEANUP_DEPLOYMENT, DEPLOY_APP, GET_DEPLOYMENT_LOGS, GET_DEPLOYMENT_STATUS,
    SCAFFOLD_CONFIGMAP_APP, ToolResult,
};
use crate::{Error, Result};

/// Prefix of every failure text.
pub const ERROR_PREFIX: &str = "❌ Error: ";

/// Files listed by name in the scaffold summary.
const LISTED_FILES: usize = 5;

#[derive(Debug, Deserialize)]
struct ScaffoldArgs {
    project_path: String,
    app_name: String,
    ingress_path: String,
}

#[derive(Debug, Deserialize)]
struct DeployArgs {
    project_path: String,
    #[serde(default)]
    mode: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct StatusArgs {
    #[serde(default)]
    app_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LogsArgs {
    app_name: String,
    #[serde(default)]
    follow: bool,
}

#[derive(Debug, Deserialize)]
struct CleanupArgs {
    project_path: String,
}

/// In-process advisory locks, one per bundle directory.
///
/// Scaffold, deploy and cleanup of the same target run one at a time;
/// different targets never wait on each other.
#[derive(Default)]
struct TargetLocks {
    locks: Mutex<HashMap<PathBuf, Arc<tokio::sync::Mutex<()>>>>,
}

impl TargetLocks {
    async fn acquire(&self, bundle_dir: PathBuf) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self
                .locks
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            locks.entry(bundle_dir).or_default().clone()
        };
        lock.lock_owned().await
    }
}

/// Executes the five deployment tools.
pub struct Dispatcher {
    workspace_root: PathBuf,
    templates: TemplateSource,
    driver: Driver,
    reporter: Reporter,
    locks: TargetLocks,
}

impl Dispatcher {
    pub fn new(
        workspace_root: PathBuf,
        templates: TemplateSource,
        driver: Driver,
        reporter: Reporter,
    ) -> Self {
        Self {
            workspace_root,
            templates,
            driver,
            reporter,
            locks: TargetLocks::default(),
        }
    }

    pub fn from_config(config: &ServerConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self::new(
            config.workspace_root.clone(),
            config.template_source(),
            Driver::new(runner.clone(), config.driver_config()),
            Reporter::new(runner, config.reporter_config()),
        )
    }

    pub fn workspace_root(&self) -> &PathBuf {
        &self.workspace_root
    }

    /// Run a tool and render its outcome as text.
    pub async fn invoke(&self, name: &str, arguments: Value) -> ToolResult {
        tracing::info!(tool = name, "Tool call");
        match self.call(name, arguments).await {
            Ok(text) => ToolResult::text(text),
            Err(e) => {
                tracing::warn!(tool = name, kind = e.kind(), error = %e, "Tool call failed");
                ToolResult::error(format!("{}{}", ERROR_PREFIX, e))
            }
        }
    }

    /// Run a tool, keeping the typed error.
    pub async fn call(&self, name: &str, arguments: Value) -> Result<String> {
        match name {
            SCAFFOLD_CONFIGMAP_APP => self.scaffold_app(parse_args(arguments)?).await,
            DEPLOY_APP => self.deploy_app(parse_args(arguments)?).await,
            GET_DEPLOYMENT_STATUS => self.deployment_status(parse_args(arguments)?).await,
            GET_DEPLOYMENT_LOGS => self.deployment_logs(parse_args(arguments)?).await,
            CLEANUP_DEPLOYMENT => self.cleanup_deployment(parse_args(arguments)?).await,
            other => Err(Error::UnknownOperation(other.to_string())),
        }
    }

    async fn scaffold_app(&self, args: ScaffoldArgs) -> Result<String> {
        let request = ScaffoldRequest {
            project_path: args.project_path,
            app_name: args.app_name,
            ingress_path: args.ingress_path,
        };
        request.validate()?;

        let layout = self.layout(&request.project_path)?;
        let _guard = self.locks.acquire(layout.bundle_dir()).await;

        let templates = self.templates.load()?;
        let report = scaffold(&self.workspace_root, &request, &templates)?;
        Ok(format_scaffold(&report))
    }

    async fn deploy_app(&self, args: DeployArgs) -> Result<String> {
        let mode = match args.mode.as_deref() {
            None | Some("") => DeployMode::default(),
            Some(mode) => mode.parse::<DeployMode>()?,
        };

        let layout = self.layout(&args.project_path)?;
        let _guard = self.locks.acquire(layout.bundle_dir()).await;

        let output = self.driver.apply(&layout, mode).await?;
        Ok(format!(
            "🚀 Deployment started with skaffold {}\n\n\
             📍 Working directory: {}\n\
             📋 Output:\n{}\n\n\
             {}\
             💡 Use get_deployment_status to check deployment progress",
            mode,
            layout.display_bundle_dir(),
            output.stdout,
            warnings(&output, "\n\n"),
        ))
    }

    async fn deployment_status(&self, args: StatusArgs) -> Result<String> {
        let selector = LabelSelector::for_app(args.app_name.as_deref())?;
        let text = self.reporter.status(&selector).await?;
        Ok(format!("📊 Deployment Status:\n\n{}", text))
    }

    async fn deployment_logs(&self, args: LogsArgs) -> Result<String> {
        let text = self.reporter.logs(&args.app_name, args.follow).await?;
        Ok(format!("📋 Logs for {}:\n\n{}", args.app_name, text))
    }

    async fn cleanup_deployment(&self, args: CleanupArgs) -> Result<String> {
        let layout = self.layout(&args.project_path)?;
        let _guard = self.locks.acquire(layout.bundle_dir()).await;

        let output = self.driver.delete(&layout).await?;
        let text = format!(
            "🧹 Cleanup completed for {}\n\n📋 Output:\n{}\n\n{}",
            layout.project_path(),
            output.stdout,
            warnings(&output, ""),
        );
        Ok(text.trim_end().to_string())
    }

    fn layout(&self, project_path: &str) -> Result<BundleLayout> {
        let project_dir = resolve_project_dir(&self.workspace_root, project_path)?;
        Ok(BundleLayout::new(project_path.trim(), project_dir))
    }
}

/// Deserialize tool arguments; an absent object counts as empty.
fn parse_args<T: DeserializeOwned>(arguments: Value) -> Result<T> {
    let arguments = match arguments {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(arguments)
        .map_err(|e| Error::InvalidArgument(format!("Invalid arguments: {}", e)))
}

fn warnings(output: &CommandOutput, trailer: &str) -> String {
    if output.stderr.is_empty() {
        String::new()
    } else {
        format!("⚠️  Warnings:\n{}{}", output.stderr, trailer)
    }
}

fn format_scaffold(report: &ScaffoldReport) -> String {
    let mut listed = report
        .files
        .iter()
        .take(LISTED_FILES)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if report.files.len() > LISTED_FILES {
        listed.push_str("...");
    }

    let mut text = format!(
        "✅ Scaffolded ConfigMap deployment for {}\n\
         📁 Created: {}\n\
         📄 Processed {} files: {}\n",
        report.app_name,
        report.bundle_dir,
        report.files.len(),
        listed,
    );
    if report.skipped > 0 {
        text.push_str(&format!("⚠️  Skipped {} unreadable files\n", report.skipped));
    }
    text.push_str(&format!(
        "🔒 Bundle checksum: {}\n\
         🌐 Will be accessible at: http://localhost{}/\n\n\
         Next: Use deploy_app to deploy with skaffold",
        report.checksum, report.ingress_path,
    ));
    text
}
