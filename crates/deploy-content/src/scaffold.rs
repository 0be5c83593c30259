//! Scaffold pipeline
//!
//! validate -> resolve -> collect -> serialize -> render -> write. Nothing
//! is written until every earlier step has succeeded.

use std::path::Path;

use deploy_fs::checksum::compute_dir_checksum;
use deploy_fs::{BundleLayout, resolve_project_dir, validate_app_name, validate_ingress_path};

use crate::Result;
use crate::bundle::TemplateBundle;
use crate::collect::collect;
use crate::serialize::{escape, serialize_static_content};
use crate::template::TemplateVariables;

/// Inputs for one scaffold run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldRequest {
    /// Workspace-relative project directory
    pub project_path: String,
    pub app_name: String,
    pub ingress_path: String,
}

impl ScaffoldRequest {
    /// Check the app name and ingress path. The project path is checked
    /// when it is resolved.
    pub fn validate(&self) -> Result<()> {
        validate_app_name(&self.app_name)?;
        validate_ingress_path(&self.ingress_path)?;
        Ok(())
    }
}

/// Outcome of a successful scaffold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldReport {
    pub app_name: String,
    pub ingress_path: String,
    /// Bundle directory relative to the workspace root, e.g. `site/.roobrowser/skaffold/`
    pub bundle_dir: String,
    /// Collected content paths, in discovery order
    pub files: Vec<String>,
    /// Files that matched the allow-list but could not be read
    pub skipped: usize,
    /// `sha256:` digest of the written bundle
    pub checksum: String,
}

/// Collect a project's static content and write its deployment bundle.
pub fn scaffold(
    workspace_root: &Path,
    request: &ScaffoldRequest,
    templates: &TemplateBundle,
) -> Result<ScaffoldReport> {
    request.validate()?;

    let project_dir = resolve_project_dir(workspace_root, &request.project_path)?;
    let layout = BundleLayout::new(request.project_path.trim(), project_dir);

    let collection = collect(layout.project_dir())?;

    let vars = TemplateVariables {
        app_name: request.app_name.clone(),
        // Templates place it inside a double-quoted scalar
        ingress_path: escape(&request.ingress_path),
        static_content: serialize_static_content(&collection.content),
    };
    let rendered = templates.render(&vars);

    let bundle_dir = layout.bundle_dir();
    rendered.write_to(&bundle_dir)?;
    let checksum = compute_dir_checksum(&bundle_dir)?;

    tracing::info!(
        app = %request.app_name,
        bundle = %bundle_dir.display(),
        files = collection.content.len(),
        %checksum,
        "Scaffolded bundle"
    );

    Ok(ScaffoldReport {
        app_name: request.app_name.clone(),
        ingress_path: request.ingress_path.clone(),
        bundle_dir: layout.display_bundle_dir(),
        files: collection.content.paths().map(str::to_string).collect(),
        skipped: collection.skipped.len(),
        checksum,
    })
}
