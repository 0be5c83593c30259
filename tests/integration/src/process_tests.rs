//! Real subprocesses against stand-in `skaffold` and `kubectl` scripts
//!
//! Runs in one test so no other thread forks while a script is still open
//! for writing.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use deploy_driver::TokioRunner;
use deploy_mcp::{Dispatcher, ServerConfig};
use deploy_test_utils::TestWorkspace;
use serde_json::json;

fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[tokio::test]
async fn test_lifecycle_with_real_processes() {
    let ws = TestWorkspace::new();
    ws.static_site("site");
    let bin = tempfile::TempDir::new().unwrap();
    let skaffold = script(
        bin.path(),
        "skaffold",
        r#"case "$1" in
  dev|run) echo "applied $1 in $(pwd)" ;;
  delete) echo "deleted" ;;
  *) echo "unknown command $1" >&2; exit 2 ;;
esac"#,
    );
    let kubectl = script(bin.path(), "kubectl", r#"printf '%s|' "$@""#);
    let slow = script(bin.path(), "slow-skaffold", "sleep 30");

    let config = ServerConfig {
        workspace_root: ws.root().to_path_buf(),
        skaffold_bin: skaffold.display().to_string(),
        kubectl_bin: kubectl.display().to_string(),
        ..ServerConfig::default()
    };
    let dispatcher = Dispatcher::from_config(&config, Arc::new(TokioRunner));

    let result = dispatcher
        .invoke(
            "scaffold_configmap_app",
            json!({"project_path": "site", "app_name": "demo", "ingress_path": "/demo"}),
        )
        .await;
    assert!(!result.is_error(), "{}", result.first_text());

    // skaffold runs inside the bundle directory
    let result = dispatcher
        .invoke("deploy_app", json!({"project_path": "site", "mode": "run"}))
        .await;
    assert!(!result.is_error(), "{}", result.first_text());
    assert!(
        result.first_text().contains("applied run in ")
            && result.first_text().contains("site/.roobrowser/skaffold"),
        "{}",
        result.first_text()
    );

    // kubectl sees each argument separately
    let result = dispatcher
        .invoke("get_deployment_status", json!({"app_name": "demo"}))
        .await;
    assert_eq!(
        result.first_text(),
        "📊 Deployment Status:\n\nget|pods,services,ingress|-l|app=demo|-o|wide|"
    );

    let result = dispatcher
        .invoke("get_deployment_logs", json!({"app_name": "demo"}))
        .await;
    assert_eq!(
        result.first_text(),
        "📋 Logs for demo:\n\nlogs|-l|app=demo|--tail=100|"
    );

    let result = dispatcher
        .invoke("cleanup_deployment", json!({"project_path": "site"}))
        .await;
    assert_eq!(
        result.first_text(),
        "🧹 Cleanup completed for site\n\n📋 Output:\ndeleted"
    );

    // A missing binary is a failure, not a panic
    let config = ServerConfig {
        workspace_root: ws.root().to_path_buf(),
        skaffold_bin: bin.path().join("absent").display().to_string(),
        ..ServerConfig::default()
    };
    let result = Dispatcher::from_config(&config, Arc::new(TokioRunner))
        .invoke("deploy_app", json!({"project_path": "site"}))
        .await;
    assert!(result.is_error());
    assert!(result.first_text().contains("could not start"), "{}", result.first_text());

    // An apply that outlives its bound is killed and reported
    let config = ServerConfig {
        workspace_root: ws.root().to_path_buf(),
        skaffold_bin: slow.display().to_string(),
        apply_timeout_secs: 1,
        ..ServerConfig::default()
    };
    let started = Instant::now();
    let result = Dispatcher::from_config(&config, Arc::new(TokioRunner))
        .invoke("deploy_app", json!({"project_path": "site"}))
        .await;
    assert!(started.elapsed() < Duration::from_secs(10));
    assert!(result.is_error());
    assert!(
        result.first_text().contains("timed out after 1s"),
        "{}",
        result.first_text()
    );
}
