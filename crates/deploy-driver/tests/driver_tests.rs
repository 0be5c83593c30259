use std::sync::Arc;
use std::time::Duration;

use deploy_driver::{DeployMode, Driver, DriverConfig, Error};
use deploy_fs::BundleLayout;
use deploy_test_utils::{Scripted, ScriptedRunner, TestWorkspace};
use pretty_assertions::assert_eq;

fn scaffolded(ws: &TestWorkspace, project: &str) -> BundleLayout {
    ws.write(&format!("{}/.roobrowser/skaffold/skaffold.yaml", project), "kind: Config\n");
    BundleLayout::new(project, ws.root().join(project))
}

fn driver(runner: &Arc<ScriptedRunner>) -> Driver {
    Driver::new(runner.clone(), DriverConfig::default())
}

#[tokio::test]
async fn apply_runs_skaffold_in_bundle_dir() {
    let ws = TestWorkspace::new();
    let layout = scaffolded(&ws, "site");
    let runner = Arc::new(ScriptedRunner::new());
    runner.on("skaffold run", Scripted::ok("Deployments stabilized\n"));

    let output = driver(&runner).apply(&layout, DeployMode::Run).await.unwrap();

    assert_eq!(output.stdout, "Deployments stabilized\n");
    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].program, "skaffold");
    assert_eq!(calls[0].args, vec!["run"]);
    assert_eq!(calls[0].cwd.as_deref(), Some(ws.bundle_dir("site").as_path()));
    assert_eq!(calls[0].timeout, Some(Duration::from_secs(60)));
}

#[tokio::test]
async fn apply_defaults_to_dev_mode() {
    let ws = TestWorkspace::new();
    let layout = scaffolded(&ws, "site");
    let runner = Arc::new(ScriptedRunner::new());

    driver(&runner)
        .apply(&layout, DeployMode::default())
        .await
        .unwrap();

    assert_eq!(runner.call_lines(), vec!["skaffold dev"]);
}

#[tokio::test]
async fn apply_before_scaffold_is_not_found() {
    let ws = TestWorkspace::new();
    ws.static_site("site");
    let layout = BundleLayout::new("site", ws.root().join("site"));
    let runner = Arc::new(ScriptedRunner::new());

    let err = driver(&runner).apply(&layout, DeployMode::Dev).await.unwrap_err();

    assert!(matches!(err, Error::Fs(deploy_fs::Error::NotFound { .. })));
    assert!(err.to_string().contains("site/.roobrowser/skaffold/"));
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn apply_without_manifest_is_not_found() {
    let ws = TestWorkspace::new();
    ws.write("site/.roobrowser/skaffold/k8s/service.yaml", "kind: Service\n");
    let layout = BundleLayout::new("site", ws.root().join("site"));
    let runner = Arc::new(ScriptedRunner::new());

    let err = driver(&runner).apply(&layout, DeployMode::Run).await.unwrap_err();

    assert!(err.to_string().contains("skaffold.yaml"));
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn apply_non_zero_exit_is_deployment_failed() {
    let ws = TestWorkspace::new();
    let layout = scaffolded(&ws, "site");
    let runner = Arc::new(ScriptedRunner::new());
    runner.on("skaffold", Scripted::fail(1, "cluster unreachable"));

    let err = driver(&runner).apply(&layout, DeployMode::Run).await.unwrap_err();

    assert!(matches!(err, Error::DeploymentFailed { .. }));
    assert_eq!(
        err.to_string(),
        "Skaffold deployment failed: exit code 1: cluster unreachable"
    );
}

#[tokio::test]
async fn apply_timeout_is_deployment_failed() {
    let ws = TestWorkspace::new();
    let layout = scaffolded(&ws, "site");
    let runner = Arc::new(ScriptedRunner::new());
    runner.on("skaffold dev", Scripted::Hang);
    let config = DriverConfig {
        apply_timeout: Duration::from_millis(50),
        ..DriverConfig::default()
    };

    let err = Driver::new(runner.clone(), config)
        .apply(&layout, DeployMode::Dev)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::DeploymentFailed { .. }));
    assert!(err.to_string().contains("timed out"));
}

#[tokio::test]
async fn apply_missing_binary_is_deployment_failed() {
    let ws = TestWorkspace::new();
    let layout = scaffolded(&ws, "site");
    let runner = Arc::new(ScriptedRunner::new());
    runner.on("skaffold", Scripted::SpawnFailure("No such file or directory".into()));

    let err = driver(&runner).apply(&layout, DeployMode::Run).await.unwrap_err();

    assert!(matches!(err, Error::DeploymentFailed { .. }));
    assert!(err.to_string().contains("could not start 'skaffold'"));
}

#[tokio::test]
async fn delete_runs_skaffold_delete_with_short_timeout() {
    let ws = TestWorkspace::new();
    let layout = scaffolded(&ws, "site");
    let runner = Arc::new(ScriptedRunner::new());
    runner.on("skaffold delete", Scripted::ok_with_stderr("Cleaning up...\n", "warning: x\n"));

    let output = driver(&runner).delete(&layout).await.unwrap();

    assert_eq!(output.stderr, "warning: x\n");
    let calls = runner.calls();
    assert_eq!(calls[0].args, vec!["delete"]);
    assert_eq!(calls[0].timeout, Some(Duration::from_secs(30)));
}

#[tokio::test]
async fn delete_without_bundle_is_not_found() {
    let ws = TestWorkspace::new();
    ws.project("site");
    let layout = BundleLayout::new("site", ws.root().join("site"));
    let runner = Arc::new(ScriptedRunner::new());

    let err = driver(&runner).delete(&layout).await.unwrap_err();

    assert!(matches!(err, Error::Fs(deploy_fs::Error::NotFound { .. })));
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn custom_skaffold_binary_is_used() {
    let ws = TestWorkspace::new();
    let layout = scaffolded(&ws, "site");
    let runner = Arc::new(ScriptedRunner::new());
    let config = DriverConfig {
        skaffold_bin: "/opt/bin/skaffold".to_string(),
        ..DriverConfig::default()
    };

    Driver::new(runner.clone(), config).delete(&layout).await.unwrap();

    assert_eq!(runner.call_lines(), vec!["/opt/bin/skaffold delete"]);
}
