//! End-to-end scenarios through the MCP server
//!
//! Every request goes through JSON-RPC exactly as an agent would send it.
//! The cluster tools are scripted so the full lifecycle runs without one.

use std::sync::Arc;

use deploy_fs::{BundleLayout, TargetState};
use deploy_mcp::{DeployMcpServer, Dispatcher, ServerConfig};
use deploy_test_utils::{Scripted, ScriptedRunner, TestWorkspace};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

struct Session {
    server: DeployMcpServer,
    next_id: u64,
}

impl Session {
    fn new(ws: &TestWorkspace, runner: &Arc<ScriptedRunner>, config: ServerConfig) -> Self {
        let config = ServerConfig {
            workspace_root: ws.root().to_path_buf(),
            ..config
        };
        Self {
            server: DeployMcpServer::new(Dispatcher::from_config(&config, runner.clone())),
            next_id: 1,
        }
    }

    /// Call a tool and return (text, isError).
    async fn call(&mut self, tool: &str, arguments: Value) -> (String, bool) {
        let id = self.next_id;
        self.next_id += 1;
        let request = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "tools/call",
            "params": {"name": tool, "arguments": arguments}
        });
        let response: Value =
            serde_json::from_str(&self.server.handle_message(&request.to_string()).await.unwrap())
                .unwrap();
        assert_eq!(response["id"], id);
        let result = &response["result"];
        (
            result["content"][0]["text"].as_str().unwrap().to_string(),
            result["isError"].as_bool().unwrap_or(false),
        )
    }
}

fn configmap_data(ws: &TestWorkspace, project: &str) -> serde_yaml::Mapping {
    let text = ws.read(&format!("{}/.roobrowser/skaffold/k8s/configmap.yaml", project));
    let doc: serde_yaml::Value = serde_yaml::from_str(&text).unwrap();
    doc["data"].as_mapping().unwrap().clone()
}

fn state(ws: &TestWorkspace, project: &str) -> TargetState {
    BundleLayout::new(project, ws.root().join(project)).state()
}

#[tokio::test]
async fn test_text_and_binary_site_full_lifecycle() {
    let ws = TestWorkspace::new();
    ws.write("site/index.html", "<h1>Hi</h1>");
    ws.write("site/img/logo.png", [0xFFu8, 0x00, 0xFF]);
    let runner = Arc::new(ScriptedRunner::new());
    runner.on("skaffold dev", Scripted::ok("Deployments stabilized in 2.1 seconds\n"));
    runner.on("kubectl get", Scripted::ok("NAME             READY   STATUS\npod/demo-app-1   1/1     Running\n"));
    runner.on("kubectl logs", Scripted::ok("nginx started\n"));
    runner.on("skaffold delete", Scripted::ok("Cleaning up...\n"));
    let mut session = Session::new(&ws, &runner, ServerConfig::default());
    assert_eq!(state(&ws, "site"), TargetState::Unscaffolded);

    // Scaffold
    let (text, is_error) = session
        .call(
            "scaffold_configmap_app",
            json!({"project_path": "site", "app_name": "demo-app", "ingress_path": "/demo"}),
        )
        .await;
    assert!(!is_error, "{}", text);
    assert!(text.contains("📄 Processed 2 files: img/logo.png, index.html\n"), "{}", text);
    assert_eq!(state(&ws, "site"), TargetState::Scaffolded);

    let data = configmap_data(&ws, "site");
    assert_eq!(data.len(), 2);
    assert_eq!(data["index.html"].as_str(), Some("<h1>Hi</h1>"));
    assert_eq!(data["img/logo.png"].as_str(), Some("/wD/"));
    ws.assert_file_contains("site/.roobrowser/skaffold/k8s/ingress.yaml", "/demo");
    ws.assert_file_contains("site/.roobrowser/skaffold/k8s/deployment.yaml", "demo-app");

    // Deploy
    let (text, is_error) = session.call("deploy_app", json!({"project_path": "site"})).await;
    assert!(!is_error, "{}", text);
    assert!(text.contains("Deployments stabilized"));

    // Status
    let (text, _) = session
        .call("get_deployment_status", json!({"app_name": "demo-app"}))
        .await;
    assert!(text.contains("pod/demo-app-1"));

    // Logs
    let (text, _) = session
        .call("get_deployment_logs", json!({"app_name": "demo-app"}))
        .await;
    assert_eq!(text, "📋 Logs for demo-app:\n\nnginx started\n");

    // Cleanup
    let (text, is_error) = session
        .call("cleanup_deployment", json!({"project_path": "site"}))
        .await;
    assert!(!is_error, "{}", text);
    assert!(text.starts_with("🧹 Cleanup completed for site"));

    assert_eq!(
        runner.call_lines(),
        vec![
            "skaffold dev",
            "kubectl get pods,services,ingress -l app=demo-app -o wide",
            "kubectl logs -l app=demo-app --tail=100",
            "skaffold delete",
        ]
    );
    // The bundle stays on disk after cleanup
    assert_eq!(state(&ws, "site"), TargetState::Scaffolded);
}

#[tokio::test]
async fn test_empty_project_is_no_content() {
    let ws = TestWorkspace::new();
    ws.project("empty");
    let runner = Arc::new(ScriptedRunner::new());
    let mut session = Session::new(&ws, &runner, ServerConfig::default());

    let (text, is_error) = session
        .call(
            "scaffold_configmap_app",
            json!({"project_path": "empty", "app_name": "demo", "ingress_path": "/demo"}),
        )
        .await;

    assert!(is_error);
    assert!(text.starts_with("❌ Error: No static content found in"), "{}", text);
    assert_eq!(state(&ws, "empty"), TargetState::Unscaffolded);
}

#[tokio::test]
async fn test_deploy_before_scaffold_is_not_found() {
    let ws = TestWorkspace::new();
    ws.static_site("site");
    let runner = Arc::new(ScriptedRunner::new());
    let mut session = Session::new(&ws, &runner, ServerConfig::default());

    let (text, is_error) = session.call("deploy_app", json!({"project_path": "site"})).await;

    assert!(is_error);
    assert!(text.contains("site/.roobrowser/skaffold/"), "{}", text);
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_status_with_no_resources_is_not_an_error() {
    let ws = TestWorkspace::new();
    let runner = Arc::new(ScriptedRunner::new());
    runner.on("kubectl get", Scripted::ok(""));
    let mut session = Session::new(&ws, &runner, ServerConfig::default());

    let (text, is_error) = session.call("get_deployment_status", json!({})).await;

    assert!(!is_error);
    assert_eq!(text, "📊 Deployment Status:\n\nNo resources found");
}

#[tokio::test]
async fn test_apply_timeout_is_deployment_failure() {
    let ws = TestWorkspace::new();
    ws.static_site("site");
    let runner = Arc::new(ScriptedRunner::new());
    runner.on("skaffold", Scripted::Hang);
    let config = ServerConfig {
        apply_timeout_secs: 1,
        ..ServerConfig::default()
    };
    let mut session = Session::new(&ws, &runner, config);
    session
        .call(
            "scaffold_configmap_app",
            json!({"project_path": "site", "app_name": "demo", "ingress_path": "/demo"}),
        )
        .await;

    let (text, is_error) = session
        .call("deploy_app", json!({"project_path": "site", "mode": "run"}))
        .await;

    assert!(is_error);
    assert_eq!(
        text,
        "❌ Error: Skaffold deployment failed: 'skaffold run' timed out after 1s"
    );
}

#[tokio::test]
async fn test_rescaffold_replaces_previous_content() {
    let ws = TestWorkspace::new();
    ws.write("site/index.html", "v1");
    ws.write("site/old.css", "body {}");
    let runner = Arc::new(ScriptedRunner::new());
    let mut session = Session::new(&ws, &runner, ServerConfig::default());
    let args = json!({"project_path": "site", "app_name": "demo", "ingress_path": "/demo"});
    session.call("scaffold_configmap_app", args.clone()).await;

    ws.write("site/index.html", "v2");
    std::fs::remove_file(ws.root().join("site/old.css")).unwrap();
    let (text, is_error) = session.call("scaffold_configmap_app", args).await;

    assert!(!is_error, "{}", text);
    let data = configmap_data(&ws, "site");
    assert_eq!(data.len(), 1);
    assert_eq!(data["index.html"].as_str(), Some("v2"));
}

#[tokio::test]
async fn test_targets_are_independent() {
    let ws = TestWorkspace::new();
    ws.static_site("one");
    ws.static_site("two");
    let runner = Arc::new(ScriptedRunner::new());
    let mut session = Session::new(&ws, &runner, ServerConfig::default());

    session
        .call(
            "scaffold_configmap_app",
            json!({"project_path": "one", "app_name": "one", "ingress_path": "/one"}),
        )
        .await;

    assert_eq!(state(&ws, "one"), TargetState::Scaffolded);
    assert_eq!(state(&ws, "two"), TargetState::Unscaffolded);
    let (_, is_error) = session.call("deploy_app", json!({"project_path": "two"})).await;
    assert!(is_error);
}
