use std::sync::Arc;
use std::time::Duration;

use deploy_driver::{Error, LabelSelector, NO_LOGS, NO_RESOURCES, Reporter, ReporterConfig};
use deploy_test_utils::{Scripted, ScriptedRunner};
use pretty_assertions::assert_eq;

fn reporter(runner: &Arc<ScriptedRunner>) -> Reporter {
    Reporter::new(runner.clone(), ReporterConfig::default())
}

#[tokio::test]
async fn status_for_app_uses_app_selector() {
    let runner = Arc::new(ScriptedRunner::new());
    runner.on("kubectl get", Scripted::ok("NAME READY\ndemo-abc 1/1\n"));

    let selector = LabelSelector::for_app(Some("demo")).unwrap();
    let text = reporter(&runner).status(&selector).await.unwrap();

    assert_eq!(text, "NAME READY\ndemo-abc 1/1\n");
    assert_eq!(
        runner.call_lines(),
        vec!["kubectl get pods,services,ingress -l app=demo -o wide"]
    );
    assert_eq!(runner.calls()[0].timeout, Some(Duration::from_secs(30)));
}

#[tokio::test]
async fn status_without_app_uses_managed_selector() {
    let runner = Arc::new(ScriptedRunner::new());

    reporter(&runner)
        .status(&LabelSelector::for_app(None).unwrap())
        .await
        .unwrap();

    assert_eq!(
        runner.call_lines(),
        vec!["kubectl get pods,services,ingress -l managed-by=roobrowser -o wide"]
    );
}

#[tokio::test]
async fn status_with_no_resources_is_not_an_error() {
    let runner = Arc::new(ScriptedRunner::new());
    runner.on(
        "kubectl get",
        Scripted::ok_with_stderr("", "No resources found in default namespace.\n"),
    );

    let text = reporter(&runner)
        .status(&LabelSelector::Managed)
        .await
        .unwrap();

    assert_eq!(text, NO_RESOURCES);
}

#[tokio::test]
async fn status_failure_is_query_failed() {
    let runner = Arc::new(ScriptedRunner::new());
    runner.on("kubectl", Scripted::fail(1, "The connection to the server was refused"));

    let err = reporter(&runner)
        .status(&LabelSelector::Managed)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::QueryFailed { .. }));
    assert!(err.to_string().starts_with("Failed to get deployment status"));
}

#[tokio::test]
async fn log_snapshot_is_bounded() {
    let runner = Arc::new(ScriptedRunner::new());
    runner.on("kubectl logs", Scripted::ok("GET / 200\n"));

    let text = reporter(&runner).logs("demo", false).await.unwrap();

    assert_eq!(text, "GET / 200\n");
    let calls = runner.calls();
    assert_eq!(calls[0].args, vec!["logs", "-l", "app=demo", "--tail=100"]);
    assert_eq!(calls[0].timeout, Some(Duration::from_secs(30)));
}

#[tokio::test]
async fn log_follow_is_unbounded() {
    let runner = Arc::new(ScriptedRunner::new());

    reporter(&runner).logs("demo", true).await.unwrap();

    let calls = runner.calls();
    assert_eq!(calls[0].args, vec!["logs", "-l", "app=demo", "-f", "--tail=100"]);
    assert_eq!(calls[0].timeout, None);
}

#[tokio::test]
async fn empty_logs_use_placeholder() {
    let runner = Arc::new(ScriptedRunner::new());

    let text = reporter(&runner).logs("demo", false).await.unwrap();

    assert_eq!(text, NO_LOGS);
}

#[tokio::test]
async fn log_snapshot_timeout_is_query_failed() {
    let runner = Arc::new(ScriptedRunner::new());
    runner.on("kubectl logs", Scripted::Hang);
    let config = ReporterConfig {
        query_timeout: Duration::from_millis(50),
        ..ReporterConfig::default()
    };

    let err = Reporter::new(runner.clone(), config)
        .logs("demo", false)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::QueryFailed { .. }));
    assert!(err.to_string().contains("timed out"));
}

#[tokio::test]
async fn dropping_a_follow_abandons_the_command() {
    let runner = Arc::new(ScriptedRunner::new());
    runner.on("kubectl logs", Scripted::Hang);
    let reporter = reporter(&runner);

    let result = tokio::time::timeout(Duration::from_millis(50), reporter.logs("demo", true)).await;

    assert!(result.is_err());
    assert_eq!(runner.dropped(), 1);
}

#[tokio::test]
async fn invalid_app_name_never_reaches_kubectl() {
    let runner = Arc::new(ScriptedRunner::new());

    let err = reporter(&runner).logs("demo,other", false).await.unwrap_err();

    assert!(matches!(err, Error::Fs(deploy_fs::Error::InvalidArgument { .. })));
    assert!(runner.calls().is_empty());
}
