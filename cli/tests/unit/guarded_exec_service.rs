//! Guarded execution service tests.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::time::Duration;

use dockhand_cli::application::services::RunSettings;
use dockhand_cli::application::services::guarded_exec::{self, ExecReport};
use dockhand_cli::domain::error::{ExecError, ValidationError};
use dockhand_cli::domain::exec::{ExecCommand, ExecRequest};
use dockhand_cli::domain::guard::{Guard, ProbeFailurePolicy};

use crate::mocks::{CollectingReporter, FakeContainer, Step};

fn shell(cmd: &str) -> ExecRequest {
    ExecRequest::new(ExecCommand::Shell(cmd.to_string()))
}

async fn run(
    container: &FakeContainer,
    req: &ExecRequest,
    guard: Option<&Guard>,
    settings: &RunSettings,
) -> anyhow::Result<ExecReport> {
    guarded_exec::run(
        container,
        &CollectingReporter::default(),
        "web",
        req,
        guard,
        settings,
    )
    .await
}

#[tokio::test]
async fn test_guard_skip_never_runs_command() {
    let container = FakeContainer::new().with_file("/marker", "");
    let guard = Guard::creates("/marker");

    let report = run(&container, &shell("touch /marker"), Some(&guard), &RunSettings::default())
        .await
        .unwrap();

    assert!(!report.changed);
    assert!(report.skipped);
    assert_eq!(container.count(Step::Command), 0);
    assert_eq!(container.count(Step::Write), 0);
}

#[tokio::test]
async fn test_successful_command_reports_output() {
    let container = FakeContainer::new().with_command_result(0, "hello\n", "");
    let report = run(&container, &shell("echo hello"), None, &RunSettings::default())
        .await
        .unwrap();

    assert_eq!(
        report,
        ExecReport {
            changed: true,
            skipped: false,
            msg: "Command executed successfully".to_string(),
            rc: 0,
            stdout: "hello\n".to_string(),
            stderr: String::new(),
        }
    );
}

#[tokio::test]
async fn test_nonzero_exit_is_exec_error() {
    let container = FakeContainer::new().with_command_result(3, "partial\n", "boom\n");
    let err = run(&container, &shell("false"), None, &RunSettings::default())
        .await
        .unwrap_err();

    let exec = err.downcast_ref::<ExecError>().expect("exec error");
    assert_eq!(exec.rc, 3);
    assert_eq!(exec.stdout, "partial\n");
    assert_eq!(exec.stderr, "boom\n");
    assert_eq!(err.to_string(), "Command failed with return code 3");
}

#[tokio::test]
async fn test_check_mode_does_not_run_command() {
    let container = FakeContainer::new();
    let settings = RunSettings {
        check_only: true,
        ..RunSettings::default()
    };
    let guard = Guard::creates("/marker");

    let report = run(&container, &shell("make install"), Some(&guard), &settings)
        .await
        .unwrap();

    assert!(report.changed);
    assert_eq!(report.msg, "Would execute command (check mode)");
    assert_eq!(container.steps(), vec![Step::Probe]);
}

#[tokio::test]
async fn test_probe_failure_runs_command_under_proceed_policy() {
    let container = FakeContainer::new().failing(Step::Probe, 1, "denied");
    let guard = Guard::removes("/x");

    let report = run(&container, &shell("rm /x"), Some(&guard), &RunSettings::default())
        .await
        .unwrap();

    assert!(!report.skipped);
    assert_eq!(container.count(Step::Command), 1);
}

#[tokio::test]
async fn test_probe_failure_runs_nothing_under_abort_policy() {
    let container = FakeContainer::new().failing(Step::Probe, 1, "denied");
    let guard = Guard::removes("/x");
    let settings = RunSettings {
        on_probe_error: ProbeFailurePolicy::Abort,
        ..RunSettings::default()
    };

    run(&container, &shell("rm /x"), Some(&guard), &settings)
        .await
        .unwrap_err();

    assert_eq!(container.count(Step::Command), 0);
}

#[tokio::test]
async fn test_request_options_reach_transport() {
    let container = FakeContainer::new();
    let mut req = ExecRequest::new(ExecCommand::from_words(vec![
        "ls".to_string(),
        "-la".to_string(),
        "my dir".to_string(),
    ]));
    req.chdir = Some("/srv/app".to_string());
    req.user = Some("www-data".to_string());
    req.env = vec![("MODE".to_string(), "prod".to_string())];
    req.stdin = Some("input\n".to_string());
    req.timeout = Some(Duration::from_secs(5));

    run(&container, &req, None, &RunSettings::default())
        .await
        .unwrap();

    let call = container.calls().pop().expect("one call");
    assert_eq!(
        shlex::split(&call.script).unwrap(),
        vec!["cd", "/srv/app", "&&", "ls", "-la", "my dir"]
    );
    assert_eq!(call.opts.user.as_deref(), Some("www-data"));
    assert_eq!(call.opts.env, vec![("MODE".to_string(), "prod".to_string())]);
    assert_eq!(call.opts.stdin.as_deref(), Some("input\n"));
    assert_eq!(call.opts.timeout, Duration::from_secs(5));
}

#[tokio::test]
async fn test_default_exec_timeout_comes_from_settings() {
    let container = FakeContainer::new();
    let settings = RunSettings {
        exec_timeout: Duration::from_secs(42),
        ..RunSettings::default()
    };

    run(&container, &shell("true"), None, &settings).await.unwrap();

    assert_eq!(container.calls()[0].opts.timeout, Duration::from_secs(42));
}

#[tokio::test]
async fn test_empty_command_rejected_without_remote_call() {
    let container = FakeContainer::new();
    let guard = Guard::creates("/x");
    let err = run(&container, &shell("  "), Some(&guard), &RunSettings::default())
        .await
        .unwrap_err();

    assert_eq!(
        err.downcast_ref::<ValidationError>(),
        Some(&ValidationError::EmptyCommand)
    );
    assert!(container.calls().is_empty());
}
