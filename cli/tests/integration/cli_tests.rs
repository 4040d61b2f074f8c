//! Integration tests for argument parsing, validation and failure paths.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const MISSING_ENGINE: &str = "dockhand-test-no-such-engine";

/// Binary with an isolated config that points at a nonexistent engine.
fn dockhand() -> (TempDir, Command) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("config.yaml");
    std::fs::write(
        &path,
        format!("transport:\n  program: {MISSING_ENGINE}\n  probe_timeout_secs: 5\n"),
    )
    .expect("write config");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("dockhand"));
    cmd.env("NO_COLOR", "1")
        .env("DOCKHAND_CONFIG", &path)
        .env_remove("DOCKHAND_LOG");
    (dir, cmd)
}

fn json_stdout(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

// --- Help and version tests ---

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    let (_dir, mut cmd) = dockhand();
    cmd.assert().code(2).stderr(predicate::str::contains(
        "Idempotent file edits and guarded commands",
    ));
}

#[test]
fn test_cli_help_lists_commands() {
    let (_dir, mut cmd) = dockhand();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("line"))
        .stdout(predicate::str::contains("exec"))
        .stdout(predicate::str::contains("guard"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_version_command_shows_version() {
    let (_dir, mut cmd) = dockhand();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "dockhand {}",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn test_version_command_json_outputs_valid_json() {
    let (_dir, mut cmd) = dockhand();
    let output = cmd.args(["--json", "version"]).output().expect("run");
    assert!(output.status.success());
    assert_eq!(json_stdout(&output)["version"], env!("CARGO_PKG_VERSION"));
}

// --- Usage errors (clap, exit 2) ---

#[test]
fn test_exec_conflicting_guards_is_usage_error() {
    let (_dir, mut cmd) = dockhand();
    cmd.args(["exec", "web", "--creates", "/a", "--removes", "/b", "--", "true"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_guard_requires_creates_or_removes() {
    let (_dir, mut cmd) = dockhand();
    cmd.args(["guard", "web"]).assert().code(2);
}

#[test]
fn test_exec_requires_command() {
    let (_dir, mut cmd) = dockhand();
    cmd.args(["exec", "web"]).assert().code(2);
}

#[test]
fn test_exec_rejects_malformed_env_entry() {
    let (_dir, mut cmd) = dockhand();
    cmd.args(["exec", "web", "-e", "NOEQUALS", "--", "env"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("expected KEY=VALUE"));
}

#[test]
fn test_exec_zero_timeout_is_usage_error() {
    let (_dir, mut cmd) = dockhand();
    cmd.args(["exec", "web", "--timeout", "0", "--", "true"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("positive number of seconds"));
}

#[test]
fn test_invalid_probe_policy_is_usage_error() {
    let (_dir, mut cmd) = dockhand();
    cmd.args(["guard", "web", "--creates", "/x", "--on-probe-error", "ignore"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("proceed, abort"));
}

#[test]
fn test_replace_all_requires_regexp() {
    let (_dir, mut cmd) = dockhand();
    cmd.args(["line", "web", "/etc/x", "--line", "a", "--replace-all"])
        .assert()
        .code(2);
}

// --- Validation errors (exit 1, no remote call) ---

#[test]
fn test_line_present_without_line_fails_validation() {
    let (_dir, mut cmd) = dockhand();
    cmd.args(["line", "web", "/etc/hosts"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("line is required"));
}

#[test]
fn test_line_absent_without_line_or_regexp_fails_validation() {
    let (_dir, mut cmd) = dockhand();
    cmd.args(["line", "web", "/etc/hosts", "--state", "absent"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("line or regexp is required"));
}

#[test]
fn test_invalid_regexp_fails_validation() {
    let (_dir, mut cmd) = dockhand();
    cmd.args(["line", "web", "/etc/hosts", "--line", "x", "--regexp", "("])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid regexp"));
}

#[test]
fn test_empty_target_json_error_object() {
    let (_dir, mut cmd) = dockhand();
    let output = cmd
        .args(["--json", "line", "", "/etc/hosts", "--line", "x"])
        .output()
        .expect("run");

    assert_eq!(output.status.code(), Some(1));
    let value = json_stdout(&output);
    assert_eq!(value["error"], true);
    assert_eq!(value["code"], "validation");
    assert_eq!(value["message"], "target must not be empty");
}

// --- Transport failures ---

#[test]
fn test_line_with_unreachable_engine_is_transport_error() {
    let (_dir, mut cmd) = dockhand();
    let output = cmd
        .args(["--json", "line", "web", "/etc/hosts", "--line", "x"])
        .output()
        .expect("run");

    assert_eq!(output.status.code(), Some(1));
    let value = json_stdout(&output);
    assert_eq!(value["code"], "transport");
    assert!(
        value["message"]
            .as_str()
            .expect("message")
            .contains("existence probe failed on web (exit 127)")
    );
}

#[test]
fn test_exec_spawn_failure_exits_with_127() {
    let (_dir, mut cmd) = dockhand();
    cmd.args(["exec", "web", "--", "true"])
        .assert()
        .code(127)
        .stderr(predicate::str::contains("Command failed with return code 127"));
}

#[test]
fn test_exec_failure_json_carries_rc() {
    let (_dir, mut cmd) = dockhand();
    let output = cmd
        .args(["--json", "exec", "web", "--", "true"])
        .output()
        .expect("run");

    assert_eq!(output.status.code(), Some(127));
    let value = json_stdout(&output);
    assert_eq!(value["code"], "exec");
    assert_eq!(value["rc"], 127);
    assert!(
        value["stderr"]
            .as_str()
            .expect("stderr")
            .contains(MISSING_ENGINE)
    );
}

#[test]
fn test_guard_probe_failure_proceeds_with_warning() {
    let (_dir, mut cmd) = dockhand();
    let output = cmd
        .args(["--json", "guard", "web", "--creates", "/opt/.done"])
        .output()
        .expect("run");

    assert!(output.status.success());
    assert_eq!(
        json_stdout(&output),
        serde_json::json!({ "skipped": false, "reason": "" })
    );
    assert!(String::from_utf8_lossy(&output.stderr).contains("Could not check creates=/opt/.done"));
}

#[test]
fn test_guard_probe_failure_aborts_when_asked() {
    let (_dir, mut cmd) = dockhand();
    cmd.args([
        "guard",
        "web",
        "--removes",
        "/tmp/lock",
        "--on-probe-error",
        "abort",
    ])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("guard check removes=/tmp/lock failed on web"));
}

#[test]
fn test_check_mode_exec_does_not_run() {
    let (_dir, mut cmd) = dockhand();
    let output = cmd
        .args(["--check", "--json", "exec", "web", "--creates", "/x", "--", "touch /x"])
        .output()
        .expect("run");

    assert!(output.status.success());
    let value = json_stdout(&output);
    assert_eq!(value["msg"], "Would execute command (check mode)");
    assert_eq!(value["changed"], true);
    assert_eq!(value["skipped"], false);
}
