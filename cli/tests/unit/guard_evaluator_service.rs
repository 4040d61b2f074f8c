//! Guard evaluation tests, including both probe failure policies.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use dockhand_cli::application::services::RunSettings;
use dockhand_cli::application::services::guard_evaluator::{self, GuardReport};
use dockhand_cli::domain::error::{ProtocolError, TransportError, ValidationError};
use dockhand_cli::domain::guard::{Guard, GuardDecision, ProbeFailurePolicy};

use crate::mocks::{CollectingReporter, FakeContainer, Step};

fn abort() -> RunSettings {
    RunSettings {
        on_probe_error: ProbeFailurePolicy::Abort,
        ..RunSettings::default()
    }
}

async fn evaluate(
    container: &FakeContainer,
    guard: &Guard,
    settings: &RunSettings,
) -> anyhow::Result<(GuardDecision, Vec<String>)> {
    let reporter = CollectingReporter::default();
    let decision =
        guard_evaluator::evaluate(container, &reporter, "web", guard, settings).await?;
    Ok((decision, reporter.warnings()))
}

#[tokio::test]
async fn test_creates_skips_when_marker_exists() {
    let container = FakeContainer::new().with_file("/opt/app/.installed", "");
    let (decision, _) = evaluate(
        &container,
        &Guard::creates("/opt/app/.installed"),
        &RunSettings::default(),
    )
    .await
    .unwrap();

    assert_eq!(
        decision,
        GuardDecision::Skip(
            "Skipped: file /opt/app/.installed already exists (creates check)".to_string()
        )
    );
    assert_eq!(container.steps(), vec![Step::Probe]);
}

#[tokio::test]
async fn test_creates_proceeds_when_marker_missing() {
    let container = FakeContainer::new();
    let (decision, warnings) = evaluate(
        &container,
        &Guard::creates("/opt/app/.installed"),
        &RunSettings::default(),
    )
    .await
    .unwrap();

    assert_eq!(decision, GuardDecision::Proceed);
    assert!(warnings.is_empty());
}

#[tokio::test]
async fn test_removes_skips_when_path_absent() {
    let container = FakeContainer::new();
    let (decision, _) = evaluate(&container, &Guard::removes("/tmp/lock"), &RunSettings::default())
        .await
        .unwrap();

    assert!(decision.is_skip());
    assert!(decision.reason().contains("does not exist (removes check)"));
}

#[tokio::test]
async fn test_removes_proceeds_when_path_present() {
    let container = FakeContainer::new().with_file("/tmp/lock", "1\n");
    let (decision, _) = evaluate(&container, &Guard::removes("/tmp/lock"), &RunSettings::default())
        .await
        .unwrap();

    assert_eq!(decision, GuardDecision::Proceed);
}

#[tokio::test]
async fn test_probe_failure_proceeds_with_warning_by_default() {
    let container = FakeContainer::new().failing(Step::Probe, 1, "Error: No such container: web");
    let (decision, warnings) =
        evaluate(&container, &Guard::creates("/x"), &RunSettings::default())
            .await
            .unwrap();

    assert_eq!(decision, GuardDecision::Proceed);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("creates=/x"));
}

#[tokio::test]
async fn test_probe_failure_aborts_under_abort_policy() {
    let container = FakeContainer::new().failing(Step::Probe, 124, "timed out");
    let err = evaluate(&container, &Guard::creates("/x"), &abort())
        .await
        .unwrap_err();

    let transport = err.downcast_ref::<TransportError>().expect("transport error");
    assert_eq!(transport.code(), 124);
    assert!(format!("{err:#}").contains("guard check creates=/x failed on web"));
}

#[tokio::test]
async fn test_garbled_probe_output_follows_policy() {
    let garbled = || FakeContainer::new().with_probe_stdout("maybe\n");

    let (decision, warnings) = evaluate(&garbled(), &Guard::removes("/x"), &RunSettings::default())
        .await
        .unwrap();
    assert_eq!(decision, GuardDecision::Proceed);
    assert_eq!(warnings.len(), 1);

    let err = evaluate(&garbled(), &Guard::removes("/x"), &abort())
        .await
        .unwrap_err();
    assert!(err.downcast_ref::<ProtocolError>().is_some());
}

#[tokio::test]
async fn test_empty_target_rejected_without_probe() {
    let container = FakeContainer::new();
    let err = guard_evaluator::evaluate(
        &container,
        &CollectingReporter::default(),
        "",
        &Guard::creates("/x"),
        &RunSettings::default(),
    )
    .await
    .unwrap_err();

    assert_eq!(
        err.downcast_ref::<ValidationError>(),
        Some(&ValidationError::EmptyTarget)
    );
    assert!(container.calls().is_empty());
}

#[tokio::test]
async fn test_path_with_spaces_is_quoted_in_probe() {
    let container = FakeContainer::new().with_file("/srv/my app/ready", "");
    let (decision, _) = evaluate(
        &container,
        &Guard::creates("/srv/my app/ready"),
        &RunSettings::default(),
    )
    .await
    .unwrap();

    assert!(decision.is_skip());
}

#[test]
fn test_guard_report_contract() {
    let skipped = GuardReport::from(&GuardDecision::Skip("why".to_string()));
    assert!(skipped.skipped);
    assert_eq!(skipped.reason, "why");

    let proceed = GuardReport::from(&GuardDecision::Proceed);
    let value = serde_json::to_value(&proceed).unwrap();
    assert_eq!(value, serde_json::json!({ "skipped": false, "reason": "" }));
}
