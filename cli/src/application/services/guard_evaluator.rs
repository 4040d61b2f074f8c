//! Application service — `creates` / `removes` guard evaluation.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::application::ports::{ExecOptions, ProgressReporter, Transport};
use crate::application::services::RunSettings;
use crate::domain::error::{ProtocolError, TransportError, ValidationError};
use crate::domain::guard::{Guard, GuardDecision, ProbeFailurePolicy};
use crate::domain::shell::{PathState, parse_probe_output, probe_script};

/// Guard outcome as reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuardReport {
    pub skipped: bool,
    pub reason: String,
}

impl From<&GuardDecision> for GuardReport {
    fn from(decision: &GuardDecision) -> Self {
        Self {
            skipped: decision.is_skip(),
            reason: decision.reason().to_string(),
        }
    }
}

/// Probe whether `path` exists inside `target`.
///
/// # Errors
///
/// Returns a [`ValidationError`] if the path cannot be quoted, a
/// [`TransportError`] if the probe exits nonzero (including timeouts), and a
/// [`ProtocolError`] if the probe output is not understood.
pub async fn probe_path(
    transport: &impl Transport,
    target: &str,
    path: &str,
    timeout: Duration,
) -> Result<PathState> {
    let script = probe_script(path)?;
    run_probe(transport, target, path, &script, timeout).await
}

async fn run_probe(
    transport: &impl Transport,
    target: &str,
    path: &str,
    script: &str,
    timeout: Duration,
) -> Result<PathState> {
    tracing::debug!(container = target, path, "probing path");
    let out = transport
        .exec(target, script, &ExecOptions::with_timeout(timeout))
        .await;
    if !out.success() {
        return Err(TransportError::StepFailed {
            step: "existence probe",
            target: target.to_string(),
            code: out.code,
            stderr: out.stderr.trim().to_string(),
        }
        .into());
    }
    let stdout = out.stdout_lossy();
    parse_probe_output(&stdout).ok_or_else(|| {
        ProtocolError::UnexpectedProbeOutput {
            path: path.to_string(),
            stdout: stdout.trim().to_string(),
        }
        .into()
    })
}

/// Decide whether the action protected by `guard` should run.
///
/// A failing probe never silently counts as "exists" or "missing": with
/// [`ProbeFailurePolicy::Proceed`] the action runs and a warning is emitted,
/// with [`ProbeFailurePolicy::Abort`] the error is returned.
///
/// # Errors
///
/// Returns a [`ValidationError`] for an empty target or unquotable path, and
/// the probe error under [`ProbeFailurePolicy::Abort`].
pub async fn evaluate(
    transport: &impl Transport,
    reporter: &impl ProgressReporter,
    target: &str,
    guard: &Guard,
    settings: &RunSettings,
) -> Result<GuardDecision> {
    if target.trim().is_empty() {
        return Err(ValidationError::EmptyTarget.into());
    }
    let script = probe_script(&guard.path)?;

    match run_probe(transport, target, &guard.path, &script, settings.probe_timeout).await {
        Ok(state) => {
            let decision = guard.decide(state);
            tracing::info!(container = target, %guard, skip = decision.is_skip(), "guard evaluated");
            Ok(decision)
        }
        Err(err) => match settings.on_probe_error {
            ProbeFailurePolicy::Proceed => {
                tracing::warn!(
                    container = target,
                    %guard,
                    error = %format!("{err:#}"),
                    "guard probe failed, proceeding"
                );
                reporter.warn(&format!("Could not check {guard} ({err:#}); proceeding"));
                Ok(GuardDecision::Proceed)
            }
            ProbeFailurePolicy::Abort => {
                Err(err).with_context(|| format!("guard check {guard} failed on {target}"))
            }
        },
    }
}
