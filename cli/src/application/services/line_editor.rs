//! Application service — idempotent line edits inside a target.
//!
//! Probe, read, decide, then (optionally back up and) overwrite the whole
//! file in one write step. Imports only from `crate::domain` and
//! `crate::application::ports`.

use anyhow::Result;
use serde::Serialize;

use crate::application::ports::{Clock, ExecOptions, ProgressReporter, Transport};
use crate::application::services::RunSettings;
use crate::application::services::guard_evaluator::probe_path;
use crate::domain::backup::backup_path;
use crate::domain::error::{ProtocolError, TransportError, ValidationError};
use crate::domain::line::{EditOutcome, EditRequest, plan_edit};
use crate::domain::shell::{PathState, copy_script, read_script, write_script};

/// What a line edit did (or, in check mode, would do).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditReport {
    pub changed: bool,
    pub outcome: EditOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_file: Option<String>,
    pub msg: String,
}

/// Apply `req` to the file inside `target`.
///
/// With `settings.check_only` the outcome is computed but neither the
/// backup nor the write step runs.
///
/// # Errors
///
/// Returns a [`ValidationError`] before any remote call for invalid input, a
/// [`TransportError`] when a remote step fails, and a [`ProtocolError`] when
/// the probe output is not understood, the file is not UTF-8 text, or
/// verification fails.
pub async fn apply(
    transport: &impl Transport,
    clock: &impl Clock,
    reporter: &impl ProgressReporter,
    target: &str,
    req: &EditRequest,
    settings: &RunSettings,
) -> Result<EditReport> {
    if target.trim().is_empty() {
        return Err(ValidationError::EmptyTarget.into());
    }
    req.validate()?;

    let opts = ExecOptions::with_timeout(settings.probe_timeout);
    let current = match probe_path(transport, target, &req.path, settings.probe_timeout).await? {
        PathState::Exists => Some(read_file(transport, target, &req.path, &opts).await?),
        PathState::Missing => None,
    };

    let plan = plan_edit(req, current.as_deref())?;
    if plan.untouched_matches > 0 {
        let msg = format!(
            "{} further line(s) in {} match the regexp and were left unchanged",
            plan.untouched_matches, req.path
        );
        tracing::warn!(container = target, path = %req.path, extra = plan.untouched_matches, "multiple regexp matches");
        reporter.warn(&msg);
    }

    let mut report = EditReport {
        changed: plan.outcome.is_change(),
        outcome: plan.outcome,
        backup_file: None,
        msg: plan.message.to_string(),
    };

    let Some(content) = plan.content else {
        tracing::info!(container = target, path = %req.path, outcome = %report.outcome, "line edit finished");
        return Ok(report);
    };
    let script = write_script(&req.path, &content)?;

    if settings.check_only {
        tracing::info!(container = target, path = %req.path, outcome = %report.outcome, "check mode, not writing");
        return Ok(report);
    }

    if req.options.backup && current.is_some() {
        let backup = backup_path(&req.path, clock.now());
        reporter.step(&format!("Backing up {} to {backup}", req.path));
        run_step(transport, target, "backup", &copy_script(&req.path, &backup)?, &opts).await?;
        report.backup_file = Some(backup);
    }

    reporter.step(&format!("Writing {}", req.path));
    run_step(transport, target, "write", &script, &opts).await?;

    if req.options.verify {
        let written = read_file(transport, target, &req.path, &opts).await?;
        if written != normalized(&content) {
            return Err(ProtocolError::VerificationMismatch {
                path: req.path.clone(),
            }
            .into());
        }
    }

    tracing::info!(container = target, path = %req.path, outcome = %report.outcome, "line edit finished");
    Ok(report)
}

async fn read_file(
    transport: &impl Transport,
    target: &str,
    path: &str,
    opts: &ExecOptions,
) -> Result<String> {
    let bytes = run_step(transport, target, "read", &read_script(path)?, opts).await?;
    String::from_utf8(bytes).map_err(|_| {
        ProtocolError::NonUtf8Content {
            path: path.to_string(),
        }
        .into()
    })
}

/// Run one remote step, returning its stdout or a [`TransportError`].
async fn run_step(
    transport: &impl Transport,
    target: &str,
    step: &'static str,
    script: &str,
    opts: &ExecOptions,
) -> Result<Vec<u8>> {
    tracing::debug!(container = target, step, "running remote step");
    let out = transport.exec(target, script, opts).await;
    if !out.success() {
        return Err(TransportError::StepFailed {
            step,
            target: target.to_string(),
            code: out.code,
            stderr: out.stderr.trim().to_string(),
        }
        .into());
    }
    Ok(out.stdout)
}

/// Content as it lands on disk after a heredoc write.
fn normalized(content: &str) -> String {
    if content.is_empty() || content.ends_with('\n') {
        content.to_string()
    } else {
        format!("{content}\n")
    }
}
