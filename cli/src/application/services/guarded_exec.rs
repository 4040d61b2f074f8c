//! Application service — run a command in a target behind an optional guard.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::Result;
use serde::Serialize;

use crate::application::ports::{ExecOptions, ProgressReporter, Transport};
use crate::application::services::RunSettings;
use crate::application::services::guard_evaluator;
use crate::domain::error::{ExecError, ValidationError};
use crate::domain::exec::ExecRequest;
use crate::domain::guard::{Guard, GuardDecision};

/// Result of a guarded command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecReport {
    pub changed: bool,
    pub skipped: bool,
    pub msg: String,
    pub rc: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ExecReport {
    fn not_run(changed: bool, skipped: bool, msg: String) -> Self {
        Self {
            changed,
            skipped,
            msg,
            rc: 0,
            stdout: String::new(),
            stderr: String::new(),
        }
    }
}

/// Evaluate `guard` (if any) and run `req` inside `target`.
///
/// The command is assumed to change state whenever it runs. A skipped guard
/// and check mode both return without executing anything.
///
/// # Errors
///
/// Returns a [`ValidationError`] before any remote call for invalid input,
/// the guard error under the abort policy, and an [`ExecError`] carrying
/// rc/stdout/stderr when the command exits nonzero.
pub async fn run(
    transport: &impl Transport,
    reporter: &impl ProgressReporter,
    target: &str,
    req: &ExecRequest,
    guard: Option<&Guard>,
    settings: &RunSettings,
) -> Result<ExecReport> {
    if target.trim().is_empty() {
        return Err(ValidationError::EmptyTarget.into());
    }
    let script = req.script()?;

    if let Some(guard) = guard {
        if let GuardDecision::Skip(reason) =
            guard_evaluator::evaluate(transport, reporter, target, guard, settings).await?
        {
            return Ok(ExecReport::not_run(false, true, reason));
        }
    }

    if settings.check_only {
        return Ok(ExecReport::not_run(
            true,
            false,
            "Would execute command (check mode)".to_string(),
        ));
    }

    let opts = ExecOptions {
        timeout: req.timeout.unwrap_or(settings.exec_timeout),
        user: req.user.clone(),
        env: req.env.clone(),
        stdin: req.stdin.clone(),
    };
    tracing::debug!(container = target, user = ?opts.user, timeout_secs = opts.timeout.as_secs(), "executing command");
    let out = transport.exec(target, &script, &opts).await;
    tracing::info!(container = target, rc = out.code, "command finished");

    let stdout = out.stdout_lossy();
    if !out.success() {
        return Err(ExecError {
            rc: out.code,
            stdout,
            stderr: out.stderr,
        }
        .into());
    }

    Ok(ExecReport {
        changed: true,
        skipped: false,
        msg: "Command executed successfully".to_string(),
        rc: out.code,
        stdout,
        stderr: out.stderr,
    })
}
