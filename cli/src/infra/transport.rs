//! `docker exec`-style implementation of the `Transport` port.
//!
//! Every call is one `<program> exec ... <target> sh -c <script>` process;
//! nothing is kept open between calls.

use std::process::{ExitStatus, Output};

use anyhow::Result;

use crate::application::ports::{
    CommandRunner, ExecOptions, ExecOutput, SPAWN_FAILURE_EXIT_CODE, TIMEOUT_EXIT_CODE, Transport,
};
use crate::infra::command_runner::{RunnerError, TokioCommandRunner};

/// Transport that shells out to a container engine CLI.
pub struct DockerTransport<R: CommandRunner> {
    runner: R,
    program: String,
}

impl<R: CommandRunner> DockerTransport<R> {
    /// Create a transport using `runner` to invoke `program` (e.g. `docker`).
    pub fn new(runner: R, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
        }
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[must_use]
    pub fn runner(&self) -> &R {
        &self.runner
    }
}

/// Arguments passed to the engine CLI for one exec.
#[must_use]
pub fn exec_args(target: &str, script: &str, opts: &ExecOptions) -> Vec<String> {
    let mut args = vec!["exec".to_string()];
    if opts.stdin.is_some() {
        args.push("-i".to_string());
    }
    if let Some(user) = &opts.user {
        args.push("--user".to_string());
        args.push(user.clone());
    }
    for (key, value) in &opts.env {
        args.push("-e".to_string());
        args.push(format!("{key}={value}"));
    }
    args.extend([
        target.to_string(),
        "sh".to_string(),
        "-c".to_string(),
        script.to_string(),
    ]);
    args
}

impl DockerTransport<TokioCommandRunner> {
    /// Production transport backed by [`TokioCommandRunner`].
    #[must_use]
    pub fn with_program(program: impl Into<String>) -> Self {
        Self::new(TokioCommandRunner::default(), program)
    }
}

impl<R: CommandRunner> Transport for DockerTransport<R> {
    async fn exec(&self, target: &str, script: &str, opts: &ExecOptions) -> ExecOutput {
        let args = exec_args(target, script, opts);
        let argv: Vec<&str> = args.iter().map(String::as_str).collect();

        let result = match &opts.stdin {
            Some(input) => {
                self.runner
                    .run_with_stdin(&self.program, &argv, input.as_bytes(), opts.timeout)
                    .await
            }
            None => {
                self.runner
                    .run_with_timeout(&self.program, &argv, opts.timeout)
                    .await
            }
        };
        to_exec_output(result)
    }
}

fn to_exec_output(result: Result<Output>) -> ExecOutput {
    match result {
        Ok(output) => ExecOutput {
            code: exit_code(output.status),
            stdout: output.stdout,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        },
        Err(err) => {
            let code = match err.downcast_ref::<RunnerError>() {
                Some(RunnerError::TimedOut { .. }) => TIMEOUT_EXIT_CODE,
                _ => SPAWN_FAILURE_EXIT_CODE,
            };
            tracing::debug!(code, error = %format!("{err:#}"), "transport failure");
            ExecOutput {
                code,
                stdout: Vec::new(),
                stderr: format!("{err:#}"),
            }
        }
    }
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|sig| 128 + sig))
        .unwrap_or(1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
