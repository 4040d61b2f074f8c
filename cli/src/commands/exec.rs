//! `dockhand exec` — run a command in a container behind an optional guard.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::guarded_exec;
use crate::domain::error::ExecError;
use crate::domain::exec::{ExecCommand, ExecRequest, parse_env, parse_timeout};
use crate::domain::guard::{Guard, ProbeFailurePolicy};

/// Arguments for the exec command.
#[derive(Args)]
#[command(trailing_var_arg = true)]
pub struct ExecArgs {
    /// Container name or ID
    pub target: String,

    /// Skip when this path already exists
    #[arg(long, value_name = "PATH", conflicts_with = "removes")]
    pub creates: Option<String>,

    /// Skip when this path does not exist
    #[arg(long, value_name = "PATH")]
    pub removes: Option<String>,

    /// Change into this directory first
    #[arg(long, value_name = "DIR")]
    pub chdir: Option<String>,

    /// Run as this user
    #[arg(long)]
    pub user: Option<String>,

    /// Environment variable for the command (repeatable)
    #[arg(short = 'e', long = "env", value_name = "KEY=VALUE", value_parser = parse_env)]
    pub env: Vec<(String, String)>,

    /// Text piped to the command's stdin
    #[arg(long, value_name = "TEXT")]
    pub stdin: Option<String>,

    /// Command timeout in seconds
    #[arg(long, value_name = "SECS", value_parser = parse_timeout)]
    pub timeout: Option<Duration>,

    /// What to do when the guard probe itself fails
    #[arg(long, value_name = "POLICY")]
    pub on_probe_error: Option<ProbeFailurePolicy>,

    /// Command to run; a single word is passed to `sh -c` as is
    #[arg(required = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// Run the exec command.
///
/// A command that runs and exits nonzero is rendered and mapped to its own
/// exit code instead of being returned as an error.
///
/// # Errors
///
/// Returns an error for invalid arguments, a failing guard under the abort
/// policy, or a failure to render output.
pub async fn run(app: &AppContext, args: ExecArgs) -> Result<ExitCode> {
    let guard = Guard::from_options(args.creates, args.removes)?;
    let req = ExecRequest {
        command: ExecCommand::from_words(args.command),
        chdir: args.chdir,
        user: args.user,
        env: args.env,
        stdin: args.stdin,
        timeout: args.timeout,
    };
    let settings = app.settings(args.on_probe_error);

    let result = guarded_exec::run(
        &app.transport,
        &app.reporter(),
        &args.target,
        &req,
        guard.as_ref(),
        &settings,
    )
    .await;

    match result {
        Ok(report) => {
            app.renderer().render_exec(&report)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => match err.downcast_ref::<ExecError>() {
            Some(failed) => {
                app.renderer().render_exec_failure(failed)?;
                Ok(exit_code_for(failed.rc))
            }
            None => Err(err),
        },
    }
}

/// Process exit code mirroring the remote return code.
#[must_use]
pub fn exit_code_for(rc: i32) -> ExitCode {
    u8::try_from(rc)
        .ok()
        .filter(|code| *code != 0)
        .map_or(ExitCode::FAILURE, ExitCode::from)
}
