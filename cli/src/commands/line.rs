//! `dockhand line` — ensure a line is present in or absent from a file.

use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, ValueEnum};

use crate::app::AppContext;
use crate::application::services::line_editor;
use crate::domain::line::{EditIntent, EditOptions, EditRequest, LineSpec, MatchPolicy};

/// Desired state of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StateArg {
    Present,
    Absent,
}

impl From<StateArg> for EditIntent {
    fn from(state: StateArg) -> Self {
        match state {
            StateArg::Present => Self::Present,
            StateArg::Absent => Self::Absent,
        }
    }
}

/// Arguments for the line command.
#[derive(Args)]
pub struct LineArgs {
    /// Container name or ID
    pub target: String,

    /// File path inside the container
    pub path: String,

    /// Line to insert, or to remove when absent
    #[arg(long)]
    pub line: Option<String>,

    /// Regular expression anchored at line start
    #[arg(long, value_name = "RE")]
    pub regexp: Option<String>,

    /// Whether the line should be present or absent
    #[arg(long, value_enum, default_value_t = StateArg::Present)]
    pub state: StateArg,

    /// Replace every matching line instead of the first
    #[arg(long, requires = "regexp")]
    pub replace_all: bool,

    /// Create the file if it does not exist
    #[arg(long)]
    pub create: bool,

    /// Copy the file to a timestamped backup before changing it
    #[arg(long)]
    pub backup: bool,

    /// Read the file back after writing and compare
    #[arg(long)]
    pub verify: bool,
}

impl LineArgs {
    fn into_request(self) -> Result<(String, EditRequest)> {
        let policy = if self.replace_all {
            MatchPolicy::AllMatches
        } else {
            MatchPolicy::FirstMatch
        };
        let spec = LineSpec::new(self.line, self.regexp.as_deref())?.with_policy(policy);
        let req = EditRequest {
            path: self.path,
            spec,
            intent: self.state.into(),
            options: EditOptions {
                create: self.create,
                backup: self.backup,
                verify: self.verify,
            },
        };
        Ok((self.target, req))
    }
}

/// Run the line command.
///
/// # Errors
///
/// Returns an error for invalid arguments or when a remote step fails.
pub async fn run(app: &AppContext, args: LineArgs) -> Result<ExitCode> {
    let (target, req) = args.into_request()?;
    let settings = app.settings(None);

    let report = line_editor::apply(
        &app.transport,
        &app.clock,
        &app.reporter(),
        &target,
        &req,
        &settings,
    )
    .await?;

    app.renderer().render_edit(&req.path, &report)?;
    Ok(ExitCode::SUCCESS)
}
