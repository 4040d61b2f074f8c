//! `dockhand guard` — evaluate a guard without running anything.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::guard_evaluator::{self, GuardReport};
use crate::domain::guard::{Guard, ProbeFailurePolicy};
use crate::output::progress;

/// Arguments for the guard command.
#[derive(Args)]
pub struct GuardArgs {
    /// Container name or ID
    pub target: String,

    /// Skip when this path already exists
    #[arg(
        long,
        value_name = "PATH",
        conflicts_with = "removes",
        required_unless_present = "removes"
    )]
    pub creates: Option<String>,

    /// Skip when this path does not exist
    #[arg(long, value_name = "PATH")]
    pub removes: Option<String>,

    /// What to do when the probe itself fails
    #[arg(long, value_name = "POLICY")]
    pub on_probe_error: Option<ProbeFailurePolicy>,
}

/// Run the guard command.
///
/// # Errors
///
/// Returns an error for invalid arguments or a failing probe under the abort
/// policy.
pub async fn run(app: &AppContext, args: GuardArgs) -> Result<ExitCode> {
    let Some(guard) = Guard::from_options(args.creates, args.removes)? else {
        anyhow::bail!("either --creates or --removes is required");
    };
    let settings = app.settings(args.on_probe_error);

    let spinner = (app.output.show_progress() && !app.is_json())
        .then(|| progress::spinner(&format!("Checking {guard} on {}", args.target)));
    let result = guard_evaluator::evaluate(
        &app.transport,
        &app.reporter(),
        &args.target,
        &guard,
        &settings,
    )
    .await;

    let decision = match result {
        Ok(decision) => {
            if let Some(pb) = &spinner {
                progress::finish_clear(pb);
            }
            decision
        }
        Err(err) => {
            if let Some(pb) = &spinner {
                progress::finish_error(pb, "Guard check failed");
            }
            return Err(err);
        }
    };

    app.renderer()
        .render_guard(&guard.to_string(), &GuardReport::from(&decision))?;
    Ok(ExitCode::SUCCESS)
}
