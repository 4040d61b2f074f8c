//! Human-readable terminal renderer.

use std::path::Path;

use owo_colors::OwoColorize as _;

use crate::application::services::guard_evaluator::GuardReport;
use crate::application::services::guarded_exec::ExecReport;
use crate::application::services::line_editor::EditReport;
use crate::domain::config::DockhandConfig;
use crate::domain::error::ExecError;
use crate::output::OutputContext;

/// Renders reports as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    pub fn render_edit(&self, path: &str, report: &EditReport) {
        if self.ctx.quiet {
            return;
        }
        println!(
            "  {} {path}: {}",
            change_marker(report.changed).style(self.marker_style(report.changed)),
            report.msg
        );
        if let Some(backup) = &report.backup_file {
            self.ctx.kv("backup:", backup);
        }
    }

    /// Remote stdout/stderr are passed through unchanged, even when quiet.
    pub fn render_exec(&self, report: &ExecReport) {
        print!("{}", report.stdout);
        eprint!("{}", report.stderr);
        if self.ctx.quiet {
            return;
        }
        if report.skipped {
            self.ctx.info(&report.msg);
        } else {
            self.ctx.success(&report.msg);
        }
    }

    /// The failure line goes to stderr and is never suppressed.
    pub fn render_exec_failure(&self, err: &ExecError) {
        print!("{}", err.stdout);
        eprint!("{}", err.stderr);
        self.ctx.error(&err.to_string());
    }

    pub fn render_guard(&self, guard: &str, report: &GuardReport) {
        if self.ctx.quiet {
            return;
        }
        if report.skipped {
            self.ctx.info(&report.reason);
        } else {
            self.ctx.success(&format!("Guard {guard} allows the action"));
        }
    }

    /// Render the current configuration.
    pub fn render_config(&self, config: &DockhandConfig, path: &Path) {
        println!();
        println!(
            "  {}",
            format!("Configuration ({})", path.display()).style(self.ctx.styles.header)
        );
        println!();
        println!("  {:<32} {}", "transport.program:", config.transport.program);
        println!(
            "  {:<32} {}",
            "transport.probe_timeout_secs:", config.transport.probe_timeout_secs
        );
        println!(
            "  {:<32} {}",
            "transport.exec_timeout_secs:", config.transport.exec_timeout_secs
        );
        println!("  {:<32} {}", "guard.on_probe_error:", config.guard.on_probe_error);
        println!();
        println!("  {}", "Environment:".style(self.ctx.styles.header));
        for var in ["DOCKHAND_CONFIG", "DOCKHAND_LOG", "NO_COLOR"] {
            println!(
                "    {:<18} {}",
                format!("{var}:"),
                std::env::var(var).unwrap_or_else(|_| "(not set)".to_string())
            );
        }
        println!();
    }

    /// Render the CLI version information.
    pub fn render_version(&self, version: &str) {
        println!("dockhand {version}");
    }

    fn marker_style(&self, changed: bool) -> owo_colors::Style {
        if changed {
            self.ctx.styles.changed
        } else {
            self.ctx.styles.success
        }
    }
}

/// Leading marker for an edit result line.
#[must_use]
pub fn change_marker(changed: bool) -> &'static str {
    if changed { "changed" } else { "ok" }
}
