//! `TerminalReporter` — Presentation-layer implementation of `ProgressReporter`.
//!
//! Wraps `&OutputContext` and implements the `application::ports::ProgressReporter`
//! trait so application services can emit progress events without depending on
//! any presentation type directly.

use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::OutputContext;

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// - `step()` prints `"  → {message}"` to stdout (suppressed when quiet or JSON)
/// - `warn()` prints `"  ! {message}"` to stderr (suppressed when quiet)
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    json: bool,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    ///
    /// In JSON mode stdout is reserved for the JSON document.
    #[must_use]
    pub fn new(ctx: &'a OutputContext, json: bool) -> Self {
        Self { ctx, json }
    }

    fn stdout_enabled(&self) -> bool {
        !self.ctx.quiet && !self.json
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        if self.stdout_enabled() {
            println!("  {} {message}", "→".style(self.ctx.styles.info));
        }
    }

    fn warn(&self, message: &str) {
        if !self.ctx.quiet {
            eprintln!("  {} {message}", "!".style(self.ctx.styles.warning));
        }
    }
}
