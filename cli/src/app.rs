//! Application context — unified state passed to every command handler.
//!
//! Built once from the global flags and the configuration file; command
//! handlers only ever see `&AppContext`.

use anyhow::Result;

use crate::application::services::{RunSettings, config_service};
use crate::domain::config::DockhandConfig;
use crate::domain::guard::ProbeFailurePolicy;
use crate::infra::clock::SystemClock;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlConfigStore;
use crate::infra::transport::DockerTransport;
use crate::output::{HumanRenderer, JsonRenderer, OutputContext, Renderer, TerminalReporter};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Enable JSON output mode.
    pub json: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Decide and report only.
    pub check: bool,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Configuration persistence.
    pub config_store: YamlConfigStore,
    /// Configuration loaded at startup.
    pub config: DockhandConfig,
    /// Remote execution over the configured engine CLI.
    pub transport: DockerTransport<TokioCommandRunner>,
    pub clock: SystemClock,
    /// `--check` was given.
    pub check_only: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be parsed.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let mode = if flags.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };
        let config_store = YamlConfigStore::new();
        let config = config_service::load_config(&config_store)?;
        tracing::debug!(program = %config.transport.program, "configuration loaded");

        Ok(Self {
            output: OutputContext::new(flags.no_color, flags.quiet),
            mode,
            transport: DockerTransport::with_program(config.transport.program.clone()),
            config_store,
            config,
            clock: SystemClock,
            check_only: flags.check,
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Returns the appropriate `Renderer` variant for the current output mode.
    #[must_use]
    pub fn renderer(&self) -> Renderer<'_> {
        match self.mode {
            OutputMode::Human => Renderer::Human(HumanRenderer::new(&self.output)),
            OutputMode::Json => Renderer::Json(JsonRenderer),
        }
    }

    /// Progress reporter for application services.
    #[must_use]
    pub fn reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output, self.is_json())
    }

    /// Service settings from the configuration, with an optional
    /// `--on-probe-error` override.
    #[must_use]
    pub fn settings(&self, on_probe_error: Option<ProbeFailurePolicy>) -> RunSettings {
        let mut settings = RunSettings::from_config(&self.config, self.check_only);
        if let Some(policy) = on_probe_error {
            settings.on_probe_error = policy;
        }
        settings
    }
}
