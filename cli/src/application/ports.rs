//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::PathBuf;
use std::process::Output;
use std::time::Duration;

use anyhow::Result;
use chrono::NaiveDateTime;

use crate::domain::config::DockhandConfig;

// ── Constants ─────────────────────────────────────────────────────────────────

/// Exit code reported when a remote command exceeds its timeout.
pub const TIMEOUT_EXIT_CODE: i32 = 124;

/// Exit code reported when the transport process could not be spawned.
pub const SPAWN_FAILURE_EXIT_CODE: i32 = 127;

// ── Value Types ───────────────────────────────────────────────────────────────

/// Captured result of one remote command.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecOutput {
    pub code: i32,
    /// Raw bytes; file contents are not assumed to be UTF-8.
    pub stdout: Vec<u8>,
    pub stderr: String,
}

impl ExecOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.code == 0
    }

    #[must_use]
    pub fn timed_out(&self) -> bool {
        self.code == TIMEOUT_EXIT_CODE
    }

    /// Stdout as text, with invalid UTF-8 replaced.
    #[must_use]
    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }
}

/// Per-call knobs for [`Transport::exec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOptions {
    /// Hard upper bound; the call never blocks longer.
    pub timeout: Duration,
    /// Run as this user inside the target.
    pub user: Option<String>,
    /// Extra environment variables.
    pub env: Vec<(String, String)>,
    /// Text piped to the command's stdin.
    pub stdin: Option<String>,
}

impl ExecOptions {
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            user: None,
            env: Vec::new(),
            stdin: None,
        }
    }
}

// ── Transport Port ────────────────────────────────────────────────────────────

/// Runs one shell script inside a named target.
///
/// Implementations never fail: spawn failures and timeouts are reported
/// through [`ExecOutput::code`] ([`SPAWN_FAILURE_EXIT_CODE`],
/// [`TIMEOUT_EXIT_CODE`]) with the reason in `stderr`.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Execute `script` with `sh -c` inside `target`.
    async fn exec(&self, target: &str, script: &str, opts: &ExecOptions) -> ExecOutput;
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output, bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
    /// Run a program with stdin piped from `input`, bounded by `timeout`.
    async fn run_with_stdin(
        &self,
        program: &str,
        args: &[&str],
        input: &[u8],
        timeout: Duration,
    ) -> Result<Output>;
}

// ── Clock Port ────────────────────────────────────────────────────────────────

/// Source of the invocation's local time (backup timestamps).
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts configuration persistence.
pub trait ConfigStore {
    /// Load the configuration, falling back to defaults when no file exists.
    fn load(&self) -> Result<DockhandConfig>;
    /// Persist the configuration.
    fn save(&self, config: &DockhandConfig) -> Result<()>;
    /// Location of the configuration file.
    fn path(&self) -> Result<PathBuf>;
}
