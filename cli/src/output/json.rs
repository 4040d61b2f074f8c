//! JSON output helpers.
//!
//! `JsonRenderer` prints outcome reports as pretty JSON on stdout; the error
//! object is used by every `--json` code path when a command fails.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::domain::config::DockhandConfig;
use crate::domain::error::{ConfigError, ExecError, ProtocolError, TransportError, ValidationError};

/// Renders reports as JSON on stdout.
pub struct JsonRenderer;

impl JsonRenderer {
    /// Print any serializable report.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render<T: Serialize>(&self, value: &T) -> Result<()> {
        println!(
            "{}",
            serde_json::to_string_pretty(value).context("JSON serialization failed")?
        );
        Ok(())
    }

    /// Print the configuration together with its location.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_config(&self, config: &DockhandConfig, path: &Path) -> Result<()> {
        self.render(&serde_json::json!({
            "path": path.display().to_string(),
            "config": config,
        }))
    }

    /// Print the error object extended with the remote result.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_exec_failure(&self, err: &ExecError) -> Result<()> {
        self.render(&serde_json::json!({
            "error": true,
            "message": err.to_string(),
            "code": "exec",
            "rc": err.rc,
            "stdout": err.stdout,
            "stderr": err.stderr,
        }))
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_version(&self, version: &str) -> Result<()> {
        self.render(&serde_json::json!({ "version": version }))
    }
}

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails (should not happen in
/// practice, `serde_json` only fails on non-finite floats and maps with
/// non-string keys, neither of which appear here).
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Machine-readable error class for the JSON error object.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    if err.downcast_ref::<ValidationError>().is_some() {
        "validation"
    } else if err.downcast_ref::<TransportError>().is_some() {
        "transport"
    } else if err.downcast_ref::<ProtocolError>().is_some() {
        "protocol"
    } else if err.downcast_ref::<ExecError>().is_some() {
        "exec"
    } else if err.downcast_ref::<ConfigError>().is_some() {
        "config"
    } else {
        "error"
    }
}
