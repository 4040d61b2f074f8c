//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Validation errors ─────────────────────────────────────────────────────────

/// Rejected before any remote call is made.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("line is required when state=present")]
    MissingLine,

    #[error("line or regexp is required when state=absent")]
    MissingLineOrPattern,

    #[error("Invalid regexp '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("creates and removes are mutually exclusive")]
    ConflictingGuards,

    #[error("target must not be empty")]
    EmptyTarget,

    #[error("path must not be empty")]
    EmptyPath,

    #[error("command must not be empty")]
    EmptyCommand,

    #[error("File {0} does not exist and create=false")]
    FileMissing(String),

    #[error("Content for {path} contains a line equal to the heredoc terminator '{terminator}'")]
    TerminatorInContent { path: String, terminator: String },

    #[error("Value cannot be shell-quoted (contains a NUL byte): {0:?}")]
    Unquotable(String),

    #[error("Invalid environment entry '{0}': expected KEY=VALUE")]
    InvalidEnv(String),

    #[error("Invalid timeout '{0}': expected a positive number of seconds")]
    InvalidTimeout(String),
}

// ── Transport errors ──────────────────────────────────────────────────────────

/// A remote step exited nonzero, timed out, or could not be spawned.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{step} failed on {target} (exit {code}): {stderr}")]
    StepFailed {
        step: &'static str,
        target: String,
        code: i32,
        stderr: String,
    },
}

impl TransportError {
    /// Exit code reported by the failed step.
    #[must_use]
    pub fn code(&self) -> i32 {
        match self {
            Self::StepFailed { code, .. } => *code,
        }
    }
}

// ── Protocol errors ───────────────────────────────────────────────────────────

/// The remote side answered, but not in the shape we expected.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Unexpected existence probe output for {path}: {stdout:?}")]
    UnexpectedProbeOutput { path: String, stdout: String },

    #[error("{path} is not valid UTF-8 text; refusing to rewrite it")]
    NonUtf8Content { path: String },

    #[error("Read-back of {path} does not match the content that was written")]
    VerificationMismatch { path: String },
}

// ── Exec errors ───────────────────────────────────────────────────────────────

/// The guarded command ran and exited nonzero.
#[derive(Debug, Error)]
#[error("Command failed with return code {rc}")]
pub struct ExecError {
    pub rc: i32,
    pub stdout: String,
    pub stderr: String,
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\nValid values: {valid}")]
    InvalidValue {
        key: String,
        value: String,
        valid: String,
    },
}
