//! Arbitrary command requests for guarded execution.

use std::time::Duration;

use crate::domain::error::ValidationError;
use crate::domain::shell::{in_directory, join_argv};

/// The command to run inside the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecCommand {
    /// Passed to `sh -c` verbatim.
    Shell(String),
    /// Each element is quoted; the result is joined with spaces.
    Argv(Vec<String>),
}

impl ExecCommand {
    /// A single word is a raw shell string; several words are an argv.
    #[must_use]
    pub fn from_words(mut words: Vec<String>) -> Self {
        if words.len() == 1 {
            Self::Shell(words.remove(0))
        } else {
            Self::Argv(words)
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            Self::Shell(s) => s.trim().is_empty(),
            Self::Argv(argv) => argv.is_empty(),
        }
    }
}

/// Everything needed to run one command in a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecRequest {
    pub command: ExecCommand,
    pub chdir: Option<String>,
    pub user: Option<String>,
    pub env: Vec<(String, String)>,
    pub stdin: Option<String>,
    /// Overrides the configured exec timeout.
    pub timeout: Option<Duration>,
}

impl ExecRequest {
    #[must_use]
    pub fn new(command: ExecCommand) -> Self {
        Self {
            command,
            chdir: None,
            user: None,
            env: Vec::new(),
            stdin: None,
            timeout: None,
        }
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyCommand`] for an empty command.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.command.is_empty() {
            return Err(ValidationError::EmptyCommand);
        }
        Ok(())
    }

    /// Assemble the script handed to `sh -c`.
    ///
    /// # Errors
    ///
    /// Returns an error if the command is empty or a value cannot be quoted.
    pub fn script(&self) -> Result<String, ValidationError> {
        self.validate()?;
        let command = match &self.command {
            ExecCommand::Shell(s) => s.clone(),
            ExecCommand::Argv(argv) => join_argv(argv)?,
        };
        match self.chdir.as_deref() {
            Some(dir) => in_directory(dir, &command),
            None => Ok(command),
        }
    }
}

/// Parse a `KEY=VALUE` environment entry.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidEnv`] when there is no `=` or the key is empty.
pub fn parse_env(entry: &str) -> Result<(String, String), ValidationError> {
    match entry.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(ValidationError::InvalidEnv(entry.to_string())),
    }
}

/// Parse a timeout given in whole seconds; zero is rejected.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidTimeout`] unless `value` is a positive integer.
pub fn parse_timeout(value: &str) -> Result<Duration, ValidationError> {
    value
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .ok_or_else(|| ValidationError::InvalidTimeout(value.to_string()))
}
