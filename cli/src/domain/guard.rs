//! `creates` / `removes` preconditions that let an action be skipped.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::ValidationError;
use crate::domain::shell::PathState;

/// Guard polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardKind {
    /// Skip when the path already exists: the action has already run.
    Creates,
    /// Skip when the path is already absent: the cleanup has already run.
    Removes,
}

/// A single precondition path with its polarity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guard {
    pub kind: GuardKind,
    pub path: String,
}

impl Guard {
    #[must_use]
    pub fn creates(path: impl Into<String>) -> Self {
        Self {
            kind: GuardKind::Creates,
            path: path.into(),
        }
    }

    #[must_use]
    pub fn removes(path: impl Into<String>) -> Self {
        Self {
            kind: GuardKind::Removes,
            path: path.into(),
        }
    }

    /// Build the (optional) guard from the two mutually exclusive options.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ConflictingGuards`] when both are set and
    /// [`ValidationError::EmptyPath`] when the chosen path is empty.
    pub fn from_options(
        creates: Option<String>,
        removes: Option<String>,
    ) -> Result<Option<Self>, ValidationError> {
        let guard = match (creates, removes) {
            (Some(_), Some(_)) => return Err(ValidationError::ConflictingGuards),
            (Some(path), None) => Some(Self::creates(path)),
            (None, Some(path)) => Some(Self::removes(path)),
            (None, None) => None,
        };
        if guard.as_ref().is_some_and(|g| g.path.trim().is_empty()) {
            return Err(ValidationError::EmptyPath);
        }
        Ok(guard)
    }

    /// Map a probe result to a decision.
    #[must_use]
    pub fn decide(&self, state: PathState) -> GuardDecision {
        match (self.kind, state) {
            (GuardKind::Creates, PathState::Exists) => GuardDecision::Skip(format!(
                "Skipped: file {} already exists (creates check)",
                self.path
            )),
            (GuardKind::Removes, PathState::Missing) => GuardDecision::Skip(format!(
                "Skipped: file {} does not exist (removes check)",
                self.path
            )),
            _ => GuardDecision::Proceed,
        }
    }
}

impl fmt::Display for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            GuardKind::Creates => write!(f, "creates={}", self.path),
            GuardKind::Removes => write!(f, "removes={}", self.path),
        }
    }
}

/// Outcome of evaluating a guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    Skip(String),
}

impl GuardDecision {
    #[must_use]
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::Skip(_))
    }

    /// Skip reason, or an empty string when proceeding.
    #[must_use]
    pub fn reason(&self) -> &str {
        match self {
            Self::Proceed => "",
            Self::Skip(reason) => reason,
        }
    }
}

/// What to do when the existence probe itself fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeFailurePolicy {
    /// Fail open: run the action and emit a warning.
    #[default]
    Proceed,
    /// Fail closed: report an error and run nothing.
    Abort,
}

impl ProbeFailurePolicy {
    pub const VARIANTS: &'static [&'static str] = &["proceed", "abort"];
}

impl FromStr for ProbeFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "proceed" => Ok(Self::Proceed),
            "abort" => Ok(Self::Abort),
            other => Err(format!(
                "invalid probe failure policy '{other}' (expected one of: {})",
                Self::VARIANTS.join(", ")
            )),
        }
    }
}

impl fmt::Display for ProbeFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Proceed => "proceed",
            Self::Abort => "abort",
        })
    }
}
