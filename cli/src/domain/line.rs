//! Line-oriented edit planning.
//!
//! Given the current content of a file (or `None` when it does not exist)
//! and an [`EditRequest`], [`plan_edit`] decides the [`EditOutcome`] and the
//! full replacement content. Pure functions only — reading and writing the
//! remote file is the line editor service's job.

use std::fmt;

use regex::Regex;
use serde::Serialize;

use crate::domain::error::ValidationError;

// ── Types ─────────────────────────────────────────────────────────────────────

/// Whether the line should end up present in or absent from the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EditIntent {
    #[default]
    Present,
    Absent,
}

/// How many regex matches a present-edit rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// Only the first matching line is replaced; later matches are untouched.
    #[default]
    FirstMatch,
    /// Every matching line is replaced.
    AllMatches,
}

/// The line an edit cares about: a literal value and/or a start-anchored regex.
#[derive(Debug, Clone)]
pub struct LineSpec {
    line: Option<String>,
    pattern: Option<(String, Regex)>,
    policy: MatchPolicy,
}

impl LineSpec {
    /// Build a spec from an optional literal and an optional regex source.
    ///
    /// The regex is matched against the start of each line.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPattern`] if `regexp` does not compile.
    pub fn new(line: Option<String>, regexp: Option<&str>) -> Result<Self, ValidationError> {
        let pattern = regexp
            .map(|src| {
                let invalid = |e: regex::Error| ValidationError::InvalidPattern {
                    pattern: src.to_string(),
                    reason: e.to_string(),
                };
                // `src` must be valid on its own: a stray `)` would close the anchor group.
                Regex::new(src).map_err(invalid)?;
                Regex::new(&format!("^(?:{src})"))
                    .map(|re| (src.to_string(), re))
                    .map_err(invalid)
            })
            .transpose()?;
        Ok(Self {
            line,
            pattern,
            policy: MatchPolicy::FirstMatch,
        })
    }

    /// Spec that matches by exact equality only.
    #[must_use]
    pub fn literal(line: impl Into<String>) -> Self {
        Self {
            line: Some(line.into()),
            pattern: None,
            policy: MatchPolicy::FirstMatch,
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn line(&self) -> Option<&str> {
        self.line.as_deref()
    }

    #[must_use]
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_ref().map(|(src, _)| src.as_str())
    }

    #[must_use]
    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// Does `line` (terminator already stripped) match this spec?
    fn matches(&self, line: &str) -> bool {
        match (&self.pattern, &self.line) {
            (Some((_, re)), _) => re.is_match(line),
            (None, Some(literal)) => line == literal,
            (None, None) => false,
        }
    }
}

/// Options that shape how an edit is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditOptions {
    /// Create the file with the line when it does not exist.
    pub create: bool,
    /// Copy the original file aside before changing it.
    pub backup: bool,
    /// Re-read the file after writing and compare.
    pub verify: bool,
}

/// A complete line edit against one file.
#[derive(Debug, Clone)]
pub struct EditRequest {
    pub path: String,
    pub spec: LineSpec,
    pub intent: EditIntent,
    pub options: EditOptions,
}

impl EditRequest {
    /// Check the request before any remote call is made.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for an empty path, a present-edit with no
    /// literal line, or an absent-edit with neither line nor regex.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.path.trim().is_empty() {
            return Err(ValidationError::EmptyPath);
        }
        match self.intent {
            EditIntent::Present if self.spec.line.as_deref().is_none_or(str::is_empty) => {
                Err(ValidationError::MissingLine)
            }
            EditIntent::Absent if self.spec.line.is_none() && self.spec.pattern.is_none() => {
                Err(ValidationError::MissingLineOrPattern)
            }
            _ => Ok(()),
        }
    }
}

/// Classified result of an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EditOutcome {
    Unchanged,
    Created,
    Appended,
    Replaced,
    Removed,
}

impl EditOutcome {
    /// `true` for every outcome except `Unchanged`.
    #[must_use]
    pub fn is_change(self) -> bool {
        self != Self::Unchanged
    }
}

impl fmt::Display for EditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unchanged => "unchanged",
            Self::Created => "created",
            Self::Appended => "appended",
            Self::Replaced => "replaced",
            Self::Removed => "removed",
        };
        f.write_str(s)
    }
}

/// What [`plan_edit`] decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditPlan {
    pub outcome: EditOutcome,
    /// Full replacement content; `None` when nothing is written.
    pub content: Option<String>,
    /// Regex matches left untouched by a first-match replace.
    pub untouched_matches: usize,
    pub message: &'static str,
}

impl EditPlan {
    fn unchanged(message: &'static str) -> Self {
        Self {
            outcome: EditOutcome::Unchanged,
            content: None,
            untouched_matches: 0,
            message,
        }
    }

    fn change(outcome: EditOutcome, content: String, message: &'static str) -> Self {
        Self {
            outcome,
            content: Some(content),
            untouched_matches: 0,
            message,
        }
    }
}

// ── Planning ──────────────────────────────────────────────────────────────────

fn strip_terminator(line: &str) -> &str {
    line.strip_suffix('\n').unwrap_or(line)
}

/// Decide the outcome of `req` against the file's current content.
///
/// `current` is `None` when the file does not exist.
///
/// # Errors
///
/// Returns a [`ValidationError`] if the request is invalid or the file is
/// missing and creation is disallowed.
pub fn plan_edit(req: &EditRequest, current: Option<&str>) -> Result<EditPlan, ValidationError> {
    req.validate()?;

    let Some(content) = current else {
        return match req.intent {
            EditIntent::Present if req.options.create => Ok(EditPlan::change(
                EditOutcome::Created,
                format!("{}\n", req.spec.line().unwrap_or_default()),
                "File created with line",
            )),
            EditIntent::Present => Err(ValidationError::FileMissing(req.path.clone())),
            EditIntent::Absent => Ok(EditPlan::unchanged("File does not exist")),
        };
    };

    let lines: Vec<&str> = content.split_inclusive('\n').collect();
    let matched: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| req.spec.matches(strip_terminator(l)))
        .map(|(i, _)| i)
        .collect();

    match req.intent {
        EditIntent::Present => Ok(plan_present(&req.spec, content, &lines, &matched)),
        EditIntent::Absent => Ok(plan_absent(&lines, &matched)),
    }
}

fn plan_present(spec: &LineSpec, content: &str, lines: &[&str], matched: &[usize]) -> EditPlan {
    let line = spec.line().unwrap_or_default();

    if spec.pattern.is_none() {
        return if matched.is_empty() {
            append(content, line)
        } else {
            EditPlan::unchanged("Line already present")
        };
    }

    let Some(&first) = matched.first() else {
        // The regex found nothing, but the exact line may already be there.
        return if lines.iter().any(|l| strip_terminator(l) == line) {
            EditPlan::unchanged("Line already present")
        } else {
            append(content, line)
        };
    };

    let targets: Vec<usize> = match spec.policy {
        MatchPolicy::FirstMatch => vec![first],
        MatchPolicy::AllMatches => matched.to_vec(),
    }
    .into_iter()
    .filter(|&i| strip_terminator(lines[i]) != line)
    .collect();

    let untouched_matches = match spec.policy {
        MatchPolicy::FirstMatch => matched.len() - 1,
        MatchPolicy::AllMatches => 0,
    };

    if targets.is_empty() {
        return EditPlan {
            untouched_matches,
            ..EditPlan::unchanged("Line already present")
        };
    }

    let replacement = format!("{line}\n");
    let new_content: String = lines
        .iter()
        .enumerate()
        .map(|(i, l)| {
            if targets.contains(&i) {
                replacement.as_str()
            } else {
                *l
            }
        })
        .collect();

    EditPlan {
        untouched_matches,
        ..EditPlan::change(
            EditOutcome::Replaced,
            new_content,
            "Line replaced (regexp matched)",
        )
    }
}

fn append(content: &str, line: &str) -> EditPlan {
    let mut new_content = content.to_string();
    if !new_content.is_empty() && !new_content.ends_with('\n') {
        new_content.push('\n');
    }
    new_content.push_str(line);
    new_content.push('\n');
    EditPlan::change(EditOutcome::Appended, new_content, "Line added to file")
}

/// Absent-edits drop every matching line, not just the first.
fn plan_absent(lines: &[&str], matched: &[usize]) -> EditPlan {
    if matched.is_empty() {
        return EditPlan::unchanged("Line already absent");
    }
    let kept: String = lines
        .iter()
        .enumerate()
        .filter(|(i, _)| !matched.contains(i))
        .map(|(_, l)| *l)
        .collect();
    EditPlan::change(EditOutcome::Removed, kept, "Line removed from file")
}

// ── Unit tests ───────────────────────────────────────────────────────────────
