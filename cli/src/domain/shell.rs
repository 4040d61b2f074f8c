//! Shell quoting and remote script construction.
//!
//! Every value interpolated into a remote script goes through [`quote`].
//! Pure functions only — scripts are built here and executed by the
//! `Transport` port.

use std::borrow::Cow;

use crate::domain::error::ValidationError;

/// Heredoc delimiter used by [`write_script`].
pub const HEREDOC_TERMINATOR: &str = "EOF";

const PROBE_EXISTS: &str = "exists";
const PROBE_MISSING: &str = "missing";

/// Result of an existence probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathState {
    Exists,
    Missing,
}

/// Quote a single value for inclusion in a POSIX shell command.
///
/// # Errors
///
/// Returns [`ValidationError::Unquotable`] if the value contains a NUL byte.
pub fn quote(value: &str) -> Result<String, ValidationError> {
    shlex::try_quote(value)
        .map(Cow::into_owned)
        .map_err(|_| ValidationError::Unquotable(value.to_string()))
}

/// Quote each element of `argv` and join them with spaces.
///
/// # Errors
///
/// Returns [`ValidationError::Unquotable`] if any element contains a NUL byte.
pub fn join_argv(argv: &[String]) -> Result<String, ValidationError> {
    let quoted = argv
        .iter()
        .map(|arg| quote(arg))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(quoted.join(" "))
}

/// `test -e <path> && echo exists || echo missing`
///
/// # Errors
///
/// Returns an error if `path` cannot be quoted.
pub fn probe_script(path: &str) -> Result<String, ValidationError> {
    Ok(format!(
        "test -e {} && echo {PROBE_EXISTS} || echo {PROBE_MISSING}",
        quote(path)?
    ))
}

/// Interpret the stdout of a [`probe_script`] run.
///
/// Returns `None` when the output is neither marker.
#[must_use]
pub fn parse_probe_output(stdout: &str) -> Option<PathState> {
    match stdout.trim() {
        PROBE_EXISTS => Some(PathState::Exists),
        PROBE_MISSING => Some(PathState::Missing),
        _ => None,
    }
}

/// `cat <path> 2>/dev/null || true`
///
/// # Errors
///
/// Returns an error if `path` cannot be quoted.
pub fn read_script(path: &str) -> Result<String, ValidationError> {
    Ok(format!("cat {} 2>/dev/null || true", quote(path)?))
}

/// Whole-file overwrite through a quoted heredoc.
///
/// Non-empty content is newline-terminated first, since a heredoc cannot
/// express a missing final newline.
///
/// # Errors
///
/// Returns an error if `path` cannot be quoted or if `content` contains a
/// line equal to [`HEREDOC_TERMINATOR`].
pub fn write_script(path: &str, content: &str) -> Result<String, ValidationError> {
    if content.split('\n').any(|line| line == HEREDOC_TERMINATOR) {
        return Err(ValidationError::TerminatorInContent {
            path: path.to_string(),
            terminator: HEREDOC_TERMINATOR.to_string(),
        });
    }
    let body = if content.is_empty() || content.ends_with('\n') {
        Cow::Borrowed(content)
    } else {
        Cow::Owned(format!("{content}\n"))
    };
    Ok(format!(
        "cat > {} << '{HEREDOC_TERMINATOR}'\n{body}{HEREDOC_TERMINATOR}",
        quote(path)?
    ))
}

/// `cp -p <src> <dst>`
///
/// # Errors
///
/// Returns an error if either path cannot be quoted.
pub fn copy_script(src: &str, dst: &str) -> Result<String, ValidationError> {
    Ok(format!("cp -p {} {}", quote(src)?, quote(dst)?))
}

/// Prefix `command` with `cd <dir> &&`.
///
/// # Errors
///
/// Returns an error if `dir` cannot be quoted.
pub fn in_directory(dir: &str, command: &str) -> Result<String, ValidationError> {
    Ok(format!("cd {} && {command}", quote(dir)?))
}
