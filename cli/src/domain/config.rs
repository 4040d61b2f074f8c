//! Domain types and validators for Dockhand configuration.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::guard::ProbeFailurePolicy;

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "transport.program",
    "transport.probe_timeout_secs",
    "transport.exec_timeout_secs",
    "guard.on_probe_error",
];

/// Timeout for probe/read/write/backup steps.
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 30;
/// Timeout for guarded commands.
pub const DEFAULT_EXEC_TIMEOUT_SECS: u64 = 300;

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.dockhand/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct DockhandConfig {
    /// How commands reach the target.
    pub transport: TransportConfig,
    /// Guard behaviour.
    pub guard: GuardConfig,
}

/// Transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TransportConfig {
    /// Executable that provides `exec` (e.g. `docker`, `podman`).
    pub program: String,
    pub probe_timeout_secs: u64,
    pub exec_timeout_secs: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            program: "docker".to_string(),
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
            exec_timeout_secs: DEFAULT_EXEC_TIMEOUT_SECS,
        }
    }
}

impl DockhandConfig {
    /// Check values that deserialize fine but are unusable, such as a zero timeout.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError::InvalidValue`] for the first offending key.
    pub fn validate(&self) -> Result<()> {
        validate_config_value("transport.program", &self.transport.program)?;
        validate_config_value(
            "transport.probe_timeout_secs",
            &self.transport.probe_timeout_secs.to_string(),
        )?;
        validate_config_value(
            "transport.exec_timeout_secs",
            &self.transport.exec_timeout_secs.to_string(),
        )
    }
}

impl TransportConfig {
    #[must_use]
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    #[must_use]
    pub fn exec_timeout(&self) -> Duration {
        Duration::from_secs(self.exec_timeout_secs)
    }
}

/// Guard configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct GuardConfig {
    /// `proceed` (default) or `abort` when the existence probe fails.
    pub on_probe_error: ProbeFailurePolicy,
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    let invalid = |valid: &str| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        valid: valid.to_string(),
    };
    match key {
        "transport.program" if value.trim().is_empty() => {
            Err(invalid("any non-empty executable name").into())
        }
        "transport.probe_timeout_secs" | "transport.exec_timeout_secs"
            if !value.parse::<u64>().is_ok_and(|secs| secs > 0) =>
        {
            Err(invalid("a positive number of seconds").into())
        }
        "guard.on_probe_error" if value.parse::<ProbeFailurePolicy>().is_err() => {
            Err(invalid(&ProbeFailurePolicy::VARIANTS.join(", ")).into())
        }
        _ => Ok(()),
    }
}

/// Apply a validated key/value pair to `config`.
///
/// # Errors
///
/// Returns an error if the key or value fails validation.
pub fn apply_config_value(config: &mut DockhandConfig, key: &str, value: &str) -> Result<()> {
    validate_config_key(key)?;
    validate_config_value(key, value)?;
    match key {
        "transport.program" => config.transport.program = value.to_string(),
        "transport.probe_timeout_secs" => config.transport.probe_timeout_secs = value.parse()?,
        "transport.exec_timeout_secs" => config.transport.exec_timeout_secs = value.parse()?,
        "guard.on_probe_error" => {
            config.guard.on_probe_error = value.parse().map_err(anyhow::Error::msg)?;
        }
        _ => anyhow::bail!("Unknown setting: {key}"),
    }
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
