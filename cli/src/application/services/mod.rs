//! Application services — use-case orchestration.
//!
//! Each service module implements a single use-case by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports` — never from `crate::infra`, `crate::commands`,
//! or `crate::output`.

use std::time::Duration;

use crate::domain::config::DockhandConfig;
use crate::domain::guard::ProbeFailurePolicy;

pub mod config_service;
pub mod guard_evaluator;
pub mod guarded_exec;
pub mod line_editor;

/// Per-invocation settings shared by the services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSettings {
    /// Timeout for probe/read/write/backup steps.
    pub probe_timeout: Duration,
    /// Timeout for guarded commands without their own override.
    pub exec_timeout: Duration,
    pub on_probe_error: ProbeFailurePolicy,
    /// Decide and report, but do not change anything remotely.
    pub check_only: bool,
}

impl RunSettings {
    #[must_use]
    pub fn from_config(config: &DockhandConfig, check_only: bool) -> Self {
        Self {
            probe_timeout: config.transport.probe_timeout(),
            exec_timeout: config.transport.exec_timeout(),
            on_probe_error: config.guard.on_probe_error,
            check_only,
        }
    }
}

impl Default for RunSettings {
    fn default() -> Self {
        Self::from_config(&DockhandConfig::default(), false)
    }
}
