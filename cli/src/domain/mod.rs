//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod backup;
pub mod config;
pub mod error;
pub mod exec;
pub mod guard;
pub mod line;
pub mod shell;

pub use config::{DockhandConfig, validate_config_key, validate_config_value};
pub use error::{ConfigError, ExecError, ProtocolError, TransportError, ValidationError};
pub use exec::{ExecCommand, ExecRequest};
pub use guard::{Guard, GuardDecision, GuardKind, ProbeFailurePolicy};
pub use line::{EditIntent, EditOptions, EditOutcome, EditRequest, LineSpec, MatchPolicy};
pub use shell::PathState;
