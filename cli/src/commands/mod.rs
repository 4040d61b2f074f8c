//! Command implementations

pub mod config;
pub mod exec;
pub mod guard;
pub mod line;
pub mod version;
