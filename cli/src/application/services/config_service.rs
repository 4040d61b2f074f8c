//! Application service — configuration use-cases.

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::config::{DockhandConfig, apply_config_value};

/// Load configuration.
pub fn load_config(store: &impl ConfigStore) -> Result<DockhandConfig> {
    store.load()
}

/// Validate and persist a single `key = value` setting.
///
/// Returns the updated configuration.
pub fn set_value(store: &impl ConfigStore, key: &str, value: &str) -> Result<DockhandConfig> {
    let mut config = store.load()?;
    apply_config_value(&mut config, key, value)?;
    store.save(&config)?;
    Ok(config)
}
