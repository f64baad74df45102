//! Engine configuration for the command line.
//!
//! The environment is read first; a JSON file, when given, is merged over it
//! key by key so it only needs the fields it changes.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use sim_physics::prelude::EngineConfig;

/// Build the engine configuration from the environment and an optional file.
pub fn load(path: Option<&Path>, force_enable: bool) -> Result<EngineConfig> {
    let mut config = EngineConfig::from_env().context("invalid physics environment")?;

    if let Some(path) = path {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let overlay: Value = serde_json::from_str(&text)
            .with_context(|| format!("{} is not valid JSON", path.display()))?;
        config = overlay_config(&config, overlay)?;
    }

    if force_enable {
        config.enabled = true;
    }

    config.validate().context("invalid engine configuration")?;
    Ok(config)
}

/// Merge a JSON document over `base`.
pub fn overlay_config(base: &EngineConfig, overlay: Value) -> Result<EngineConfig> {
    let mut merged = serde_json::to_value(base)?;
    merge(&mut merged, overlay);
    serde_json::from_value(merged).context("config file does not describe an engine config")
}

/// Recursively merge `overlay` into `target`. Objects merge per key; any
/// other value replaces what was there.
fn merge(target: &mut Value, overlay: Value) {
    match (target, overlay) {
        (Value::Object(target), Value::Object(overlay)) => {
            for (key, value) in overlay {
                merge(target.entry(key).or_insert(Value::Null), value);
            }
        }
        (target, overlay) => *target = overlay,
    }
}
