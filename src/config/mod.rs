pub mod types;

use std::path::{Path, PathBuf};

use crate::error::{BookingError, Result};
use types::Config;

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        tracing::info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        BookingError::Config(format!(
            "failed to read config file {}: {e}",
            path.display()
        ))
    })?;
    if content.trim().is_empty() {
        return Ok(Config::default());
    }
    let mut config: Config = serde_yml::from_str(&content)?;
    if let Some(seed) = config.catalog.seed_path.take() {
        config.catalog.seed_path = Some(resolve_relative(path, seed));
    }
    Ok(config)
}

fn resolve_relative(config_path: &Path, target: PathBuf) -> PathBuf {
    if target.is_absolute() {
        return target;
    }
    config_path
        .parent()
        .map_or_else(|| target.clone(), |dir| dir.join(&target))
}
