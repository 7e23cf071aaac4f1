use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::overlap::OverlapPolicy;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub availability: AvailabilityConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AvailabilityConfig {
    #[serde(default)]
    pub overlap_policy: OverlapPolicy,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct CatalogConfig {
    /// YAML catalog loaded into the store at startup. Relative paths resolve
    /// against the config file's directory.
    #[serde(default)]
    pub seed_path: Option<PathBuf>,
}
