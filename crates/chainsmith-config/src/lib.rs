//! # Chainsmith Config
//!
//! Network action-list configuration: per network name, three ordered
//! lists (deploy, initialize, verify). This is the sole configuration
//! input to the engine; CLI flags and environment toggles live elsewhere.

mod loader;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use chainsmith_core::types::{DeployEntry, InitializeEntry};

pub use loader::{load_config, ConfigError};

/// The ordered action lists for one network.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkActions {
    #[serde(default)]
    pub deploy: Vec<DeployEntry>,
    #[serde(default)]
    pub initialize: Vec<InitializeEntry>,
    /// Contract names to verify, or the single sentinel `ALL`.
    #[serde(default)]
    pub verify: Vec<String>,
}

/// Top-level configuration: action lists keyed by network name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworksConfig {
    pub networks: BTreeMap<String, NetworkActions>,
}

impl NetworksConfig {
    /// Action lists for a network; unknown names are a configuration error.
    pub fn network(&self, name: &str) -> Result<&NetworkActions, ConfigError> {
        self.networks
            .get(name)
            .ok_or_else(|| ConfigError::UnknownNetwork(name.to_string()))
    }
}
