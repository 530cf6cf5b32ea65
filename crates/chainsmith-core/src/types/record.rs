//! Durable per-contract deployment metadata.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One durable record per successfully deployed contract.
///
/// Created the moment a deployment transaction is confirmed and never
/// mutated afterward; re-deploying the same contract name overwrites the
/// record (there is no versioning). Persisted field names follow the
/// on-disk JSON layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    /// Unique key.
    pub contract_name: String,
    /// Source file the contract was compiled from.
    pub source_path: String,
    /// Resolved constructor arguments the contract was deployed with.
    pub constructor_args: Vec<Value>,
    /// Constructor argument names (display only).
    #[serde(default)]
    pub arg_names: Vec<String>,
    /// Constructor argument types (display only).
    #[serde(default)]
    pub arg_types: Vec<String>,
    /// Resolved library addresses linked at deployment.
    #[serde(default)]
    pub libraries: BTreeMap<String, String>,
    /// Compiled interface definition (ABI).
    pub interface_definition: Value,
    /// ISO-8601 creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Canonical network name the contract was deployed to.
    pub network_name: String,
    /// Deployment transaction hash; empty when the client reported none.
    #[serde(default)]
    pub transaction_hash: String,
    /// Deployed contract address.
    pub address: String,
}

impl DeploymentRecord {
    /// Fully-qualified name of the recorded contract.
    pub fn qualified_name(&self) -> String {
        format!("{}:{}", self.source_path, self.contract_name)
    }
}
