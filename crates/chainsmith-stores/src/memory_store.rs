//! DeploymentStore in-memory implementation.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use chainsmith_core::store::{DeploymentStore, StoreError};
use chainsmith_core::types::DeploymentRecord;

/// In-memory implementation for development and testing.
///
/// Records are keyed by network, then contract name, matching the
/// file-backed layout.
#[derive(Default)]
pub struct InMemoryDeploymentStore {
    records: RwLock<BTreeMap<String, BTreeMap<String, DeploymentRecord>>>,
}

impl InMemoryDeploymentStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing records, e.g. for test setup.
    pub fn with_records(records: Vec<DeploymentRecord>) -> Self {
        let mut map: BTreeMap<String, BTreeMap<String, DeploymentRecord>> = BTreeMap::new();
        for record in records {
            map.entry(record.network_name.clone())
                .or_default()
                .insert(record.contract_name.clone(), record);
        }
        Self {
            records: RwLock::new(map),
        }
    }
}

#[async_trait]
impl DeploymentStore for InMemoryDeploymentStore {
    async fn load_all(
        &self,
        network_name: &str,
    ) -> Result<BTreeMap<String, DeploymentRecord>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|e| StoreError::Io(e.to_string()))?;
        Ok(records.get(network_name).cloned().unwrap_or_default())
    }

    async fn persist(&self, record: &DeploymentRecord) -> Result<(), StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|e| StoreError::Io(e.to_string()))?;
        records
            .entry(record.network_name.clone())
            .or_default()
            .insert(record.contract_name.clone(), record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::Value;

    fn record(contract_name: &str, network_name: &str) -> DeploymentRecord {
        DeploymentRecord {
            contract_name: contract_name.to_string(),
            source_path: format!("contracts/{contract_name}.sol"),
            constructor_args: Vec::new(),
            arg_names: Vec::new(),
            arg_types: Vec::new(),
            libraries: BTreeMap::new(),
            interface_definition: Value::Null,
            created_at: Utc::now(),
            network_name: network_name.to_string(),
            transaction_hash: String::new(),
            address: "0xA".to_string(),
        }
    }

    #[test]
    fn test_persist_and_load_per_network() {
        tokio_test::block_on(async {
            let store = InMemoryDeploymentStore::new();
            store.persist(&record("Token", "localhost")).await.unwrap();
            store.persist(&record("Vault", "sepolia")).await.unwrap();

            let local = store.load_all("localhost").await.unwrap();
            assert_eq!(local.len(), 1);
            assert!(local.contains_key("Token"));
            assert!(store.load_all("mainnet").await.unwrap().is_empty());
        });
    }

    #[test]
    fn test_seeded_records_are_visible() {
        tokio_test::block_on(async {
            let store = InMemoryDeploymentStore::with_records(vec![
                record("Token", "localhost"),
                record("Vault", "localhost"),
            ]);
            assert_eq!(store.load_all("localhost").await.unwrap().len(), 2);
        });
    }
}
