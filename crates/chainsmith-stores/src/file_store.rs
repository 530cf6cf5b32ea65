//! File-backed DeploymentStore implementation.
//!
//! Layout: `<root>/<network>/<ContractName>.json`, one file per record.
//! Writes go to `<ContractName>.json.tmp` first and are renamed into
//! place, so a crash mid-write never leaves a half-written file that
//! parses as a valid record. Leftover `.tmp` files are ignored on load.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use chainsmith_core::store::{DeploymentStore, StoreError};
use chainsmith_core::types::DeploymentRecord;

const RECORD_EXTENSION: &str = "json";

/// One JSON file per deployment record under a per-network directory.
pub struct FileDeploymentStore {
    root: PathBuf,
}

impl FileDeploymentStore {
    /// Create a store rooted at `root`. Directories are created lazily on
    /// first persist.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn network_dir(&self, network_name: &str) -> PathBuf {
        self.root.join(network_name)
    }

    fn record_path(&self, network_name: &str, contract_name: &str) -> PathBuf {
        self.network_dir(network_name)
            .join(format!("{contract_name}.{RECORD_EXTENSION}"))
    }
}

fn io_err(err: std::io::Error) -> StoreError {
    StoreError::Io(err.to_string())
}

fn is_record_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(RECORD_EXTENSION)
}

#[async_trait]
impl DeploymentStore for FileDeploymentStore {
    async fn load_all(
        &self,
        network_name: &str,
    ) -> Result<BTreeMap<String, DeploymentRecord>, StoreError> {
        let dir = self.network_dir(network_name);
        let mut records = BTreeMap::new();

        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            // Nothing deployed on this network yet.
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(records),
            Err(err) => return Err(io_err(err)),
        };

        while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
            let path = entry.path();
            if !is_record_file(&path) {
                continue;
            }
            let data = tokio::fs::read_to_string(&path).await.map_err(io_err)?;
            let record: DeploymentRecord =
                serde_json::from_str(&data).map_err(|err| StoreError::Corrupt {
                    path: path.display().to_string(),
                    reason: err.to_string(),
                })?;
            records.insert(record.contract_name.clone(), record);
        }

        tracing::debug!(
            network = network_name,
            records = records.len(),
            dir = %dir.display(),
            "loaded deployment records"
        );
        Ok(records)
    }

    async fn persist(&self, record: &DeploymentRecord) -> Result<(), StoreError> {
        let dir = self.network_dir(&record.network_name);
        tokio::fs::create_dir_all(&dir).await.map_err(io_err)?;

        let data = serde_json::to_vec_pretty(record)
            .map_err(|err| StoreError::Serialization(err.to_string()))?;

        // Write-then-rename: the final path only ever holds complete files.
        let path = self.record_path(&record.network_name, &record.contract_name);
        let tmp_path = path.with_extension(format!("{RECORD_EXTENSION}.tmp"));
        tokio::fs::write(&tmp_path, &data).await.map_err(io_err)?;
        tokio::fs::rename(&tmp_path, &path).await.map_err(io_err)?;

        tracing::debug!(
            contract = record.contract_name,
            path = %path.display(),
            "deployment record persisted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::{json, Value};

    fn record(contract_name: &str, network_name: &str) -> DeploymentRecord {
        DeploymentRecord {
            contract_name: contract_name.to_string(),
            source_path: format!("contracts/{contract_name}.sol"),
            constructor_args: vec![json!("0xB"), json!(18)],
            arg_names: vec!["owner".to_string(), "decimals".to_string()],
            arg_types: vec!["address".to_string(), "uint8".to_string()],
            libraries: BTreeMap::new(),
            interface_definition: json!([{ "type": "constructor" }]),
            created_at: Utc::now(),
            network_name: network_name.to_string(),
            transaction_hash: "0xT".to_string(),
            address: "0xA".to_string(),
        }
    }

    #[test]
    fn test_round_trip_persistence() {
        tokio_test::block_on(async {
            let dir = tempfile::tempdir().unwrap();
            let store = FileDeploymentStore::new(dir.path());
            let saved = record("Token", "localhost");

            store.persist(&saved).await.unwrap();
            let loaded = store.load_all("localhost").await.unwrap();

            assert_eq!(loaded.len(), 1);
            assert_eq!(loaded.get("Token"), Some(&saved));
        });
    }

    #[test]
    fn test_networks_are_isolated() {
        tokio_test::block_on(async {
            let dir = tempfile::tempdir().unwrap();
            let store = FileDeploymentStore::new(dir.path());
            store.persist(&record("Token", "localhost")).await.unwrap();
            store.persist(&record("Token", "sepolia")).await.unwrap();

            assert_eq!(store.load_all("localhost").await.unwrap().len(), 1);
            assert_eq!(store.load_all("sepolia").await.unwrap().len(), 1);
            assert!(store.load_all("mainnet").await.unwrap().is_empty());
        });
    }

    #[test]
    fn test_overwrite_replaces_record() {
        tokio_test::block_on(async {
            let dir = tempfile::tempdir().unwrap();
            let store = FileDeploymentStore::new(dir.path());
            store.persist(&record("Token", "localhost")).await.unwrap();

            let mut updated = record("Token", "localhost");
            updated.address = "0xNEW".to_string();
            store.persist(&updated).await.unwrap();

            let loaded = store.load_all("localhost").await.unwrap();
            assert_eq!(loaded.get("Token").unwrap().address, "0xNEW");
        });
    }

    #[test]
    fn test_corrupt_record_fails_the_load() {
        tokio_test::block_on(async {
            let dir = tempfile::tempdir().unwrap();
            let store = FileDeploymentStore::new(dir.path());
            store.persist(&record("Token", "localhost")).await.unwrap();

            let bad = dir.path().join("localhost").join("Broken.json");
            tokio::fs::write(&bad, "{ not json").await.unwrap();

            let err = store.load_all("localhost").await.unwrap_err();
            match err {
                StoreError::Corrupt { path, .. } => assert!(path.contains("Broken.json")),
                other => panic!("expected Corrupt, got {other:?}"),
            }
        });
    }

    #[test]
    fn test_leftover_tmp_file_is_ignored() {
        tokio_test::block_on(async {
            let dir = tempfile::tempdir().unwrap();
            let store = FileDeploymentStore::new(dir.path());
            store.persist(&record("Token", "localhost")).await.unwrap();

            // Simulates a crash between write and rename.
            let tmp = dir.path().join("localhost").join("Half.json.tmp");
            tokio::fs::write(&tmp, "{ \"contractName\": ").await.unwrap();

            let loaded = store.load_all("localhost").await.unwrap();
            assert_eq!(loaded.len(), 1);
            assert!(loaded.contains_key("Token"));
        });
    }

    #[test]
    fn test_timestamp_survives_round_trip() {
        tokio_test::block_on(async {
            let dir = tempfile::tempdir().unwrap();
            let store = FileDeploymentStore::new(dir.path());
            let saved = record("Token", "localhost");
            store.persist(&saved).await.unwrap();

            let loaded = store.load_all("localhost").await.unwrap();
            assert_eq!(loaded.get("Token").unwrap().created_at, saved.created_at);
        });
    }

    #[test]
    fn test_interface_definition_round_trips_as_value() {
        tokio_test::block_on(async {
            let dir = tempfile::tempdir().unwrap();
            let store = FileDeploymentStore::new(dir.path());
            let mut saved = record("Token", "localhost");
            saved.interface_definition = Value::Null;
            store.persist(&saved).await.unwrap();

            let loaded = store.load_all("localhost").await.unwrap();
            assert_eq!(
                loaded.get("Token").unwrap().interface_definition,
                Value::Null
            );
        });
    }
}
