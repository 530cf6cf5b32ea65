//! Metadata store
//!
//! This module provides the deployment-metadata abstractions:
//! - DeploymentStore: durable record persistence (async trait)
//! - DeploymentCatalog: the in-memory mapping consulted during a run
//!
//! Note: Implementations are in the chainsmith-stores crate

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::DeploymentRecord;

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("deployment record not found: {0}")]
    NotFound(String),

    /// A persisted record is unreadable. Fatal for the whole run: address
    /// resolution cannot be trusted if any record failed to load.
    #[error("corrupt deployment record at {path}: {reason}")]
    Corrupt { path: String, reason: String },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(String),
}

/// DeploymentStore trait - durable backing for deployment records.
#[async_trait]
pub trait DeploymentStore: Send + Sync {
    /// Read every persisted record for a network, indexed by contract name.
    ///
    /// Any record that cannot be parsed is a [`StoreError::Corrupt`]; the
    /// caller aborts rather than silently dropping a contract.
    async fn load_all(
        &self,
        network_name: &str,
    ) -> Result<BTreeMap<String, DeploymentRecord>, StoreError>;

    /// Write or overwrite the record for `record.contract_name`.
    ///
    /// Must be atomic enough that a crash mid-write never leaves a
    /// half-written file that parses as valid.
    async fn persist(&self, record: &DeploymentRecord) -> Result<(), StoreError>;
}

/// The in-memory deployment mapping for one run.
///
/// Constructed from persisted state at run start, mutated only by the
/// execution engine between actions, and read by the reference resolver.
/// Execution is strictly sequential, so the single-writer invariant holds
/// by construction and no locking is needed.
pub struct DeploymentCatalog {
    records: BTreeMap<String, DeploymentRecord>,
    backend: Arc<dyn DeploymentStore>,
}

impl DeploymentCatalog {
    /// Load the catalog for a network from its backing store.
    pub async fn load(
        backend: Arc<dyn DeploymentStore>,
        network_name: &str,
    ) -> Result<Self, StoreError> {
        let records = backend.load_all(network_name).await?;
        tracing::debug!(
            network = network_name,
            records = records.len(),
            "deployment catalog loaded"
        );
        Ok(Self { records, backend })
    }

    /// Get the record for a contract, if one exists.
    pub fn get(&self, contract_name: &str) -> Option<&DeploymentRecord> {
        self.records.get(contract_name)
    }

    /// All records, ordered by contract name.
    pub fn records(&self) -> &BTreeMap<String, DeploymentRecord> {
        &self.records
    }

    /// Persist a record and make it visible to same-run lookups.
    ///
    /// The write hits durable storage first; the in-memory mapping is only
    /// updated once persistence succeeded, so a lookup never returns an
    /// address that would vanish on reload.
    pub async fn insert(&mut self, record: DeploymentRecord) -> Result<(), StoreError> {
        self.backend.persist(&record).await?;
        self.records.insert(record.contract_name.clone(), record);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl std::fmt::Debug for DeploymentCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeploymentCatalog")
            .field("records", &self.records.len())
            .finish_non_exhaustive()
    }
}
