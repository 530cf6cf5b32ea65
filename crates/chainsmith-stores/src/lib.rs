//! # Chainsmith Stores
//!
//! Deployment-store implementations for the chainsmith engine.
//!
//! This crate provides:
//! - File-backed DeploymentStore (one JSON file per contract)
//! - InMemory DeploymentStore for development and testing

mod file_store;
mod memory_store;

pub use file_store::FileDeploymentStore;
pub use memory_store::InMemoryDeploymentStore;

// Re-export core traits for convenience
pub use chainsmith_core::store::{DeploymentCatalog, DeploymentStore, StoreError};
pub use chainsmith_core::types::DeploymentRecord;
