//! Chain-client abstraction
//!
//! The engine never talks to a blockchain directly; everything network- or
//! compiler-shaped goes through the [`ChainClient`] trait:
//! - Network identity and signer listing
//! - Compiled interface (ABI) lookup
//! - Deploying, calling and verifying contracts
//!
//! Implementations live outside this crate (a JSON-RPC client in
//! production, scripted mocks in tests).

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Chain-client error types
#[derive(Debug, Clone, Error)]
pub enum ChainError {
    #[error("network error: {0}")]
    Network(String),

    #[error("transaction reverted: {0}")]
    Reverted(String),

    #[error("no compiled artifact for contract '{0}'")]
    MissingArtifact(String),

    #[error("verification rejected: {0}")]
    VerificationRejected(String),

    #[error("{0}")]
    Other(String),
}

/// Identity of the network the client is connected to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkIdentity {
    pub name: String,
}

impl NetworkIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Canonical network name used for record keeping. The local
    /// development network reports itself as "hardhat" but its deployments
    /// are stored under "localhost".
    pub fn canonical_name(&self) -> &str {
        if self.name == "hardhat" {
            "localhost"
        } else {
            &self.name
        }
    }
}

/// One named, typed parameter of a constructor or function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiParam {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
}

impl AbiParam {
    pub fn new(name: impl Into<String>, param_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_type: param_type.into(),
        }
    }
}

/// A constructor or function entry in a compiled interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionEntry {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
}

impl FunctionEntry {
    pub fn new(name: impl Into<String>, inputs: Vec<AbiParam>) -> Self {
        Self {
            name: name.into(),
            inputs,
        }
    }

    /// Ordered input names and types, for display.
    pub fn display_params(&self) -> (Vec<String>, Vec<String>) {
        let names = self.inputs.iter().map(|p| p.name.clone()).collect();
        let types = self.inputs.iter().map(|p| p.param_type.clone()).collect();
        (names, types)
    }
}

/// Machine-readable description of a contract's callable surface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractInterface {
    /// Constructor entry, absent for contracts with a default constructor.
    #[serde(default)]
    pub constructor: Option<FunctionEntry>,
    #[serde(default)]
    pub functions: Vec<FunctionEntry>,
    /// Raw interface definition as emitted by the compiler, persisted with
    /// deployment records.
    #[serde(default)]
    pub definition: Value,
}

impl ContractInterface {
    /// Find a function entry by name.
    pub fn function(&self, name: &str) -> Option<&FunctionEntry> {
        self.functions.iter().find(|f| f.name == name)
    }
}

/// Result of a confirmed deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    pub address: String,
    #[serde(default)]
    pub transaction_hash: Option<String>,
}

/// Result of a confirmed function call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallReceipt {
    pub transaction_hash: String,
    pub confirmed: bool,
}

/// Per-action capture buffer for incidental output.
///
/// The engine hands a fresh buffer to every action so that whatever the
/// chain client prints ends up in that action's outcome instead of
/// interleaving with report rendering. Interior mutability keeps the
/// client-side signature to a shared reference.
#[derive(Debug, Default)]
pub struct ActionLog {
    lines: Mutex<Vec<String>>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line of captured output.
    pub fn push(&self, line: impl Into<String>) {
        // A poisoned lock only happens if a writer panicked; captured
        // output is best-effort diagnostics, so keep whatever is intact.
        let mut lines = match self.lines.lock() {
            Ok(lines) => lines,
            Err(poisoned) => poisoned.into_inner(),
        };
        lines.push(line.into());
    }

    /// Take all captured lines, leaving the buffer empty.
    pub fn drain(&self) -> Vec<String> {
        let mut lines = match self.lines.lock() {
            Ok(lines) => lines,
            Err(poisoned) => poisoned.into_inner(),
        };
        std::mem::take(&mut *lines)
    }

    pub fn is_empty(&self) -> bool {
        match self.lines.lock() {
            Ok(lines) => lines.is_empty(),
            Err(poisoned) => poisoned.into_inner().is_empty(),
        }
    }
}

/// ChainClient trait - async interface to the underlying chain tooling.
///
/// Every operation is awaited to completion (confirmation or definitive
/// failure) before the engine moves on; bounding call latency is the
/// client's concern, not the engine's.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Identity of the connected network.
    async fn network_identity(&self) -> Result<NetworkIdentity, ChainError>;

    /// Compiled interface for a contract, used for argument display and
    /// record persistence.
    async fn compiled_interface(&self, contract_name: &str)
        -> Result<ContractInterface, ChainError>;

    /// Deploy a contract and wait for confirmation.
    async fn deploy(
        &self,
        qualified_name: &str,
        constructor_args: &[Value],
        libraries: &BTreeMap<String, String>,
        log: &ActionLog,
    ) -> Result<Deployment, ChainError>;

    /// Call a function on a deployed contract and wait for its receipt.
    async fn call_function(
        &self,
        address: &str,
        interface_definition: &Value,
        function_name: &str,
        args: &[Value],
        log: &ActionLog,
    ) -> Result<CallReceipt, ChainError>;

    /// Submit a contract's source identity to the block explorer.
    async fn verify_source(
        &self,
        qualified_name: &str,
        address: &str,
        constructor_args: &[Value],
        libraries: &BTreeMap<String, String>,
        log: &ActionLog,
    ) -> Result<(), ChainError>;

    /// Ordered list of configured signer addresses.
    async fn signer_addresses(&self) -> Result<Vec<String>, ChainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_name_maps_hardhat_to_localhost() {
        assert_eq!(NetworkIdentity::new("hardhat").canonical_name(), "localhost");
        assert_eq!(NetworkIdentity::new("sepolia").canonical_name(), "sepolia");
    }

    #[test]
    fn test_action_log_drain_empties_buffer() {
        let log = ActionLog::new();
        log.push("gas estimate: 21000");
        log.push("confirmed in block 7");
        assert_eq!(log.drain().len(), 2);
        assert!(log.is_empty());
    }

    #[test]
    fn test_function_lookup_by_name() {
        let interface = ContractInterface {
            constructor: None,
            functions: vec![FunctionEntry::new(
                "setOwner",
                vec![AbiParam::new("owner", "address")],
            )],
            definition: Value::Null,
        };
        assert!(interface.function("setOwner").is_some());
        assert!(interface.function("transfer").is_none());
    }
}
