//! Strict (fully-populated) action records.
//!
//! Every field an executor reads is present once normalization completes.
//! Normalization only fills absent fields; it never overwrites a field the
//! user supplied.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ActionKind;

/// A deploy action ready for execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeployAction {
    pub contract_name: String,
    /// Source file path, e.g. "contracts/tokens/SimpleDN404.sol".
    pub source_path: String,
    /// "{source_path}:{contract_name}", disambiguating identically-named
    /// contracts in different files.
    pub qualified_name: String,
    /// Ordered constructor arguments, possibly still containing symbolic
    /// references. Resolved per-action just before execution.
    pub args: Vec<Value>,
    /// Constructor argument names from the compiled interface. Display only.
    pub arg_names: Vec<String>,
    /// Constructor argument types from the compiled interface. Display only.
    pub arg_types: Vec<String>,
    /// Library name to address (or address reference).
    pub libraries: BTreeMap<String, String>,
    /// Raw compiled interface definition, persisted with the record on
    /// successful deployment. Null when the artifact was unavailable.
    pub interface_definition: Value,
}

/// An initialize action: one function call on a deployed contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitializeAction {
    pub contract_name: String,
    pub function_name: String,
    /// Deployed address, looked up from the metadata store at normalization.
    pub address: String,
    pub args: Vec<Value>,
    /// Function argument names, matched by function name. Display only.
    pub arg_names: Vec<String>,
    /// Function argument types. Display only.
    pub arg_types: Vec<String>,
    /// Interface definition from the stored deployment record; the chain
    /// client needs it to encode the call.
    pub interface_definition: Value,
}

/// A verify action: submit a contract's source identity to an explorer.
///
/// Args and libraries are copied from the deployment record, never from the
/// configuration: verification must match what was actually deployed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyAction {
    pub contract_name: String,
    pub qualified_name: String,
    pub address: String,
    pub args: Vec<Value>,
    pub libraries: BTreeMap<String, String>,
}

/// Closed sum of the fully-populated action records.
///
/// Execution and normalization branch by exhaustive match on this enum;
/// there are no runtime "which config shape is this" checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrictAction {
    Deploy(DeployAction),
    Initialize(InitializeAction),
    Verify(VerifyAction),
}

impl StrictAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            StrictAction::Deploy(_) => ActionKind::Deploy,
            StrictAction::Initialize(_) => ActionKind::Initialize,
            StrictAction::Verify(_) => ActionKind::Verify,
        }
    }

    pub fn contract_name(&self) -> &str {
        match self {
            StrictAction::Deploy(a) => &a.contract_name,
            StrictAction::Initialize(a) => &a.contract_name,
            StrictAction::Verify(a) => &a.contract_name,
        }
    }
}
