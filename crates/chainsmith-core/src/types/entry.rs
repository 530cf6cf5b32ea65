//! Raw action entries as they appear in configuration.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sentinel verify entry meaning "verify every contract in the store".
pub const VERIFY_ALL: &str = "ALL";

/// The three kinds of work the engine knows how to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Deploy,
    Initialize,
    Verify,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Deploy => "deploy",
            ActionKind::Initialize => "initialize",
            ActionKind::Verify => "verify",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One user-supplied deploy entry. Only `contract_name` is required;
/// everything else is filled in by normalization.
///
/// Argument values may be literals, nested arrays, or symbolic references
/// (`"<Contract>.address"`, `"SIGNER[<n>]"`) resolved just before execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeployEntry {
    /// Contract name, e.g. "SimpleDN404".
    pub contract_name: String,
    /// Source file path. Looked up in the source tree when absent.
    #[serde(default)]
    pub file_path: Option<String>,
    /// Fully-qualified name ("path:Contract"). Composed when absent.
    #[serde(default)]
    pub qualified_name: Option<String>,
    /// Ordered constructor arguments.
    #[serde(default)]
    pub args: Option<Vec<Value>>,
    /// Library name to address (or address reference) mapping.
    #[serde(default)]
    pub libraries: Option<BTreeMap<String, String>>,
}

impl DeployEntry {
    pub fn new(contract_name: impl Into<String>) -> Self {
        Self {
            contract_name: contract_name.into(),
            ..Self::default()
        }
    }

    pub fn with_args(mut self, args: Vec<Value>) -> Self {
        self.args = Some(args);
        self
    }

    pub fn with_libraries(mut self, libraries: BTreeMap<String, String>) -> Self {
        self.libraries = Some(libraries);
        self
    }
}

/// One user-supplied initialize entry: call `function_name` on an already
/// deployed contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitializeEntry {
    /// Target contract name; its address comes from the metadata store.
    pub contract_name: String,
    /// Function to call.
    pub function_name: String,
    /// Ordered call arguments.
    #[serde(default)]
    pub args: Option<Vec<Value>>,
}

impl InitializeEntry {
    pub fn new(contract_name: impl Into<String>, function_name: impl Into<String>) -> Self {
        Self {
            contract_name: contract_name.into(),
            function_name: function_name.into(),
            args: None,
        }
    }

    pub fn with_args(mut self, args: Vec<Value>) -> Self {
        self.args = Some(args);
        self
    }
}
