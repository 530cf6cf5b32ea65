//! Config normalizer
//!
//! Converts user-supplied, partially-specified action entries into strict,
//! fully-populated records, one pipeline per action kind:
//! - Deploy: resolve the source file, compose the qualified name, default
//!   args/libraries, attach constructor display metadata
//! - Initialize: look up the deployed address, default args, attach
//!   function display metadata
//! - Verify: expand the `ALL` sentinel or named entries from the catalog
//!
//! Normalization is all-or-nothing per batch: the first bad entry fails the
//! whole batch before anything executes. It never invokes the reference
//! resolver - that happens per-action inside the engine, so later actions
//! can reference addresses produced earlier in the same run.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::chain::{ChainClient, ChainError, ContractInterface, FunctionEntry};
use crate::store::DeploymentCatalog;
use crate::types::{
    DeployAction, DeployEntry, InitializeAction, InitializeEntry, StrictAction, VerifyAction,
    VERIFY_ALL,
};

/// Normalization errors. Any of these fails the whole batch.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("no source file found for contract '{contract_name}' under {root}")]
    SourceNotFound { contract_name: String, root: PathBuf },

    #[error("contract '{0}' has no deployment record")]
    NotDeployed(String),

    #[error("chain client error: {0}")]
    Chain(#[from] ChainError),

    #[error("failed to scan source tree: {0}")]
    Io(#[from] std::io::Error),
}

/// Normalize deploy entries.
///
/// `source_root` is the directory the contract sources live under; entries
/// without an explicit `file_path` are located by walking it for
/// `<ContractName>.sol` (first match in traversal order wins - the
/// ecosystem guarantees one file per contract name by convention).
pub async fn normalize_deploy(
    entries: &[DeployEntry],
    source_root: &Path,
    chain: &dyn ChainClient,
) -> Result<Vec<StrictAction>, NormalizeError> {
    let mut actions = Vec::with_capacity(entries.len());
    for entry in entries {
        let source_path = match &entry.file_path {
            Some(path) => path.clone(),
            None => find_contract_source(source_root, &entry.contract_name)?.ok_or_else(|| {
                NormalizeError::SourceNotFound {
                    contract_name: entry.contract_name.clone(),
                    root: source_root.to_path_buf(),
                }
            })?,
        };
        // An explicit qualified name wins over the composed one.
        let qualified_name = entry
            .qualified_name
            .clone()
            .unwrap_or_else(|| format!("{}:{}", source_path, entry.contract_name));

        let interface = display_interface(chain, &entry.contract_name).await;
        let (arg_names, arg_types) = interface
            .constructor
            .as_ref()
            .map(FunctionEntry::display_params)
            .unwrap_or_default();

        actions.push(StrictAction::Deploy(DeployAction {
            contract_name: entry.contract_name.clone(),
            source_path,
            qualified_name,
            args: entry.args.clone().unwrap_or_default(),
            arg_names,
            arg_types,
            libraries: entry.libraries.clone().unwrap_or_default(),
            interface_definition: interface.definition,
        }));
    }
    Ok(actions)
}

/// Normalize initialize entries against the current catalog.
pub async fn normalize_initialize(
    entries: &[InitializeEntry],
    catalog: &DeploymentCatalog,
    chain: &dyn ChainClient,
) -> Result<Vec<StrictAction>, NormalizeError> {
    let mut actions = Vec::with_capacity(entries.len());
    for entry in entries {
        let record = catalog
            .get(&entry.contract_name)
            .ok_or_else(|| NormalizeError::NotDeployed(entry.contract_name.clone()))?;

        let interface = display_interface(chain, &entry.contract_name).await;
        let (arg_names, arg_types) = interface
            .function(&entry.function_name)
            .map(FunctionEntry::display_params)
            .unwrap_or_default();

        actions.push(StrictAction::Initialize(InitializeAction {
            contract_name: entry.contract_name.clone(),
            function_name: entry.function_name.clone(),
            address: record.address.clone(),
            args: entry.args.clone().unwrap_or_default(),
            arg_names,
            arg_types,
            interface_definition: record.interface_definition.clone(),
        }));
    }
    Ok(actions)
}

/// Normalize verify entries.
///
/// A single `"ALL"` entry expands to one action per catalog record, in
/// contract-name order. Each action carries the record's stored qualified
/// name, address, args and libraries - verification must match what was
/// actually deployed, never what the config currently says.
pub fn normalize_verify(
    names: &[String],
    catalog: &DeploymentCatalog,
) -> Result<Vec<StrictAction>, NormalizeError> {
    if names.len() == 1 && names[0] == VERIFY_ALL {
        return Ok(catalog
            .records()
            .values()
            .map(verify_action_from_record)
            .collect());
    }

    let mut actions = Vec::with_capacity(names.len());
    for contract_name in names {
        let record = catalog
            .get(contract_name)
            .ok_or_else(|| NormalizeError::NotDeployed(contract_name.clone()))?;
        actions.push(verify_action_from_record(record));
    }
    Ok(actions)
}

fn verify_action_from_record(record: &crate::types::DeploymentRecord) -> StrictAction {
    StrictAction::Verify(VerifyAction {
        contract_name: record.contract_name.clone(),
        qualified_name: record.qualified_name(),
        address: record.address.clone(),
        args: record.constructor_args.clone(),
        libraries: record.libraries.clone(),
    })
}

/// Compiled interface for display purposes. Absence never fails the
/// action: a contract the compiler knows nothing about simply gets no
/// argument names in the report.
async fn display_interface(chain: &dyn ChainClient, contract_name: &str) -> ContractInterface {
    match chain.compiled_interface(contract_name).await {
        Ok(interface) => interface,
        Err(err) => {
            tracing::debug!(
                contract = contract_name,
                error = %err,
                "compiled interface unavailable, argument display will be empty"
            );
            ContractInterface::default()
        }
    }
}

/// Walk `root` for a file named `<contract_name>.sol`.
///
/// Directory entries are visited in name order so the "first match" policy
/// is deterministic across platforms.
fn find_contract_source(
    root: &Path,
    contract_name: &str,
) -> Result<Option<String>, std::io::Error> {
    let wanted = format!("{contract_name}.sol");
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let mut entries: Vec<PathBuf> = std::fs::read_dir(&dir)?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(|e| e.path())
            .collect();
        entries.sort();

        let mut subdirs = Vec::new();
        for path in entries {
            if path.is_dir() {
                subdirs.push(path);
            } else if path.file_name().and_then(|n| n.to_str()) == Some(wanted.as_str()) {
                return Ok(Some(path.to_string_lossy().into_owned()));
            }
        }
        // Depth-first, preserving name order among siblings.
        for sub in subdirs.into_iter().rev() {
            stack.push(sub);
        }
    }
    Ok(None)
}
