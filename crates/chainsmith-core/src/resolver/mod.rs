//! Reference resolver
//!
//! Rewrites raw argument trees, replacing symbolic references with concrete
//! values:
//! - `"<Contract>.address"` becomes that contract's deployed address
//! - `"SIGNER[<n>]"` becomes the address of the signer at ordinal `n`
//!
//! Resolution is recursive over nested arrays; non-matching values pass
//! through unchanged. It is pure and deterministic: the same metadata
//! snapshot and signer list always produce the same output. Unknown
//! references fail closed - a placeholder string must never reach the
//! chain client.

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

use crate::types::DeploymentRecord;

/// Suffix marking an address reference, e.g. "Token.address".
pub const ADDRESS_SUFFIX: &str = ".address";
/// Marker the contract name is split at.
pub const ADDRESS_MARKER: char = '.';
/// Prefix and suffix marking a signer reference, e.g. "SIGNER[0]".
pub const SIGNER_PREFIX: &str = "SIGNER[";
pub const SIGNER_SUFFIX: &str = "]";

/// Resolution errors. Fatal for the affected action only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("unresolved reference: no deployment record for contract '{0}'")]
    UnresolvedReference(String),

    #[error("invalid signer index in '{reference}': {reason}")]
    InvalidSignerIndex { reference: String, reason: String },
}

/// Resolve an ordered argument tree against a metadata snapshot and an
/// ordered signer list.
pub fn resolve_args(
    args: &[Value],
    metadata: &BTreeMap<String, DeploymentRecord>,
    signers: &[String],
) -> Result<Vec<Value>, ResolveError> {
    args.iter()
        .map(|value| resolve_value(value, metadata, signers))
        .collect()
}

fn resolve_value(
    value: &Value,
    metadata: &BTreeMap<String, DeploymentRecord>,
    signers: &[String],
) -> Result<Value, ResolveError> {
    match value {
        Value::Array(items) => {
            let resolved = items
                .iter()
                .map(|item| resolve_value(item, metadata, signers))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Array(resolved))
        }
        Value::String(s) if s.ends_with(ADDRESS_SUFFIX) => {
            Ok(Value::String(lookup_address(s, metadata)?))
        }
        Value::String(s) if s.starts_with(SIGNER_PREFIX) && s.ends_with(SIGNER_SUFFIX) => {
            Ok(Value::String(lookup_signer(s, signers)?))
        }
        other => Ok(other.clone()),
    }
}

/// Resolve address references in a library map, value by value.
pub fn resolve_libraries(
    libraries: &BTreeMap<String, String>,
    metadata: &BTreeMap<String, DeploymentRecord>,
) -> Result<BTreeMap<String, String>, ResolveError> {
    let mut resolved = BTreeMap::new();
    for (library_name, address) in libraries {
        let concrete = if address.ends_with(ADDRESS_SUFFIX) {
            lookup_address(address, metadata)?
        } else {
            address.clone()
        };
        resolved.insert(library_name.clone(), concrete);
    }
    Ok(resolved)
}

fn lookup_address(
    reference: &str,
    metadata: &BTreeMap<String, DeploymentRecord>,
) -> Result<String, ResolveError> {
    // Split at the first marker: "Token.address" names contract "Token".
    let contract_name = reference
        .split(ADDRESS_MARKER)
        .next()
        .unwrap_or_default();
    metadata
        .get(contract_name)
        .map(|record| record.address.clone())
        .ok_or_else(|| ResolveError::UnresolvedReference(contract_name.to_string()))
}

fn lookup_signer(reference: &str, signers: &[String]) -> Result<String, ResolveError> {
    let inner = reference
        .strip_prefix(SIGNER_PREFIX)
        .and_then(|rest| rest.strip_suffix(SIGNER_SUFFIX))
        .unwrap_or_default();
    let index: usize = inner
        .trim()
        .parse()
        .map_err(|_| ResolveError::InvalidSignerIndex {
            reference: reference.to_string(),
            reason: format!("'{inner}' is not a number"),
        })?;
    signers
        .get(index)
        .cloned()
        .ok_or_else(|| ResolveError::InvalidSignerIndex {
            reference: reference.to_string(),
            reason: format!("index {index} out of range for {} signer(s)", signers.len()),
        })
}
