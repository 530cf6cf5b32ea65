//! # Chainsmith Core
//!
//! Core abstractions and deterministic logic for the chainsmith
//! contract-deployment engine.
//!
//! This crate contains:
//! - Raw / strict action definitions and deployment records
//! - Reference resolution (address and signer substitution)
//! - Config normalization (raw entries into fully-populated actions)
//! - The sequential execution engine with per-action failure isolation
//! - The chain-client and deployment-store abstractions
//!
//! This crate does NOT care about:
//! - How sources are compiled or transactions are signed
//! - How the report is rendered on a terminal
//! - Where deployment records physically live

pub mod chain;
pub mod executor;
pub mod normalizer;
pub mod report;
pub mod resolver;
pub mod store;
pub mod types;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::chain::{
        AbiParam, ActionLog, CallReceipt, ChainClient, ChainError, ContractInterface, Deployment,
        FunctionEntry, NetworkIdentity,
    };
    pub use crate::executor::{Engine, EngineError};
    pub use crate::normalizer::{
        normalize_deploy, normalize_initialize, normalize_verify, NormalizeError,
    };
    pub use crate::report::{BufferedReportSink, ReportRow, ReportSink, TextReportSink};
    pub use crate::resolver::{resolve_args, resolve_libraries, ResolveError};
    pub use crate::store::{DeploymentCatalog, DeploymentStore, StoreError};
    pub use crate::types::{
        ActionArtifact, ActionKind, ActionOutcome, ActionState, DeployAction, DeployEntry,
        DeploymentRecord, InitializeAction, InitializeEntry, OutcomeStatus, StrictAction,
        VerifyAction, VERIFY_ALL,
    };
}

// Re-export key types at crate root
pub use chain::{ActionLog, ChainClient, ChainError, NetworkIdentity};
pub use executor::{Engine, EngineError};
pub use resolver::ResolveError;
pub use store::{DeploymentCatalog, DeploymentStore, StoreError};
pub use types::{ActionKind, ActionOutcome, DeploymentRecord, StrictAction};
