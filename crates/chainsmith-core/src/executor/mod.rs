//! Execution engine
//!
//! Runs a strict action list sequentially, one action at a time:
//! - Resolves each action's references against the catalog *as of that
//!   point in the sequence*, so later actions see earlier addresses
//! - Isolates per-action failures: a failed action never stops the batch
//! - Captures incidental chain-client output into a per-action buffer
//! - Persists a deployment record the moment a deploy confirms
//!
//! Sequential execution is a correctness requirement, not a convenience:
//! later actions may reference addresses produced by earlier ones.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use crate::chain::{ActionLog, ChainClient, ChainError};
use crate::report::{ReportRow, ReportSink};
use crate::resolver::{resolve_args, resolve_libraries, ResolveError};
use crate::store::{DeploymentCatalog, StoreError};
use crate::types::{
    ActionArtifact, ActionOutcome, ActionState, DeploymentRecord, OutcomeStatus, StrictAction,
};

/// Setup-scoped errors. These abort the run before any action executes;
/// action-scoped failures never surface here. Catalog loading happens
/// before the engine is involved, so storage failures inside a run are
/// always action-scoped.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("chain setup failed: {0}")]
    Chain(#[from] ChainError),
}

/// Action-scoped errors, caught at the action boundary and turned into
/// failed outcomes.
#[derive(Debug, Error)]
enum ActionError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error("failed to persist deployment record: {0}")]
    Store(#[from] StoreError),

    #[error("function call was not confirmed (tx {0})")]
    Unconfirmed(String),
}

/// The execution engine.
pub struct Engine {
    chain: Arc<dyn ChainClient>,
}

impl Engine {
    pub fn new(chain: Arc<dyn ChainClient>) -> Self {
        Self { chain }
    }

    /// Execute a strict action list in order.
    ///
    /// Network identity and the signer list are fetched once up front;
    /// failure there aborts the run with no partial report. From then on
    /// every failure is action-scoped: the outcome list always has one
    /// entry per input action. The sink is optional - a headless run
    /// produces identical outcomes.
    pub async fn run(
        &self,
        actions: &[StrictAction],
        catalog: &mut DeploymentCatalog,
        mut sink: Option<&mut dyn ReportSink>,
    ) -> Result<Vec<ActionOutcome>, EngineError> {
        let identity = self.chain.network_identity().await?;
        let network_name = identity.canonical_name().to_string();
        let signers = self.chain.signer_addresses().await?;

        let mut outcomes = Vec::with_capacity(actions.len());
        for (index, action) in actions.iter().enumerate() {
            let log = ActionLog::new();
            tracing::info!(
                index,
                contract = action.contract_name(),
                kind = %action.kind(),
                "action started"
            );

            let status = match self
                .execute_action(action, catalog, &signers, &network_name, &log)
                .await
            {
                Ok(artifact) => OutcomeStatus::Succeeded { artifact },
                Err(err) => OutcomeStatus::Failed {
                    error: err.to_string(),
                },
            };

            // The buffer is drained on both paths; output from the next
            // action must never leak into this one's outcome.
            let outcome = ActionOutcome {
                index,
                contract_name: action.contract_name().to_string(),
                kind: action.kind(),
                status,
                log_lines: log.drain(),
            };

            match &outcome.status {
                OutcomeStatus::Succeeded { .. } => {
                    tracing::info!(
                        index,
                        contract = outcome.contract_name,
                        kind = %outcome.kind,
                        "action completed"
                    );
                }
                OutcomeStatus::Failed { error } => {
                    tracing::warn!(
                        index,
                        contract = outcome.contract_name,
                        kind = %outcome.kind,
                        error = %error,
                        "action failed, continuing with next action"
                    );
                }
            }

            if let Some(sink) = sink.as_deref_mut() {
                sink.write(ReportRow::from_outcome(action, &outcome), index);
            }
            outcomes.push(outcome);
        }

        if let Some(sink) = sink {
            sink.close();
        }
        Ok(outcomes)
    }

    /// Resolve and execute one action. `Resolving → Executing` transitions
    /// are traced; any error here is terminal for this action only.
    async fn execute_action(
        &self,
        action: &StrictAction,
        catalog: &mut DeploymentCatalog,
        signers: &[String],
        network_name: &str,
        log: &ActionLog,
    ) -> Result<ActionArtifact, ActionError> {
        trace_state(action, ActionState::Resolving);
        match action {
            StrictAction::Deploy(deploy) => {
                let args = resolve_args(&deploy.args, catalog.records(), signers)?;
                let libraries = resolve_libraries(&deploy.libraries, catalog.records())?;

                trace_state(action, ActionState::Executing);
                let deployment = self
                    .chain
                    .deploy(&deploy.qualified_name, &args, &libraries, log)
                    .await?;

                let record = DeploymentRecord {
                    contract_name: deploy.contract_name.clone(),
                    source_path: deploy.source_path.clone(),
                    constructor_args: args,
                    arg_names: deploy.arg_names.clone(),
                    arg_types: deploy.arg_types.clone(),
                    libraries,
                    interface_definition: deploy.interface_definition.clone(),
                    created_at: Utc::now(),
                    network_name: network_name.to_string(),
                    transaction_hash: deployment.transaction_hash.clone().unwrap_or_default(),
                    address: deployment.address.clone(),
                };
                // Insert before moving on: the next action in this run may
                // already reference this address.
                catalog.insert(record).await?;

                Ok(ActionArtifact::Deployed {
                    address: deployment.address,
                    transaction_hash: deployment.transaction_hash.unwrap_or_default(),
                })
            }
            StrictAction::Initialize(init) => {
                let args = resolve_args(&init.args, catalog.records(), signers)?;

                trace_state(action, ActionState::Executing);
                let receipt = self
                    .chain
                    .call_function(
                        &init.address,
                        &init.interface_definition,
                        &init.function_name,
                        &args,
                        log,
                    )
                    .await?;
                if !receipt.confirmed {
                    return Err(ActionError::Unconfirmed(receipt.transaction_hash));
                }

                Ok(ActionArtifact::Called {
                    transaction_hash: receipt.transaction_hash,
                    confirmed: true,
                })
            }
            StrictAction::Verify(verify) => {
                // Verify args come from the deployment record and are
                // already concrete; resolving keeps the step uniform.
                let args = resolve_args(&verify.args, catalog.records(), signers)?;
                let libraries = resolve_libraries(&verify.libraries, catalog.records())?;

                trace_state(action, ActionState::Executing);
                self.chain
                    .verify_source(
                        &verify.qualified_name,
                        &verify.address,
                        &args,
                        &libraries,
                        log,
                    )
                    .await?;

                Ok(ActionArtifact::Verified)
            }
        }
    }
}

fn trace_state(action: &StrictAction, state: ActionState) {
    tracing::debug!(
        contract = action.contract_name(),
        kind = %action.kind(),
        state = ?state,
        "action state"
    );
}
