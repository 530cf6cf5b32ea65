//! Per-action execution outcomes.

use serde::{Deserialize, Serialize};

use super::ActionKind;

/// State of one action inside the engine's run loop.
///
/// `Pending → Resolving → Executing → {Succeeded | Failed}`; a failed
/// action is terminal for the run, there are no retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionState {
    Pending,
    Resolving,
    Executing,
    Succeeded,
    Failed,
}

/// What a successful action produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionArtifact {
    /// A contract landed on chain.
    Deployed {
        address: String,
        /// Empty when the client reported no hash.
        transaction_hash: String,
    },
    /// A function call went through.
    Called {
        transaction_hash: String,
        confirmed: bool,
    },
    /// The explorer accepted the source submission.
    Verified,
}

/// Success-or-failure classification of one executed action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    Succeeded { artifact: ActionArtifact },
    Failed { error: String },
}

/// The recorded result of executing one strict action.
///
/// Produced once per action by the engine, consumed by the report sink
/// and/or the caller; the Deploy case additionally feeds the metadata store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    /// Position in the executed action list.
    pub index: usize,
    pub contract_name: String,
    pub kind: ActionKind,
    pub status: OutcomeStatus,
    /// Incidental output captured while this action executed.
    #[serde(default)]
    pub log_lines: Vec<String>,
}

impl ActionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.status, OutcomeStatus::Succeeded { .. })
    }

    /// Error message when the action failed.
    pub fn error(&self) -> Option<&str> {
        match &self.status {
            OutcomeStatus::Failed { error } => Some(error),
            OutcomeStatus::Succeeded { .. } => None,
        }
    }

    /// Artifact when the action succeeded.
    pub fn artifact(&self) -> Option<&ActionArtifact> {
        match &self.status {
            OutcomeStatus::Succeeded { artifact } => Some(artifact),
            OutcomeStatus::Failed { .. } => None,
        }
    }
}
