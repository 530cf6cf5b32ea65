//! Core type definitions for chainsmith
//!
//! This module contains the fundamental types used throughout the system:
//! - DeployEntry / InitializeEntry: user-supplied, loosely-specified action input
//! - StrictAction: fully-populated action records ready for execution
//! - DeploymentRecord: one durable record per deployed contract
//! - ActionOutcome: the recorded result of executing one action

mod entry;
mod outcome;
mod record;
mod strict;

pub use entry::{ActionKind, DeployEntry, InitializeEntry, VERIFY_ALL};
pub use outcome::{ActionArtifact, ActionOutcome, ActionState, OutcomeStatus};
pub use record::DeploymentRecord;
pub use strict::{DeployAction, InitializeAction, StrictAction, VerifyAction};
