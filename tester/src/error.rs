//! Harness error types
//!
//! Every variant is fatal for the scenario that raised it: nothing here is
//! retried, and nothing is cleaned up on the way out.

use shared::{BrokerId, SharedError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Metadata query '{command}' failed with: {stderr}")]
    MetadataQuery { command: String, stderr: String },

    #[error("Broker {broker} (port {port}) resolved to {matches} containers, expected exactly one")]
    ResolutionAmbiguous {
        broker: BrokerId,
        port: u16,
        matches: usize,
    },

    #[error("Leader {leader} is also listed as a follower")]
    ConsistencyViolation { leader: BrokerId },

    #[error("Fault injection '{strategy}' failed: {reason}")]
    FaultInjection { strategy: String, reason: String },

    #[error("A fault has already been injected in this run ({strategy})")]
    FaultAlreadyInjected { strategy: String },

    #[error("Invalid survivor set {survivors:?} for leader {leader}")]
    InvalidSurvivors {
        leader: BrokerId,
        survivors: Vec<BrokerId>,
    },

    #[error("No replication state observed for {topic}-{partition}")]
    PartitionStateUnavailable { topic: String, partition: u32 },

    #[error("Command '{command}' exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Unknown test scenario: '{name}'. Available: {available}")]
    UnknownScenario { name: String, available: String },

    #[error("Shared component error: {0}")]
    Shared(#[from] SharedError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HarnessError {
    /// Wrap any failure raised while perturbing the cluster
    pub fn fault(strategy: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        HarnessError::FaultInjection {
            strategy: strategy.into(),
            reason: reason.to_string(),
        }
    }
}

pub type HarnessResult<T> = Result<T, HarnessError>;
