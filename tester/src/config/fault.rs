//! Fault Strategy Configuration
//!
//! The ways a partition leader can be taken out of the cluster

use serde::{Deserialize, Serialize};
use shared::BrokerId;
use std::fmt;
use std::str::FromStr;

/// Which followers stay in the replica set when it is shrunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurvivorSelection {
    /// Only the first in-sync follower
    FirstFollower,
    /// Every in-sync follower
    AllFollowers,
    /// A fixed list of broker ids
    Explicit(Vec<BrokerId>),
}

/// Leader-loss mechanism applied once per scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaultStrategy {
    /// Bring the leader container's network interface down
    InterfaceDown,
    /// Detach the leader container from the project network
    NetworkDisconnect,
    /// Kill and remove the leader container
    ForcedRemoval,
    /// Reassign the partition away from the leader
    ReplicaSetShrink(SurvivorSelection),
}

impl FaultStrategy {
    /// Strategy used when a scenario does not configure one
    pub fn control_plane_default() -> Self {
        FaultStrategy::ReplicaSetShrink(SurvivorSelection::FirstFollower)
    }

    /// Short name used in scenario names and logs
    pub fn name(&self) -> &'static str {
        match self {
            FaultStrategy::InterfaceDown => "ifdown",
            FaultStrategy::NetworkDisconnect => "disconnect",
            FaultStrategy::ForcedRemoval => "kill",
            FaultStrategy::ReplicaSetShrink(_) => "change_isr",
        }
    }
}

impl fmt::Display for FaultStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultStrategy::ReplicaSetShrink(SurvivorSelection::Explicit(ids)) => {
                let ids: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
                write!(f, "{}[{}]", self.name(), ids.join(","))
            }
            _ => f.write_str(self.name()),
        }
    }
}

impl FromStr for FaultStrategy {
    type Err = String;

    /// Accepts `ifdown`, `disconnect`, `kill`, `change_isr`,
    /// `change_isr:all` and `change_isr:2,3`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (s, None),
        };

        match (name, arg) {
            ("ifdown", None) => Ok(FaultStrategy::InterfaceDown),
            ("disconnect", None) => Ok(FaultStrategy::NetworkDisconnect),
            ("kill", None) => Ok(FaultStrategy::ForcedRemoval),
            ("change_isr", None) => Ok(FaultStrategy::control_plane_default()),
            ("change_isr", Some("all")) => {
                Ok(FaultStrategy::ReplicaSetShrink(SurvivorSelection::AllFollowers))
            }
            ("change_isr", Some(list)) => {
                let ids = list
                    .split(',')
                    .map(|id| id.trim().parse::<i32>().map(BrokerId))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| format!("Invalid survivor list '{}': {}", list, e))?;
                Ok(FaultStrategy::ReplicaSetShrink(SurvivorSelection::Explicit(ids)))
            }
            _ => Err(format!("Unknown fault strategy: '{}'", s)),
        }
    }
}
