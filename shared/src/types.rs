//! Core shared types and identifiers

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Identity assigned to a broker when it registers with the cluster
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BrokerId(pub i32);

impl fmt::Display for BrokerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for BrokerId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

/// Replication state of one partition as stored under
/// `/brokers/topics/<topic>/partitions/<n>/state`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionState {
    pub leader: BrokerId,
    #[serde(default)]
    pub isr: Vec<BrokerId>,
    #[serde(default)]
    pub leader_epoch: Option<i64>,
    #[serde(default)]
    pub controller_epoch: Option<i64>,
    #[serde(default)]
    pub version: Option<i32>,
}

impl PartitionState {
    /// Quorum has formed beyond the leader alone
    pub fn has_quorum(&self) -> bool {
        self.isr.len() > 1
    }

    /// In-sync replicas other than the leader, in metadata order
    pub fn followers(&self) -> Vec<BrokerId> {
        self.isr
            .iter()
            .copied()
            .filter(|id| *id != self.leader)
            .collect()
    }
}

impl fmt::Display for PartitionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let isr: Vec<String> = self.isr.iter().map(|id| id.to_string()).collect();
        write!(f, "leader={} isr=[{}]", self.leader, isr.join(","))?;
        if let Some(epoch) = self.leader_epoch {
            write!(f, " leader_epoch={epoch}")?;
        }
        Ok(())
    }
}

/// Record stored under `/controller`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerRecord {
    #[serde(rename = "brokerid")]
    pub broker_id: BrokerId,
    #[serde(default)]
    pub version: Option<i32>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Registration stored under `/brokers/ids/<id>`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerRegistration {
    pub port: u16,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub endpoints: Vec<String>,
    #[serde(default)]
    pub version: Option<i32>,
}

/// Replica assignment stored under `/brokers/topics/<topic>`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicAssignment {
    #[serde(default)]
    pub version: Option<i32>,
    pub partitions: BTreeMap<String, Vec<BrokerId>>,
}

impl TopicAssignment {
    pub fn replicas(&self, partition: u32) -> Option<&[BrokerId]> {
        self.partitions
            .get(&partition.to_string())
            .map(|replicas| replicas.as_slice())
    }
}

/// A running container, as owned by the container runtime
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerHandle {
    id: String,
}

impl ContainerHandle {
    pub const SHORT_ID_LEN: usize = 12;

    pub fn new<S: Into<String>>(id: S) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn short_id(&self) -> &str {
        match self.id.char_indices().nth(Self::SHORT_ID_LEN) {
            Some((end, _)) => &self.id[..end],
            None => &self.id,
        }
    }
}

impl fmt::Display for ContainerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_id())
    }
}

/// A broker joined with the container serving it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterNode {
    pub broker_id: BrokerId,
    pub container: ContainerHandle,
}

impl ClusterNode {
    pub fn new(broker_id: BrokerId, container: ContainerHandle) -> Self {
        Self {
            broker_id,
            container,
        }
    }
}

impl fmt::Display for ClusterNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.broker_id, self.container)
    }
}

/// Snapshot of the partition topology taken once per run
///
/// Never mutated after discovery. Fresh state is read from the metadata
/// store directly when needed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterState {
    pub controller: ClusterNode,
    pub leader: ClusterNode,
    pub followers: Vec<ClusterNode>,
    pub in_sync_replicas: BTreeSet<BrokerId>,
}

impl ClusterState {
    pub fn follower_ids(&self) -> Vec<BrokerId> {
        self.followers.iter().map(|node| node.broker_id).collect()
    }

    pub fn first_follower(&self) -> Option<&ClusterNode> {
        self.followers.first()
    }
}

impl fmt::Display for ClusterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let followers: Vec<String> = self.followers.iter().map(|n| n.to_string()).collect();
        write!(
            f,
            "controller: {}, leader: {}, isr(s): [{}]",
            self.controller,
            self.leader,
            followers.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_state_decodes_zookeeper_json() {
        let raw = r#"{"controller_epoch":1,"leader":1,"version":1,"leader_epoch":0,"isr":[1,2,3]}"#;
        let state: PartitionState = serde_json::from_str(raw).unwrap();

        assert_eq!(state.leader, BrokerId(1));
        assert_eq!(state.isr, vec![BrokerId(1), BrokerId(2), BrokerId(3)]);
        assert!(state.has_quorum());
        assert_eq!(state.followers(), vec![BrokerId(2), BrokerId(3)]);
    }

    #[test]
    fn test_single_replica_is_not_quorum() {
        let raw = r#"{"leader":2,"isr":[2]}"#;
        let state: PartitionState = serde_json::from_str(raw).unwrap();

        assert!(!state.has_quorum());
        assert!(state.followers().is_empty());
    }

    #[test]
    fn test_controller_record_uses_brokerid_key() {
        let raw = r#"{"version":1,"brokerid":3,"timestamp":"1500000000000"}"#;
        let record: ControllerRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.broker_id, BrokerId(3));
    }

    #[test]
    fn test_topic_assignment_lookup() {
        let raw = r#"{"version":1,"partitions":{"0":[2,3]}}"#;
        let assignment: TopicAssignment = serde_json::from_str(raw).unwrap();

        assert_eq!(assignment.replicas(0), Some(&[BrokerId(2), BrokerId(3)][..]));
        assert_eq!(assignment.replicas(1), None);
    }

    #[test]
    fn test_container_handle_short_id() {
        let handle = ContainerHandle::new("4f1c2a9be0d7a51c9f0e33b2c4d5e6f7");
        assert_eq!(handle.short_id(), "4f1c2a9be0d7");
        assert_eq!(handle.to_string(), "4f1c2a9be0d7");

        let short = ContainerHandle::new("abc");
        assert_eq!(short.short_id(), "abc");
    }

    #[test]
    fn test_cluster_node_display() {
        let node = ClusterNode::new(BrokerId(2), ContainerHandle::new("0123456789abcdef"));
        assert_eq!(node.to_string(), "2 (0123456789ab)");
    }
}
