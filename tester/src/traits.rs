//! Trait definitions with mockall annotations for testing
//!
//! The harness drives three external tools: the container runtime, the
//! metadata store shell and the partition reassignment command. Each one sits
//! behind a trait so the discovery and fault logic can run against mocks.

use serde::{Deserialize, Serialize};
use shared::BrokerId;

use crate::error::HarnessResult;

/// One line of `docker ps --format '{{json .}}'`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSummary {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Names", default)]
    pub names: String,
    #[serde(rename = "Ports", default)]
    pub ports: String,
}

impl ContainerSummary {
    /// Host port of the first exposed port, if that port is published
    ///
    /// `0.0.0.0:32770->9092/tcp, :::32770->9092/tcp` yields `32770`;
    /// `2888/tcp, 0.0.0.0:2181->2181/tcp` yields `None`.
    pub fn public_port(&self) -> Option<u16> {
        let first = self.ports.split(',').next()?.trim();
        let (host, _) = first.split_once("->")?;
        let (_, port) = host.rsplit_once(':')?;
        port.parse().ok()
    }
}

/// Scale override for a compose service, `--scale <service>=<replicas>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceScale {
    pub service: String,
    pub replicas: u32,
}

/// Raw result of one metadata store invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataOutput {
    pub command: String,
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

/// Partition reassignment document accepted by the admin tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReassignmentPlan {
    pub partitions: Vec<PartitionReassignment>,
    pub version: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionReassignment {
    pub topic: String,
    pub partition: u32,
    pub replicas: Vec<BrokerId>,
}

impl ReassignmentPlan {
    pub const VERSION: u32 = 2;

    /// Restrict a single partition to the given replicas
    pub fn single(topic: &str, partition: u32, replicas: Vec<BrokerId>) -> Self {
        Self {
            partitions: vec![PartitionReassignment {
                topic: topic.to_string(),
                partition,
                replicas,
            }],
            version: Self::VERSION,
        }
    }

    pub fn to_json(&self) -> HarnessResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Container runtime abstraction (docker / docker-compose)
///
/// All operations block until the underlying command exits; a non-zero exit
/// is returned as an error.
#[mockall::automock]
#[async_trait::async_trait]
pub trait ContainerOrchestrator: Send + Sync {
    /// List containers carrying the given label filter (`key` or `key=value`)
    async fn list_containers(
        &self,
        label_filter: &str,
        include_stopped: bool,
    ) -> HarnessResult<Vec<ContainerSummary>>;

    /// Remove containers by id
    async fn remove(&self, ids: &[String], force: bool) -> HarnessResult<()>;

    /// Start compose services detached, optionally scaling one of them
    async fn up(&self, services: &[String], scale: Option<ServiceScale>) -> HarnessResult<()>;

    /// Stop compose services, with an optional grace period in seconds
    async fn stop(&self, services: &[String], timeout_secs: Option<u64>) -> HarnessResult<()>;

    /// Captured logs of compose services
    async fn logs(&self, services: &[String], timestamps: bool) -> HarnessResult<String>;

    /// Captured logs of one container
    async fn container_logs(&self, container_id: &str) -> HarnessResult<String>;

    /// Detach a container from a network
    async fn disconnect_from_network(
        &self,
        container_id: &str,
        network: &str,
        force: bool,
    ) -> HarnessResult<()>;

    /// Run a privileged command inside a container
    async fn exec_privileged(&self, container_id: &str, command: &[String]) -> HarnessResult<()>;

    /// Terminate and remove a single container
    async fn remove_container(&self, container_id: &str, force: bool) -> HarnessResult<()>;
}

/// Metadata store shell abstraction
#[mockall::automock]
#[async_trait::async_trait]
pub trait MetadataStore: Send + Sync {
    /// Read one hierarchical path, returning the tool's raw output
    async fn get(&self, path: &str) -> HarnessResult<MetadataOutput>;
}

/// Partition reassignment admin command abstraction
#[mockall::automock]
#[async_trait::async_trait]
pub trait PartitionReassigner: Send + Sync {
    /// Submit a reassignment
    async fn execute(&self, plan: &ReassignmentPlan) -> HarnessResult<()>;

    /// Check that a submitted reassignment completed
    async fn verify(&self, plan: &ReassignmentPlan) -> HarnessResult<()>;
}
