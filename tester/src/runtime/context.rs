//! Harness Context
//!
//! One session plus the external tools it talks to. Every component borrows
//! the context instead of reaching for process-wide state, so two contexts
//! with different project names never see each other's containers.

use std::sync::Arc;
use uuid::Uuid;

use super::{ContainerRegistry, MetadataClient};
use crate::config::HarnessSession;
use crate::services::{DockerCli, KafkaReassignTool, ZooKeeperShell};
use crate::traits::{ContainerOrchestrator, MetadataStore, PartitionReassigner};

#[derive(Clone)]
pub struct HarnessContext {
    pub session: HarnessSession,
    pub containers: Arc<dyn ContainerOrchestrator>,
    pub store: Arc<dyn MetadataStore>,
    pub reassigner: Arc<dyn PartitionReassigner>,
}

impl HarnessContext {
    pub fn new(
        session: HarnessSession,
        containers: Arc<dyn ContainerOrchestrator>,
        store: Arc<dyn MetadataStore>,
        reassigner: Arc<dyn PartitionReassigner>,
    ) -> Self {
        Self {
            session,
            containers,
            store,
            reassigner,
        }
    }

    /// Context backed by the real docker and Kafka command line tools
    pub fn from_session(session: HarnessSession) -> Self {
        let containers = Arc::new(DockerCli::new(&session));
        let store = Arc::new(ZooKeeperShell::new(&session));
        let reassigner = Arc::new(KafkaReassignTool::new(&session));
        Self::new(session, containers, store, reassigner)
    }

    /// Same collaborators under a fresh run id
    pub fn for_new_run(&self) -> Self {
        let mut next = self.clone();
        next.session.run_id = Uuid::new_v4();
        next
    }

    pub fn metadata(&self) -> MetadataClient<'_> {
        MetadataClient::new(self)
    }

    pub fn registry(&self) -> ContainerRegistry<'_> {
        ContainerRegistry::new(self)
    }
}

impl std::fmt::Debug for HarnessContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HarnessContext")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
