//! Container Registry
//!
//! Joins broker identities with the containers serving them. A broker
//! publishes its host port in its registration; each broker container exposes
//! exactly that port as its first published mapping.

use shared::{BrokerId, ClusterNode, ContainerHandle};
use tracing::debug;

use super::HarnessContext;
use crate::error::{HarnessError, HarnessResult};
use crate::traits::ContainerSummary;

/// Pick the single container whose first published port is `port`
///
/// Containers without a published first port (the coordination service,
/// workloads) are skipped.
pub fn match_port(
    broker: BrokerId,
    port: u16,
    containers: &[ContainerSummary],
) -> HarnessResult<ContainerHandle> {
    let matches: Vec<&ContainerSummary> = containers
        .iter()
        .filter(|container| container.public_port() == Some(port))
        .collect();

    match matches.as_slice() {
        [only] => Ok(ContainerHandle::new(only.id.clone())),
        _ => Err(HarnessError::ResolutionAmbiguous {
            broker,
            port,
            matches: matches.len(),
        }),
    }
}

pub struct ContainerRegistry<'a> {
    ctx: &'a HarnessContext,
}

impl<'a> ContainerRegistry<'a> {
    pub fn new(ctx: &'a HarnessContext) -> Self {
        Self { ctx }
    }

    /// Resolve a broker to the running container serving it
    pub async fn resolve(&self, broker: BrokerId) -> HarnessResult<ContainerHandle> {
        let registration = self.ctx.metadata().broker_registration(broker).await?;

        let containers = self
            .ctx
            .containers
            .list_containers(&self.ctx.session.project_filter(), false)
            .await?;

        let handle = match_port(broker, registration.port, &containers)?;
        debug!("🎯 Broker {} on port {} is container {}", broker, registration.port, handle);
        Ok(handle)
    }

    pub async fn resolve_node(&self, broker: BrokerId) -> HarnessResult<ClusterNode> {
        Ok(ClusterNode::new(broker, self.resolve(broker).await?))
    }
}
