//! Topology Discovery
//!
//! Waits for the test partition's in-sync replica set to grow past the leader,
//! then resolves controller, leader and followers to containers.

use shared::{ClusterNode, ClusterState, PartitionState};
use tracing::{info, warn};

use super::retry::{PollOutcome, RetryPolicy};
use super::HarnessContext;
use crate::error::{HarnessError, HarnessResult};

/// The leader must not double as a follower, by id or by container
pub fn check_consistency(leader: &ClusterNode, followers: &[ClusterNode]) -> HarnessResult<()> {
    let clash = followers
        .iter()
        .any(|f| f.broker_id == leader.broker_id || f.container == leader.container);

    if clash {
        return Err(HarnessError::ConsistencyViolation {
            leader: leader.broker_id,
        });
    }
    Ok(())
}

pub struct TopologyDiscovery<'a> {
    ctx: &'a HarnessContext,
    policy: RetryPolicy,
}

impl<'a> TopologyDiscovery<'a> {
    pub fn new(ctx: &'a HarnessContext, policy: RetryPolicy) -> Self {
        Self { ctx, policy }
    }

    /// Poll the partition state until quorum forms or the bound runs out
    pub async fn wait_for_quorum(&self) -> HarnessResult<PollOutcome<PartitionState>> {
        let metadata = self.ctx.metadata();
        let metadata = &metadata;

        self.policy
            .poll(move |_| metadata.partition_state(), PartitionState::has_quorum)
            .await
    }

    /// Discover the cluster topology for the session's partition
    ///
    /// Running out of polls is not fatal; discovery goes on with the last
    /// observed state and lets the resolution and consistency checks decide.
    pub async fn discover(&self) -> HarnessResult<ClusterState> {
        let session = &self.ctx.session;
        info!(
            "# Wait for the cluster to start (up to {} polls every {:?})",
            self.policy.max_attempts, self.policy.interval
        );

        let outcome = self.wait_for_quorum().await?;
        match &outcome {
            PollOutcome::Converged { value, attempts } => {
                info!("📋 {} after {} polls", value, attempts);
            }
            PollOutcome::Exhausted { last: Some(value), attempts } => {
                warn!("⏰ No quorum after {} polls, continuing with {}", attempts, value);
            }
            PollOutcome::Exhausted { last: None, attempts } => {
                warn!("⏰ No partition state published after {} polls", attempts);
            }
        }

        let state = outcome
            .into_value()
            .ok_or_else(|| HarnessError::PartitionStateUnavailable {
                topic: session.topic.clone(),
                partition: session.partition,
            })?;

        if !state.isr.contains(&state.leader) {
            warn!("⚠️ Leader {} is missing from its own isr {:?}", state.leader, state.isr);
        }

        let registry = self.ctx.registry();

        let controller = self.ctx.metadata().controller().await?;
        let controller = registry.resolve_node(controller.broker_id).await?;
        info!("# Kafka cluster has controller {}", controller);

        let leader = registry.resolve_node(state.leader).await?;
        let mut followers = Vec::new();
        for broker in state.followers() {
            followers.push(registry.resolve_node(broker).await?);
        }

        let cluster = ClusterState {
            controller,
            leader,
            followers,
            in_sync_replicas: state.isr.iter().copied().collect(),
        };
        info!(
            "# Topic {} has leader: {} and isr(s): {:?}",
            session.topic,
            cluster.leader,
            cluster.followers.iter().map(|n| n.to_string()).collect::<Vec<_>>()
        );

        check_consistency(&cluster.leader, &cluster.followers)?;
        Ok(cluster)
    }
}
