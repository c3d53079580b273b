//! Fault Injection Engine
//!
//! Takes the partition leader out of the cluster with one of four mechanisms.
//! The target is worked out from the discovered [`ClusterState`] before any
//! command runs, so a fault is either applied whole or not at all.

use async_trait::async_trait;
use shared::{BrokerId, ClusterState, ContainerHandle};
use std::fmt;
use tracing::{error, info, warn};

use super::HarnessContext;
use crate::config::{FaultStrategy, SurvivorSelection};
use crate::error::{HarnessError, HarnessResult};
use crate::traits::ReassignmentPlan;

/// What a fault acts on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaultTarget {
    /// The leader's container
    Container(ContainerHandle),
    /// Brokers that keep the partition after the leader is dropped
    Survivors(Vec<BrokerId>),
}

impl fmt::Display for FaultTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultTarget::Container(handle) => write!(f, "container {}", handle),
            FaultTarget::Survivors(ids) => write!(f, "survivors {:?}", ids),
        }
    }
}

/// One leader-loss mechanism
#[async_trait]
pub trait LeaderFault: Send + Sync {
    fn name(&self) -> &'static str;

    async fn apply(&self, target: &FaultTarget, ctx: &HarnessContext) -> HarnessResult<()>;
}

fn expect_container<'t>(fault: &dyn LeaderFault, target: &'t FaultTarget) -> HarnessResult<&'t ContainerHandle> {
    match target {
        FaultTarget::Container(handle) => Ok(handle),
        other => Err(HarnessError::fault(fault.name(), format!("cannot target {}", other))),
    }
}

/// Bring the primary interface down from inside the container
pub struct InterfaceDown;

#[async_trait]
impl LeaderFault for InterfaceDown {
    fn name(&self) -> &'static str {
        "ifdown"
    }

    async fn apply(&self, target: &FaultTarget, ctx: &HarnessContext) -> HarnessResult<()> {
        let handle = expect_container(self, target)?;
        let interface = &ctx.session.interface;
        info!("# Bring down {} on {}", interface, handle);

        let command = vec!["ifconfig".to_string(), interface.clone(), "down".to_string()];
        ctx.containers
            .exec_privileged(handle.id(), &command)
            .await
            .map_err(|e| HarnessError::fault(self.name(), e))
    }
}

/// Detach the container from the project network
pub struct NetworkDisconnect;

#[async_trait]
impl LeaderFault for NetworkDisconnect {
    fn name(&self) -> &'static str {
        "disconnect"
    }

    async fn apply(&self, target: &FaultTarget, ctx: &HarnessContext) -> HarnessResult<()> {
        let handle = expect_container(self, target)?;
        let network = ctx.session.network_name();
        info!("# Disconnect {} from network {}", handle, network);

        ctx.containers
            .disconnect_from_network(handle.id(), &network, true)
            .await
            .map_err(|e| HarnessError::fault(self.name(), e))
    }
}

/// Kill and remove the container without a graceful shutdown
pub struct ForcedRemoval;

#[async_trait]
impl LeaderFault for ForcedRemoval {
    fn name(&self) -> &'static str {
        "kill"
    }

    async fn apply(&self, target: &FaultTarget, ctx: &HarnessContext) -> HarnessResult<()> {
        let handle = expect_container(self, target)?;
        info!("# Kill -9 {}", handle);

        ctx.containers
            .remove_container(handle.id(), true)
            .await
            .map_err(|e| HarnessError::fault(self.name(), e))
    }
}

/// Reassign the partition to the survivors, leaving the leader process alive
pub struct ReplicaSetShrink;

impl ReplicaSetShrink {
    /// The stored assignment must match the survivors once verify passed
    async fn confirm_assignment(&self, survivors: &[BrokerId], ctx: &HarnessContext) -> HarnessResult<()> {
        let partition = ctx.session.partition;

        let Some(assignment) = ctx.metadata().topic_assignment().await? else {
            warn!("⚠️ No assignment published for {}, skipping confirmation", ctx.session.topic);
            return Ok(());
        };

        let mut assigned = assignment.replicas(partition).unwrap_or_default().to_vec();
        let mut expected = survivors.to_vec();
        assigned.sort();
        expected.sort();

        if assigned != expected {
            return Err(HarnessError::fault(
                self.name(),
                format!("replicas are {:?} after verify, expected {:?}", assigned, expected),
            ));
        }

        info!("📋 Replicas of {}-{} are now {:?}", ctx.session.topic, partition, assigned);
        Ok(())
    }
}

#[async_trait]
impl LeaderFault for ReplicaSetShrink {
    fn name(&self) -> &'static str {
        "change_isr"
    }

    async fn apply(&self, target: &FaultTarget, ctx: &HarnessContext) -> HarnessResult<()> {
        let survivors = match target {
            FaultTarget::Survivors(ids) => ids,
            other => {
                return Err(HarnessError::fault(self.name(), format!("cannot target {}", other)));
            }
        };

        let plan = ReassignmentPlan::single(&ctx.session.topic, ctx.session.partition, survivors.clone());
        info!("# Reassigning partitions using: {}", plan.to_json()?);

        ctx.reassigner
            .execute(&plan)
            .await
            .map_err(|e| HarnessError::fault(self.name(), e))?;
        ctx.reassigner
            .verify(&plan)
            .await
            .map_err(|e| HarnessError::fault(self.name(), e))?;

        self.confirm_assignment(survivors, ctx).await
    }
}

/// Implementation behind a configured strategy
pub fn fault_for(strategy: &FaultStrategy) -> Box<dyn LeaderFault> {
    match strategy {
        FaultStrategy::InterfaceDown => Box::new(InterfaceDown),
        FaultStrategy::NetworkDisconnect => Box::new(NetworkDisconnect),
        FaultStrategy::ForcedRemoval => Box::new(ForcedRemoval),
        FaultStrategy::ReplicaSetShrink(_) => Box::new(ReplicaSetShrink),
    }
}

/// Work out what a strategy acts on in this cluster
pub fn resolve_target(strategy: &FaultStrategy, state: &ClusterState) -> HarnessResult<FaultTarget> {
    let leader = state.leader.broker_id;

    let survivors = match strategy {
        FaultStrategy::InterfaceDown | FaultStrategy::NetworkDisconnect | FaultStrategy::ForcedRemoval => {
            return Ok(FaultTarget::Container(state.leader.container.clone()));
        }
        FaultStrategy::ReplicaSetShrink(SurvivorSelection::FirstFollower) => {
            state.first_follower().map(|n| vec![n.broker_id]).unwrap_or_default()
        }
        FaultStrategy::ReplicaSetShrink(SurvivorSelection::AllFollowers) => state.follower_ids(),
        FaultStrategy::ReplicaSetShrink(SurvivorSelection::Explicit(ids)) => ids.clone(),
    };

    if survivors.is_empty() || survivors.contains(&leader) {
        return Err(HarnessError::InvalidSurvivors { leader, survivors });
    }
    Ok(FaultTarget::Survivors(survivors))
}

#[derive(Debug, Clone)]
pub struct InjectionEvent {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub fault_type: String,
    pub target: String,
    pub success: bool,
    pub details: String,
}

/// Applies at most one fault per run
pub struct FaultInjector<'a> {
    ctx: &'a HarnessContext,
    injected: Option<FaultStrategy>,
    injection_log: Vec<InjectionEvent>,
}

impl<'a> FaultInjector<'a> {
    pub fn new(ctx: &'a HarnessContext) -> Self {
        Self {
            ctx,
            injected: None,
            injection_log: Vec::new(),
        }
    }

    /// Take the leader out with `strategy`
    ///
    /// A second call on the same injector is refused without touching the
    /// cluster.
    pub async fn inject(&mut self, strategy: &FaultStrategy, state: &ClusterState) -> HarnessResult<()> {
        if let Some(previous) = &self.injected {
            return Err(HarnessError::FaultAlreadyInjected {
                strategy: previous.to_string(),
            });
        }

        let target = resolve_target(strategy, state)?;
        let fault = fault_for(strategy);
        self.injected = Some(strategy.clone());

        info!("💉 Injecting {} on {} (leader {})", strategy, target, state.leader);
        match fault.apply(&target, self.ctx).await {
            Ok(()) => {
                self.log_injection(fault.name(), &target, true, "applied");
                info!("✅ {} applied", strategy);
                Ok(())
            }
            Err(e) => {
                self.log_injection(fault.name(), &target, false, &e.to_string());
                error!("❌ {} failed: {}", strategy, e);
                Err(e)
            }
        }
    }

    pub fn injected(&self) -> Option<&FaultStrategy> {
        self.injected.as_ref()
    }

    /// Log fault injection event
    fn log_injection(&mut self, fault_type: &str, target: &FaultTarget, success: bool, details: &str) {
        let event = InjectionEvent {
            timestamp: chrono::Utc::now(),
            fault_type: fault_type.to_string(),
            target: target.to_string(),
            success,
            details: details.to_string(),
        };

        self.injection_log.push(event);
    }

    /// Get injection log for analysis
    pub fn get_injection_log(&self) -> &[InjectionEvent] {
        &self.injection_log
    }
}
