//! Lost Leader Scenario
//!
//! Start a cluster, let the producer produce for a while, take the topic
//! leader out and then read the complete backlog, to see whether the producer
//! stopped getting data into the cluster for a prolonged time.
//!
//! The run walks a fixed sequence of phases. Each phase is announced before
//! its step starts and recorded once the step has succeeded, so the phase
//! trail ends at the last phase actually reached. Every wait is a fixed sleep;
//! no phase waits for a readiness signal. A failure in any phase aborts the
//! run and leaves the containers up for inspection.

use chrono::{DateTime, Utc};
use shared::{ClusterState, PartitionState, logging};
use std::fmt;
use std::io::Write;
use tokio::time::sleep;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::{FaultStrategy, ScenarioConfig};
use crate::error::HarnessResult;
use crate::runtime::{CleanupManager, FaultInjector, HarnessContext, InjectionEvent, TopologyDiscovery};
use crate::traits::ServiceScale;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Clean,
    ClusterStarting,
    ClusterReady,
    ProducerWarmup,
    FaultInjected,
    Dwelling,
    ProducerStopped,
    ConsumerRunning,
    ConsumerDwelling,
    ConsumerStopped,
    LogsCaptured,
}

impl Phase {
    pub const SEQUENCE: [Phase; 11] = [
        Phase::Clean,
        Phase::ClusterStarting,
        Phase::ClusterReady,
        Phase::ProducerWarmup,
        Phase::FaultInjected,
        Phase::Dwelling,
        Phase::ProducerStopped,
        Phase::ConsumerRunning,
        Phase::ConsumerDwelling,
        Phase::ConsumerStopped,
        Phase::LogsCaptured,
    ];

    pub fn next(self) -> Option<Phase> {
        let index = Self::SEQUENCE.iter().position(|p| *p == self)?;
        Self::SEQUENCE.get(index + 1).copied()
    }

    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone)]
pub struct PhaseRecord {
    pub phase: Phase,
    pub at: DateTime<Utc>,
}

/// One partition state reading taken after the fault
#[derive(Debug, Clone)]
pub struct DwellSample {
    pub iteration: u32,
    pub at: DateTime<Utc>,
    pub state: Option<PartitionState>,
}

/// Logs gathered at the end of a run, kept as opaque text
#[derive(Debug, Clone, Default)]
pub struct CapturedLogs {
    pub consumer: String,
    pub producer: String,
    pub follower: Option<String>,
}

impl CapturedLogs {
    /// Write all sections, consumer first
    pub fn write_to<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "===== consumer =====")?;
        out.write_all(self.consumer.as_bytes())?;
        writeln!(out, "===== producer =====")?;
        out.write_all(self.producer.as_bytes())?;
        if let Some(ref follower) = self.follower {
            writeln!(out, "===== follower =====")?;
            out.write_all(follower.as_bytes())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub name: String,
    pub run_id: Uuid,
    pub strategy: FaultStrategy,
    pub cluster: ClusterState,
    pub phases: Vec<PhaseRecord>,
    pub dwell: Vec<DwellSample>,
    pub injections: Vec<InjectionEvent>,
    pub logs: CapturedLogs,
}

impl ScenarioReport {
    pub fn phase_sequence(&self) -> Vec<Phase> {
        self.phases.iter().map(|record| record.phase).collect()
    }
}

pub struct LostLeaderScenario<'a> {
    ctx: &'a HarnessContext,
    config: ScenarioConfig,
    current: Phase,
    phases: Vec<PhaseRecord>,
}

impl<'a> LostLeaderScenario<'a> {
    pub fn new(ctx: &'a HarnessContext, config: ScenarioConfig) -> Self {
        Self {
            ctx,
            config,
            current: Phase::Clean,
            phases: vec![PhaseRecord {
                phase: Phase::Clean,
                at: Utc::now(),
            }],
        }
    }

    /// Last phase whose step succeeded
    pub fn current_phase(&self) -> Phase {
        self.current
    }

    pub fn phases(&self) -> &[PhaseRecord] {
        &self.phases
    }

    /// Announce what the next phase is about to do
    fn announce(&self, action: &str) -> Phase {
        let next = self.current.next().unwrap_or(self.current);
        logging::log_phase(&self.ctx.session.run_id, &next, action);
        next
    }

    /// Record `phase` as reached
    fn reach(&mut self, phase: Phase) {
        self.current = phase;
        self.phases.push(PhaseRecord {
            phase,
            at: Utc::now(),
        });
    }

    fn fleet_scale(&self) -> ServiceScale {
        ServiceScale {
            service: self.ctx.session.broker_service.clone(),
            replicas: self.ctx.session.broker_count,
        }
    }

    /// Start a workload next to the running broker fleet
    async fn start_alongside_fleet(&self, workload: &str) -> HarnessResult<()> {
        let services = vec![self.ctx.session.broker_service.clone(), workload.to_string()];
        self.ctx.containers.up(&services, Some(self.fleet_scale())).await
    }

    /// Run every phase in order
    ///
    /// On failure the scenario keeps the trail of the phases it reached.
    pub async fn run(&mut self) -> HarnessResult<ScenarioReport> {
        self.config.validate()?;

        let ctx = self.ctx;
        let session = &ctx.session;
        let name = self.config.name.clone();
        let timings = self.config.timings.clone();
        let strategy = self.config.effective_fault();
        let producer = self.config.producer.clone();
        let consumer = self.config.consumer.clone();

        info!(
            run_id = %session.run_id,
            "🧪 {}: {} -> {} with {}",
            name, producer, consumer, strategy
        );

        let phase = self.announce(&format!(
            "Start {} and {} {} instances",
            session.coordination_service, session.broker_count, session.broker_service
        ));
        CleanupManager::new(ctx).cleanup_before_test(&name).await?;
        let fleet = vec![
            session.coordination_service.clone(),
            session.broker_service.clone(),
        ];
        ctx.containers.up(&fleet, Some(self.fleet_scale())).await?;
        self.reach(phase);

        let phase = self.announce("Discover controller, leader and in-sync replicas");
        let cluster = TopologyDiscovery::new(ctx, timings.discovery)
            .discover()
            .await?;
        logging::log_observation(&session.run_id, "Cluster", &cluster);
        self.reach(phase);

        let phase = self.announce("Start a producer and let it run for a while");
        self.start_alongside_fleet(&producer).await?;
        sleep(timings.warmup).await;
        self.reach(phase);

        let phase = self.announce(&format!("Take down leader {} using {}", cluster.leader, strategy));
        let mut injector = FaultInjector::new(ctx);
        injector.inject(&strategy, &cluster).await?;
        let injections = injector.get_injection_log().to_vec();
        self.reach(phase);

        let phase = self.announce(&format!(
            "Sleep for {:?} with the leader gone before checking what the producer has produced",
            timings.dwell_total()
        ));
        let dwell = self.dwell(timings.dwell_iterations, timings.dwell_interval).await;
        self.reach(phase);

        let phase = self.announce("Stop the producer");
        ctx.containers
            .stop(&[producer.clone()], Some(timings.producer_stop_timeout.as_secs()))
            .await?;
        self.reach(phase);

        let phase = self.announce("Start the consumer");
        self.start_alongside_fleet(&consumer).await?;
        self.reach(phase);

        let phase = self.announce(&format!(
            "Wait for {:?} for the consumer to consume (it can take even longer)",
            timings.consume_wait
        ));
        sleep(timings.consume_wait).await;
        self.reach(phase);

        let phase = self.announce("Stop the consumer");
        ctx.containers.stop(&[consumer.clone()], None).await?;
        self.reach(phase);

        let phase = self.announce("Logs of what the producer produced and consumer consumed");
        let logs = self.capture_logs(&producer, &consumer, &cluster).await?;
        self.reach(phase);

        info!(run_id = %session.run_id, "🏁 {} reached {}", name, self.current);

        Ok(ScenarioReport {
            name,
            run_id: session.run_id,
            strategy,
            cluster,
            phases: self.phases.clone(),
            dwell,
            injections,
            logs,
        })
    }

    /// Log live partition state at a fixed interval; nothing is asserted
    async fn dwell(&self, iterations: u32, interval: std::time::Duration) -> Vec<DwellSample> {
        let metadata = self.ctx.metadata();
        let mut samples = Vec::with_capacity(iterations as usize);

        for iteration in 1..=iterations {
            let state = match metadata.partition_state().await {
                Ok(state) => state,
                Err(e) => {
                    warn!("⚠️ Could not read partition state: {}", e);
                    None
                }
            };

            match &state {
                Some(state) => logging::log_observation(&self.ctx.session.run_id, "Partition state", state),
                None => info!("📋 Partition state: none"),
            }

            samples.push(DwellSample {
                iteration,
                at: Utc::now(),
                state,
            });
            sleep(interval).await;
        }

        samples
    }

    async fn capture_logs(
        &self,
        producer: &str,
        consumer: &str,
        cluster: &ClusterState,
    ) -> HarnessResult<CapturedLogs> {
        let containers = &self.ctx.containers;

        let consumer_logs = containers.logs(&[consumer.to_string()], true).await?;
        let producer_logs = containers.logs(&[producer.to_string()], true).await?;

        let follower = match cluster.first_follower() {
            Some(node) => {
                info!("# Logs of follower {}", node);
                Some(containers.container_logs(node.container.id()).await?)
            }
            None => None,
        };

        Ok(CapturedLogs {
            consumer: consumer_logs,
            producer: producer_logs,
            follower,
        })
    }
}
