//! Kafka Leader-Loss Test Harness
//!
//! Drives a containerized Kafka cluster through a leader-loss scenario: start
//! the cluster, find the partition leader, take it out with one fault, and
//! collect producer and consumer logs for offline analysis.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tester::*;
//!
//! # async fn run() -> HarnessResult<()> {
//! let ctx = HarnessContext::from_session(HarnessSession::default());
//! let config = ScenarioConfig::builder()
//!     .name("lost_leader_producer_java_kill")
//!     .producer("producer_java")
//!     .consumer("consumer_java")
//!     .fault(Some(FaultStrategy::ForcedRemoval))
//!     .build();
//!
//! let report = LostLeaderScenario::new(&ctx, config).run().await?;
//! report.logs.write_to(&mut std::io::stdout())?;
//! # Ok(())
//! # }
//! ```

// Core modules
pub mod config;
pub mod error;
pub mod runtime;
pub mod scenarios;
pub mod services;
pub mod traits;

// Main interfaces - re-exported at crate root for convenience
pub use config::{FaultStrategy, HarnessSession, ScenarioConfig, ScenarioConfigBuilder, SurvivorSelection, Timings};
pub use error::{HarnessError, HarnessResult};
pub use runtime::{
    CleanupManager, ContainerRegistry, FaultInjector, HarnessContext, MetadataClient, PollOutcome, RetryPolicy,
    TopologyDiscovery,
};
pub use scenarios::{LostLeaderScenario, Phase, ScenarioReport, TestScenarios};
