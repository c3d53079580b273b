//! Scenario Configuration
//!
//! Parameters of one lost-leader run: which workloads to run, how to take the
//! leader down and how long to wait between phases.

use shared::{SharedError, SharedResult};
use std::time::Duration;

use super::fault::FaultStrategy;
use crate::runtime::RetryPolicy;

/// Phase durations; every wait in a scenario is one of these
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timings {
    /// Poll bound while waiting for the in-sync replica set to form
    pub discovery: RetryPolicy,
    /// Producer runtime before the fault
    pub warmup: Duration,
    /// Number of state samples logged after the fault
    pub dwell_iterations: u32,
    /// Gap between state samples
    pub dwell_interval: Duration,
    /// Grace period given to the producer on stop
    pub producer_stop_timeout: Duration,
    /// Time the consumer gets to read the backlog
    pub consume_wait: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            discovery: RetryPolicy::default(),
            warmup: Duration::from_secs(10),
            dwell_iterations: 20,
            dwell_interval: Duration::from_secs(2),
            producer_stop_timeout: Duration::from_secs(1),
            consume_wait: Duration::from_secs(180),
        }
    }
}

impl Timings {
    /// No waiting at all; discovery still gets `discovery_attempts` polls
    pub fn immediate(discovery_attempts: u32) -> Self {
        Self {
            discovery: RetryPolicy::new(discovery_attempts, Duration::ZERO),
            warmup: Duration::ZERO,
            dwell_iterations: 1,
            dwell_interval: Duration::ZERO,
            producer_stop_timeout: Duration::from_secs(1),
            consume_wait: Duration::ZERO,
        }
    }

    pub fn dwell_total(&self) -> Duration {
        self.dwell_interval * self.dwell_iterations
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioConfig {
    pub name: String,
    pub producer: String,
    pub consumer: String,
    pub fault: Option<FaultStrategy>,
    pub timings: Timings,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            name: "lost_leader".to_string(),
            producer: "producer_java".to_string(),
            consumer: "consumer_java".to_string(),
            fault: None,
            timings: Timings::default(),
        }
    }
}

impl ScenarioConfig {
    /// Create a new builder
    pub fn builder() -> crate::config::builder::ScenarioConfigBuilder {
        crate::config::builder::ScenarioConfigBuilder::new()
    }

    /// The strategy that will actually be applied
    pub fn effective_fault(&self) -> FaultStrategy {
        self.fault
            .clone()
            .unwrap_or_else(FaultStrategy::control_plane_default)
    }

    /// Reject configurations a run cannot carry out
    ///
    /// Producer and consumer must be distinct, non-empty services and
    /// discovery needs at least one poll.
    pub fn validate(&self) -> SharedResult<()> {
        let invalid = |field: &str, value: &str| SharedError::InvalidConfig {
            field: field.to_string(),
            value: value.to_string(),
        };

        if self.producer.is_empty() {
            return Err(invalid("producer", ""));
        }
        if self.consumer.is_empty() || self.consumer == self.producer {
            return Err(invalid("consumer", self.consumer.as_str()));
        }
        if self.timings.discovery.max_attempts == 0 {
            return Err(invalid("discovery_attempts", "0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SurvivorSelection;
    use assert_matches::assert_matches;

    #[test]
    fn test_absent_fault_means_reassignment() {
        let config = ScenarioConfig::default();
        assert_eq!(
            config.effective_fault(),
            FaultStrategy::ReplicaSetShrink(SurvivorSelection::FirstFollower)
        );
    }

    #[test]
    fn test_default_timings() {
        let timings = Timings::default();
        assert_eq!(timings.dwell_total(), Duration::from_secs(40));
        assert_eq!(timings.consume_wait, Duration::from_secs(180));
        assert_eq!(timings.discovery.max_attempts, 20);
    }

    #[test]
    fn test_validation() {
        assert!(ScenarioConfig::default().validate().is_ok());

        let same = ScenarioConfig {
            consumer: "producer_java".to_string(),
            ..ScenarioConfig::default()
        };
        assert_matches!(
            same.validate(),
            Err(SharedError::InvalidConfig { field, .. }) if field == "consumer"
        );

        let no_polls = ScenarioConfig {
            timings: Timings::immediate(0),
            ..ScenarioConfig::default()
        };
        assert_matches!(
            no_polls.validate(),
            Err(SharedError::InvalidConfig { field, .. }) if field == "discovery_attempts"
        );
    }
}
