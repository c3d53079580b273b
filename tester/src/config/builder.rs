//! Scenario Configuration Builder
//!
//! Provides a flexible builder pattern for constructing scenario configurations

use super::fault::{FaultStrategy, SurvivorSelection};
use super::scenario::{ScenarioConfig, Timings};
use crate::runtime::RetryPolicy;
use shared::BrokerId;
use std::time::Duration;

pub struct ScenarioConfigBuilder {
    config: ScenarioConfig,
}

impl ScenarioConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ScenarioConfig::default(),
        }
    }

    /// Set scenario name
    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.config.name = name.into();
        self
    }

    /// Set producer compose service
    pub fn producer<S: Into<String>>(mut self, producer: S) -> Self {
        self.config.producer = producer.into();
        self
    }

    /// Set consumer compose service
    pub fn consumer<S: Into<String>>(mut self, consumer: S) -> Self {
        self.config.consumer = consumer.into();
        self
    }

    /// Set fault strategy (None for the reassignment path)
    pub fn fault(mut self, fault: Option<FaultStrategy>) -> Self {
        self.config.fault = fault;
        self
    }

    /// Shrink the replica set to a fixed list of brokers
    pub fn shrink_to(self, survivors: &[i32]) -> Self {
        let ids = survivors.iter().copied().map(BrokerId).collect();
        self.fault(Some(FaultStrategy::ReplicaSetShrink(SurvivorSelection::Explicit(ids))))
    }

    /// Replace all timings
    pub fn timings(mut self, timings: Timings) -> Self {
        self.config.timings = timings;
        self
    }

    /// Set discovery poll bound
    pub fn discovery(mut self, attempts: u32, interval: Duration) -> Self {
        self.config.timings.discovery = RetryPolicy::new(attempts, interval);
        self
    }

    /// Set producer warm-up
    pub fn warmup(mut self, warmup: Duration) -> Self {
        self.config.timings.warmup = warmup;
        self
    }

    /// Set dwell sampling
    pub fn dwell(mut self, iterations: u32, interval: Duration) -> Self {
        self.config.timings.dwell_iterations = iterations;
        self.config.timings.dwell_interval = interval;
        self
    }

    /// Set consumer catch-up wait
    pub fn consume_wait(mut self, wait: Duration) -> Self {
        self.config.timings.consume_wait = wait;
        self
    }

    /// Build the configuration
    pub fn build(self) -> ScenarioConfig {
        self.config
    }
}

impl Default for ScenarioConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_fields() {
        let config = ScenarioConfig::builder()
            .name("lost_leader_producer_librdkafka_kill")
            .producer("producer_librdkafka")
            .consumer("consumer_java")
            .fault(Some(FaultStrategy::ForcedRemoval))
            .warmup(Duration::from_secs(5))
            .dwell(3, Duration::from_millis(10))
            .build();

        assert_eq!(config.producer, "producer_librdkafka");
        assert_eq!(config.fault, Some(FaultStrategy::ForcedRemoval));
        assert_eq!(config.timings.warmup, Duration::from_secs(5));
        assert_eq!(config.timings.dwell_iterations, 3);
    }

    #[test]
    fn test_shrink_to() {
        let config = ScenarioConfig::builder().shrink_to(&[2, 3]).build();
        assert_eq!(
            config.fault,
            Some(FaultStrategy::ReplicaSetShrink(SurvivorSelection::Explicit(vec![
                BrokerId(2),
                BrokerId(3)
            ])))
        );
    }
}
