//! Test Scenarios
//!
//! The lost-leader matrix: every producer client against every fault, read
//! back by the same consumer.

pub mod lost_leader;

pub use lost_leader::{CapturedLogs, DwellSample, LostLeaderScenario, Phase, PhaseRecord, ScenarioReport};

use tracing::{error, info};

use crate::config::{FaultStrategy, ScenarioConfig, Timings};
use crate::error::{HarnessError, HarnessResult};
use crate::runtime::HarnessContext;

pub const PRODUCERS: [&str; 2] = ["producer_librdkafka", "producer_java"];
pub const CONSUMER: &str = "consumer_java";

pub const FAULTS: [&str; 4] = ["ifdown", "disconnect", "kill", "change_isr"];

/// Suites and the producer they are restricted to
const SUITES: [(&str, Option<&str>); 3] = [
    ("librdkafka", Some("producer_librdkafka")),
    ("java", Some("producer_java")),
    ("all", None),
];

pub struct TestScenarios {
    timings: Timings,
}

impl TestScenarios {
    pub fn new(timings: Timings) -> Self {
        Self { timings }
    }

    /// Configuration of a single named scenario
    pub fn config_for(&self, name: &str) -> Option<ScenarioConfig> {
        PRODUCERS.iter().find_map(|producer| {
            let fault = name
                .strip_prefix("lost_leader_")?
                .strip_prefix(producer)?
                .strip_prefix('_')?;
            if !FAULTS.contains(&fault) {
                return None;
            }
            let fault: FaultStrategy = fault.parse().ok()?;

            Some(
                ScenarioConfig::builder()
                    .name(name)
                    .producer(*producer)
                    .consumer(CONSUMER)
                    .fault(Some(fault))
                    .timings(self.timings.clone())
                    .build(),
            )
        })
    }

    /// Scenario names a suite or single name expands to
    pub fn expand(&self, name: &str) -> HarnessResult<Vec<String>> {
        if let Some((_, only)) = SUITES.iter().find(|(suite, _)| *suite == name) {
            return Ok(Self::single_scenarios()
                .into_iter()
                .filter(|scenario| only.is_none_or(|producer| scenario.contains(producer)))
                .collect());
        }

        if self.config_for(name).is_some() {
            return Ok(vec![name.to_string()]);
        }

        Err(HarnessError::UnknownScenario {
            name: name.to_string(),
            available: Self::available_scenarios().join(", "),
        })
    }

    /// Run a specific scenario or suite by name
    ///
    /// Scenarios of a suite run one after another, each under its own run
    /// id; the first failure stops the suite and leaves that run's
    /// containers in place.
    pub async fn run_scenario(&self, name: &str, ctx: &HarnessContext) -> HarnessResult<Vec<ScenarioReport>> {
        let names = self.expand(name)?;
        if names.len() > 1 {
            info!("🧪 Running suite '{}' ({} scenarios)", name, names.len());
        }

        let mut reports = Vec::with_capacity(names.len());
        for (index, scenario) in names.iter().enumerate() {
            let config = self.config_for(scenario).ok_or_else(|| HarnessError::UnknownScenario {
                name: scenario.clone(),
                available: Self::available_scenarios().join(", "),
            })?;

            let run_ctx = if index == 0 { ctx.clone() } else { ctx.for_new_run() };
            let mut run = LostLeaderScenario::new(&run_ctx, config);
            match run.run().await {
                Ok(report) => reports.push(report),
                Err(e) => {
                    error!(run_id = %run_ctx.session.run_id, "❌ {} stopped after {}: {}", scenario, run.current_phase(), e);
                    return Err(e);
                }
            }
        }

        if names.len() > 1 {
            info!("🏆 Suite '{}' completed", name);
        }
        Ok(reports)
    }

    fn single_scenarios() -> Vec<String> {
        PRODUCERS
            .iter()
            .flat_map(|producer| FAULTS.iter().map(move |fault| format!("lost_leader_{producer}_{fault}")))
            .collect()
    }

    /// Get list of available scenarios
    pub fn available_scenarios() -> Vec<String> {
        let mut names = Self::single_scenarios();
        names.extend(SUITES.iter().map(|(suite, _)| suite.to_string()));
        names
    }
}

impl Default for TestScenarios {
    fn default() -> Self {
        Self::new(Timings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SurvivorSelection;
    use assert_matches::assert_matches;

    #[test]
    fn test_catalog_has_eight_runs_and_three_suites() {
        let names = TestScenarios::available_scenarios();
        assert_eq!(names.len(), 11);
        assert_eq!(names[0], "lost_leader_producer_librdkafka_ifdown");
        assert_eq!(names[7], "lost_leader_producer_java_change_isr");
        assert_eq!(&names[8..], ["librdkafka", "java", "all"]);
    }

    #[test]
    fn test_config_for_single_scenario() {
        let catalog = TestScenarios::default();
        let config = catalog.config_for("lost_leader_producer_java_disconnect").unwrap();

        assert_eq!(config.producer, "producer_java");
        assert_eq!(config.consumer, "consumer_java");
        assert_eq!(config.fault, Some(FaultStrategy::NetworkDisconnect));
    }

    #[test]
    fn test_change_isr_keeps_first_follower() {
        let catalog = TestScenarios::default();
        let config = catalog.config_for("lost_leader_producer_librdkafka_change_isr").unwrap();
        assert_eq!(
            config.effective_fault(),
            FaultStrategy::ReplicaSetShrink(SurvivorSelection::FirstFollower)
        );
    }

    #[test]
    fn test_suites_expand_by_producer() {
        let catalog = TestScenarios::default();

        let java = catalog.expand("java").unwrap();
        assert_eq!(java.len(), 4);
        assert!(java.iter().all(|name| name.starts_with("lost_leader_producer_java_")));

        assert_eq!(catalog.expand("all").unwrap().len(), 8);
        assert_eq!(
            catalog.expand("lost_leader_producer_java_kill").unwrap(),
            vec!["lost_leader_producer_java_kill".to_string()]
        );
    }

    #[test]
    fn test_unknown_scenario() {
        let catalog = TestScenarios::default();
        assert!(catalog.config_for("lost_leader_producer_go_kill").is_none());
        assert!(catalog.config_for("lost_leader_producer_java_reboot").is_none());
        assert_matches!(
            catalog.expand("basic"),
            Err(HarnessError::UnknownScenario { name, .. }) if name == "basic"
        );
    }
}
