//! Test helpers and builder patterns for harness tests
//!
//! Wraps the three collaborator mocks in a [`HarnessContext`] so each test
//! only spells out the expectations it cares about.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::fixtures::TestFixtures;
use tester::traits::{MockContainerOrchestrator, MockMetadataStore, MockPartitionReassigner};
use tester::{HarnessContext, HarnessSession, ScenarioConfig, Timings};

/// Builder for a context backed by mocks
pub struct ContextBuilder {
    session: HarnessSession,
    containers: MockContainerOrchestrator,
    store: MockMetadataStore,
    reassigner: MockPartitionReassigner,
}

impl ContextBuilder {
    /// Mocks without expectations; any unexpected call panics
    pub fn new() -> Self {
        Self {
            session: HarnessSession::default(),
            containers: MockContainerOrchestrator::new(),
            store: MockMetadataStore::new(),
            reassigner: MockPartitionReassigner::new(),
        }
    }

    /// Serve the three-broker cluster from [`TestFixtures::cluster_store`]
    pub fn with_cluster(mut self, isr_grows_after: u32, reassigned: &'static [i32]) -> Self {
        self.store
            .expect_get()
            .returning(TestFixtures::cluster_store(isr_grows_after, reassigned));
        self
    }

    pub fn with_containers<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut MockContainerOrchestrator),
    {
        setup(&mut self.containers);
        self
    }

    pub fn with_store<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut MockMetadataStore),
    {
        setup(&mut self.store);
        self
    }

    pub fn with_reassigner<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut MockPartitionReassigner),
    {
        setup(&mut self.reassigner);
        self
    }

    pub fn build(self) -> HarnessContext {
        HarnessContext::new(
            self.session,
            Arc::new(self.containers),
            Arc::new(self.store),
            Arc::new(self.reassigner),
        )
    }
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Compose calls seen by the container mock, in order
pub type CallLog = Arc<Mutex<Vec<String>>>;

/// Expectations for a run that gets all the way to log capture
///
/// Every lifecycle call is appended to the returned log as a short string,
/// e.g. `up zookeeper,kafka scale=3`.
pub fn lifecycle_containers(containers: &mut MockContainerOrchestrator) -> CallLog {
    let calls: CallLog = Arc::new(Mutex::new(Vec::new()));

    containers
        .expect_list_containers()
        .returning(|_, include_stopped| {
            if include_stopped {
                Ok(vec![TestFixtures::fleet()[0].clone()])
            } else {
                Ok(TestFixtures::fleet())
            }
        });

    let log = calls.clone();
    containers.expect_remove().returning(move |ids, _| {
        log.lock().unwrap().push(format!("rm {}", ids.len()));
        Ok(())
    });

    let log = calls.clone();
    containers.expect_up().returning(move |services, scale| {
        let scale = scale.map(|s| format!(" scale={}", s.replicas)).unwrap_or_default();
        log.lock().unwrap().push(format!("up {}{}", services.join(","), scale));
        Ok(())
    });

    let log = calls.clone();
    containers.expect_stop().returning(move |services, timeout| {
        log.lock().unwrap().push(format!("stop {} {:?}", services.join(","), timeout));
        Ok(())
    });

    let log = calls.clone();
    containers.expect_logs().returning(move |services, timestamps| {
        log.lock().unwrap().push(format!("logs {} {}", services.join(","), timestamps));
        Ok(format!("{} output\n", services.join(",")))
    });

    let log = calls.clone();
    containers.expect_container_logs().returning(move |id| {
        log.lock().unwrap().push(format!("container_logs {}", &id[..1]));
        Ok("follower output\n".to_string())
    });

    calls
}

/// A scenario that does not wait between phases
pub fn quick_config(name: &str, producer: &str) -> ScenarioConfig {
    ScenarioConfig::builder()
        .name(name)
        .producer(producer)
        .consumer("consumer_java")
        .timings(Timings::immediate(10))
        .dwell(3, Duration::ZERO)
        .build()
}
