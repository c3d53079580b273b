//! Test fixtures and data for harness tests
//!
//! Canned metadata shell output and `docker ps` lines for a three-broker
//! project where broker `n` publishes host port `32769 + n`.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use tester::traits::{ContainerSummary, MetadataOutput};

/// Standard test data and fixtures
pub struct TestFixtures;

impl TestFixtures {
    pub const PROJECT: &'static str = "kafkanetworkfailuretests";
    pub const STATE_PATH: &'static str = "/brokers/topics/test-topic/partitions/0/state";
    pub const TOPIC_PATH: &'static str = "/brokers/topics/test-topic";

    /// Lines the ZooKeeper shell prints around every value
    pub const SHELL_NOISE: &'static str = "Connecting to localhost:2181\n\nWATCHER::\n\nWatchedEvent state:SyncConnected type:None path:null\n";

    pub fn broker_port(broker: i32) -> u16 {
        32769 + broker as u16
    }

    pub fn container_id(broker: i32) -> String {
        format!("{broker}a1b2c3d4e5f6a7b8c9d0e1f2a3b4c5d6e7f8a9b0c1d2e3f4a5b6c7d8e9f0a1b2")
    }

    pub fn shell_reply(json: &str) -> MetadataOutput {
        MetadataOutput {
            command: "kafka-run-class.sh kafka.tools.ZooKeeperMainWrapper -server localhost:2181 get".to_string(),
            stdout: format!("{}{}\ncZxid = 0x10000001c\n", Self::SHELL_NOISE, json),
            stderr: String::new(),
            success: true,
        }
    }

    pub fn empty_reply() -> MetadataOutput {
        Self::shell_reply("")
    }

    pub fn partition_state(leader: i32, isr: &[i32]) -> String {
        let isr: Vec<String> = isr.iter().map(|id| id.to_string()).collect();
        format!(
            r#"{{"controller_epoch":1,"leader":{leader},"version":1,"leader_epoch":0,"isr":[{}]}}"#,
            isr.join(",")
        )
    }

    pub fn controller(broker: i32) -> String {
        format!(r#"{{"version":1,"brokerid":{broker},"timestamp":"1497346867341"}}"#)
    }

    pub fn registration(broker: i32) -> String {
        let port = Self::broker_port(broker);
        format!(
            r#"{{"jmx_port":-1,"timestamp":"1497346867410","endpoints":["PLAINTEXT://localhost:{port}"],"host":"localhost","version":2,"port":{port}}}"#
        )
    }

    pub fn assignment(replicas: &[i32]) -> String {
        let replicas: Vec<String> = replicas.iter().map(|id| id.to_string()).collect();
        format!(r#"{{"version":1,"partitions":{{"0":[{}]}}}}"#, replicas.join(","))
    }

    fn container(id: String, name: &str, ports: String) -> ContainerSummary {
        ContainerSummary {
            id,
            names: format!("{}_{}", Self::PROJECT, name),
            ports,
        }
    }

    /// Running containers of a healthy three-broker project
    pub fn fleet() -> Vec<ContainerSummary> {
        let mut fleet = vec![Self::container(
            "zk0000000000ffffffffffffffffffffffffffffffffffffffffffffffffffff".to_string(),
            "zookeeper_1",
            "2888/tcp, 0.0.0.0:2181->2181/tcp, 3888/tcp".to_string(),
        )];
        for broker in 1..=3 {
            fleet.push(Self::container(
                Self::container_id(broker),
                &format!("kafka_{broker}"),
                format!("0.0.0.0:{}->9092/tcp", Self::broker_port(broker)),
            ));
        }
        fleet.push(Self::container(
            "pr0000000000ffffffffffffffffffffffffffffffffffffffffffffffffffff".to_string(),
            "producer_java_1",
            String::new(),
        ));
        fleet
    }

    /// A fleet where two containers publish broker 1's port
    pub fn fleet_with_duplicate_port() -> Vec<ContainerSummary> {
        let mut fleet = Self::fleet();
        fleet.push(Self::container(
            "dup000000000ffffffffffffffffffffffffffffffffffffffffffffffffffff".to_string(),
            "kafka_4",
            format!("0.0.0.0:{}->9092/tcp", Self::broker_port(1)),
        ));
        fleet
    }

    /// Metadata store responder for a cluster led by broker 1
    ///
    /// The in-sync replica set only holds the leader for the first
    /// `isr_grows_after` partition state reads, then grows to all three
    /// brokers. `reassigned` is the replica list the topic reports.
    pub fn cluster_store(
        isr_grows_after: u32,
        reassigned: &'static [i32],
    ) -> impl Fn(&str) -> tester::HarnessResult<MetadataOutput> + Send + Sync + 'static {
        let reads = Arc::new(AtomicU32::new(0));

        move |path: &str| {
            let json = match path {
                Self::STATE_PATH => {
                    let read = reads.fetch_add(1, Ordering::SeqCst) + 1;
                    if read > isr_grows_after {
                        Self::partition_state(1, &[1, 2, 3])
                    } else {
                        Self::partition_state(1, &[1])
                    }
                }
                Self::TOPIC_PATH => Self::assignment(reassigned),
                "/controller" => Self::controller(2),
                "/brokers/ids/1" => Self::registration(1),
                "/brokers/ids/2" => Self::registration(2),
                "/brokers/ids/3" => Self::registration(3),
                _ => String::new(),
            };
            Ok(Self::shell_reply(&json))
        }
    }
}
