//! Harness Session
//!
//! Everything that is global to one run against the container project:
//! names, metadata paths and tool locations.

use std::fmt;
use uuid::Uuid;

/// Label docker-compose puts on every container it creates
pub const COMPOSE_PROJECT_LABEL: &str = "com.docker.compose.project";

#[derive(Debug, Clone)]
pub struct HarnessSession {
    pub run_id: Uuid,
    pub project_name: String,
    pub compose_file: Option<String>,
    pub topic: String,
    pub partition: u32,
    pub zookeeper: String,
    pub run_class: String,
    pub broker_service: String,
    pub coordination_service: String,
    pub broker_count: u32,
    pub interface: String,
}

impl Default for HarnessSession {
    fn default() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            project_name: "kafkanetworkfailuretests".to_string(),
            compose_file: None,
            topic: "test-topic".to_string(),
            partition: 0,
            zookeeper: "localhost:2181".to_string(),
            run_class: "/tmp/kafka_2.12-0.10.2.1/bin/kafka-run-class.sh".to_string(),
            broker_service: "kafka".to_string(),
            coordination_service: "zookeeper".to_string(),
            broker_count: 3,
            interface: "eth0".to_string(),
        }
    }
}

impl HarnessSession {
    /// Default network compose creates for the project
    pub fn network_name(&self) -> String {
        format!("{}_default", self.project_name)
    }

    /// Label filter matching containers of this project only
    pub fn project_filter(&self) -> String {
        format!("{}={}", COMPOSE_PROJECT_LABEL, self.project_name)
    }

    /// Label filter matching containers of any compose project
    pub fn any_project_filter(&self) -> &'static str {
        COMPOSE_PROJECT_LABEL
    }

    pub fn partition_state_path(&self) -> String {
        format!(
            "/brokers/topics/{}/partitions/{}/state",
            self.topic, self.partition
        )
    }

    pub fn topic_path(&self) -> String {
        format!("/brokers/topics/{}", self.topic)
    }

    pub fn controller_path(&self) -> &'static str {
        "/controller"
    }

    pub fn broker_path(&self, broker: shared::BrokerId) -> String {
        format!("/brokers/ids/{}", broker)
    }

    /// Leading docker-compose arguments shared by every compose call
    pub fn compose_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if let Some(ref file) = self.compose_file {
            args.push("--file".to_string());
            args.push(file.clone());
        }

        args.push("--project-name".to_string());
        args.push(self.project_name.clone());

        args
    }
}

impl fmt::Display for HarnessSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "run {} project={} topic={}-{} brokers={}",
            self.run_id, self.project_name, self.topic, self.partition, self.broker_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::BrokerId;

    #[test]
    fn test_default_paths() {
        let session = HarnessSession::default();

        assert_eq!(session.network_name(), "kafkanetworkfailuretests_default");
        assert_eq!(
            session.partition_state_path(),
            "/brokers/topics/test-topic/partitions/0/state"
        );
        assert_eq!(session.broker_path(BrokerId(2)), "/brokers/ids/2");
        assert_eq!(session.topic_path(), "/brokers/topics/test-topic");
        assert_eq!(
            session.project_filter(),
            "com.docker.compose.project=kafkanetworkfailuretests"
        );
    }

    #[test]
    fn test_compose_args_with_file() {
        let session = HarnessSession {
            compose_file: Some("docker-compose.yml".to_string()),
            project_name: "p".to_string(),
            ..HarnessSession::default()
        };

        assert_eq!(
            session.compose_args(),
            vec!["--file", "docker-compose.yml", "--project-name", "p"]
        );
    }
}
