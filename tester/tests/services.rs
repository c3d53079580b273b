//! Command-line collaborators as seen from outside the crate

use std::sync::Arc;

use tester::HarnessSession;
use tester::services::{DockerCli, KafkaReassignTool, ZooKeeperShell, check_command, run_command};
use tester::traits::{ContainerOrchestrator, MetadataStore, PartitionReassigner};

#[test]
fn test_cli_services_fill_every_collaborator_slot() {
    let session = HarnessSession::default();

    let _containers: Arc<dyn ContainerOrchestrator> = Arc::new(DockerCli::new(&session));
    let _store: Arc<dyn MetadataStore> = Arc::new(ZooKeeperShell::new(&session));
    let _reassigner: Arc<dyn PartitionReassigner> = Arc::new(KafkaReassignTool::new(&session));
}

#[cfg(unix)]
#[tokio::test]
async fn test_command_runner_is_reachable() {
    let output = run_command("echo", &["ready".to_string()]).await.unwrap();
    assert_eq!(output.stdout.trim(), "ready");

    assert!(check_command("false", &[]).await.is_err());
}
