//! Service implementations
//!
//! Real implementations of the collaborator traits. These shell out to the
//! docker and Kafka command line tools.

pub mod command;
pub mod docker;
pub mod reassign;
pub mod zookeeper;

// Re-export main types
pub use command::{CommandOutput, check_command, run_command};
pub use docker::DockerCli;
pub use reassign::KafkaReassignTool;
pub use zookeeper::ZooKeeperShell;
