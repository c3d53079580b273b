//! ZooKeeper shell metadata store
//!
//! Reads znodes through the Kafka distribution's ZooKeeper shell wrapper. The
//! shell prints connection chatter around the value, so the raw output is
//! handed back untouched for the metadata client to pick apart.

use async_trait::async_trait;

use super::command::{args, run_command};
use crate::config::HarnessSession;
use crate::error::HarnessResult;
use crate::traits::{MetadataOutput, MetadataStore};

pub struct ZooKeeperShell {
    run_class: String,
    server: String,
}

impl ZooKeeperShell {
    pub const MAIN_CLASS: &'static str = "kafka.tools.ZooKeeperMainWrapper";

    pub fn new(session: &HarnessSession) -> Self {
        Self {
            run_class: session.run_class.clone(),
            server: session.zookeeper.clone(),
        }
    }

    pub fn command_args(&self, path: &str) -> Vec<String> {
        args([Self::MAIN_CLASS, "-server", self.server.as_str(), "get", path])
    }
}

#[async_trait]
impl MetadataStore for ZooKeeperShell {
    async fn get(&self, path: &str) -> HarnessResult<MetadataOutput> {
        let output = run_command(&self.run_class, &self.command_args(path)).await?;

        Ok(MetadataOutput {
            success: output.success(),
            command: output.command,
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}
