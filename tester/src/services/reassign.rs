//! Kafka partition reassignment tool

use async_trait::async_trait;
use std::io::Write;
use tempfile::NamedTempFile;
use tracing::info;

use super::command::{args, check_command};
use crate::config::HarnessSession;
use crate::error::HarnessResult;
use crate::traits::{PartitionReassigner, ReassignmentPlan};

pub struct KafkaReassignTool {
    run_class: String,
    zookeeper: String,
}

impl KafkaReassignTool {
    pub const MAIN_CLASS: &'static str = "kafka.admin.ReassignPartitionsCommand";

    pub fn new(session: &HarnessSession) -> Self {
        Self {
            run_class: session.run_class.clone(),
            zookeeper: session.zookeeper.clone(),
        }
    }

    pub fn command_args(&self, mode: &str, plan_file: &str) -> Vec<String> {
        args([
            Self::MAIN_CLASS,
            mode,
            "--zookeeper",
            self.zookeeper.as_str(),
            "--reassignment-json-file",
            plan_file,
        ])
    }

    /// Write the plan to a temporary file that lives for the whole call
    fn write_plan(plan: &ReassignmentPlan) -> HarnessResult<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        file.write_all(plan.to_json()?.as_bytes())?;
        file.flush()?;
        Ok(file)
    }

    async fn run(&self, mode: &str, plan: &ReassignmentPlan) -> HarnessResult<()> {
        let file = Self::write_plan(plan)?;
        let path = file.path().to_string_lossy().into_owned();

        let output = check_command(&self.run_class, &self.command_args(mode, &path)).await?;
        for line in output.stdout.lines().filter(|line| !line.trim().is_empty()) {
            info!("   {}", line);
        }
        Ok(())
    }
}

#[async_trait]
impl PartitionReassigner for KafkaReassignTool {
    async fn execute(&self, plan: &ReassignmentPlan) -> HarnessResult<()> {
        self.run("--execute", plan).await
    }

    async fn verify(&self, plan: &ReassignmentPlan) -> HarnessResult<()> {
        self.run("--verify", plan).await
    }
}
