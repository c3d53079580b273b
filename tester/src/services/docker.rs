//! Docker CLI container orchestrator
//!
//! Drives `docker` for container-level operations and `docker-compose` for
//! project services.

use async_trait::async_trait;
use tracing::debug;

use super::command::{args, check_command};
use crate::config::HarnessSession;
use crate::error::HarnessResult;
use crate::traits::{ContainerOrchestrator, ContainerSummary, ServiceScale};

/// Container orchestrator backed by the docker command line tools
pub struct DockerCli {
    docker_bin: String,
    compose_bin: String,
    compose_args: Vec<String>,
}

impl DockerCli {
    pub fn new(session: &HarnessSession) -> Self {
        Self {
            docker_bin: "docker".to_string(),
            compose_bin: "docker-compose".to_string(),
            compose_args: session.compose_args(),
        }
    }

    /// Configure docker binary (fluent API)
    pub fn with_docker_bin<S: Into<String>>(mut self, bin: S) -> Self {
        self.docker_bin = bin.into();
        self
    }

    async fn compose(&self, mut sub: Vec<String>) -> HarnessResult<String> {
        let mut full = self.compose_args.clone();
        full.append(&mut sub);
        Ok(check_command(&self.compose_bin, &full).await?.stdout)
    }

    async fn docker(&self, sub: Vec<String>) -> HarnessResult<super::command::CommandOutput> {
        check_command(&self.docker_bin, &sub).await
    }
}

/// Decode `docker ps --format '{{json .}}'` output, one object per line
pub fn parse_container_list(stdout: &str) -> HarnessResult<Vec<ContainerSummary>> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| Ok(serde_json::from_str::<ContainerSummary>(line)?))
        .collect()
}

#[async_trait]
impl ContainerOrchestrator for DockerCli {
    async fn list_containers(
        &self,
        label_filter: &str,
        include_stopped: bool,
    ) -> HarnessResult<Vec<ContainerSummary>> {
        let mut cmd = args(["ps"]);
        if include_stopped {
            cmd.push("-a".to_string());
        }
        cmd.extend(args(["--no-trunc", "--filter"]));
        cmd.push(format!("label={}", label_filter));
        cmd.extend(args(["--format", "{{json .}}"]));

        let output = self.docker(cmd).await?;
        let containers = parse_container_list(&output.stdout)?;
        debug!("🔍 {} containers match label {}", containers.len(), label_filter);
        Ok(containers)
    }

    async fn remove(&self, ids: &[String], force: bool) -> HarnessResult<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let mut cmd = args(["rm"]);
        if force {
            cmd.push("-f".to_string());
        }
        cmd.extend(ids.iter().cloned());

        self.docker(cmd).await?;
        Ok(())
    }

    async fn up(&self, services: &[String], scale: Option<ServiceScale>) -> HarnessResult<()> {
        let mut cmd = args(["up", "-d"]);
        if let Some(scale) = scale {
            cmd.push("--scale".to_string());
            cmd.push(format!("{}={}", scale.service, scale.replicas));
        }
        cmd.extend(services.iter().cloned());

        self.compose(cmd).await?;
        Ok(())
    }

    async fn stop(&self, services: &[String], timeout_secs: Option<u64>) -> HarnessResult<()> {
        let mut cmd = args(["stop"]);
        if let Some(timeout) = timeout_secs {
            cmd.push("--timeout".to_string());
            cmd.push(timeout.to_string());
        }
        cmd.extend(services.iter().cloned());

        self.compose(cmd).await?;
        Ok(())
    }

    async fn logs(&self, services: &[String], timestamps: bool) -> HarnessResult<String> {
        let mut cmd = args(["logs", "--no-color"]);
        if timestamps {
            cmd.push("--timestamps".to_string());
        }
        cmd.extend(services.iter().cloned());

        self.compose(cmd).await
    }

    async fn container_logs(&self, container_id: &str) -> HarnessResult<String> {
        let output = self.docker(args(["logs", container_id])).await?;

        // Containers write to both streams
        let mut logs = output.stdout;
        logs.push_str(&output.stderr);
        Ok(logs)
    }

    async fn disconnect_from_network(
        &self,
        container_id: &str,
        network: &str,
        force: bool,
    ) -> HarnessResult<()> {
        let mut cmd = args(["network", "disconnect"]);
        if force {
            cmd.push("--force".to_string());
        }
        cmd.push(network.to_string());
        cmd.push(container_id.to_string());

        self.docker(cmd).await?;
        Ok(())
    }

    async fn exec_privileged(&self, container_id: &str, command: &[String]) -> HarnessResult<()> {
        let mut cmd = args(["exec", "--privileged", container_id]);
        cmd.extend(command.iter().cloned());

        self.docker(cmd).await?;
        Ok(())
    }

    async fn remove_container(&self, container_id: &str, force: bool) -> HarnessResult<()> {
        self.remove(&[container_id.to_string()], force).await
    }
}
