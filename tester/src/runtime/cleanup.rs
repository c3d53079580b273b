//! Container Cleanup
//!
//! A run leaves its containers behind for post-mortem inspection. The next
//! run removes every compose-managed container, from any project, before
//! starting its own so container names and host ports are free again.

use tracing::{debug, info};

use super::HarnessContext;
use crate::error::HarnessResult;

pub struct CleanupManager<'a> {
    ctx: &'a HarnessContext,
}

impl<'a> CleanupManager<'a> {
    pub fn new(ctx: &'a HarnessContext) -> Self {
        Self { ctx }
    }

    /// Remove all compose containers, running or stopped
    ///
    /// Returns the number of containers removed.
    pub async fn cleanup_before_test(&self, scenario_name: &str) -> HarnessResult<usize> {
        info!("🧹 Remove all docker containers for a clean start of {}", scenario_name);

        let label = self.ctx.session.any_project_filter();
        let containers = self.ctx.containers.list_containers(label, true).await?;

        if containers.is_empty() {
            debug!("✅ No leftover containers");
            return Ok(0);
        }

        let ids: Vec<String> = containers.into_iter().map(|c| c.id).collect();
        self.ctx.containers.remove(&ids, true).await?;

        info!("🧹 Removed {} leftover containers", ids.len());
        Ok(ids.len())
    }
}
