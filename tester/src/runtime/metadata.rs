//! Metadata Query Client
//!
//! Reads cluster metadata through the [`MetadataStore`] and decodes the JSON
//! value embedded in the tool's output. Nothing is cached: the store changes
//! under us between calls.

use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::{BrokerId, BrokerRegistration, ControllerRecord, PartitionState, SharedError, TopicAssignment};
use tracing::debug;

use super::HarnessContext;
use crate::error::{HarnessError, HarnessResult};
use crate::traits::MetadataStore;

/// What to do when the output holds no structured value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// Return `None`
    Lenient,
    /// Fail with [`HarnessError::MetadataQuery`]
    Strict,
}

/// First whitespace-separated `{...}` token in `stdout` that parses as JSON
pub fn extract_structured(stdout: &str) -> Option<Value> {
    stdout
        .split_whitespace()
        .filter(|token| token.len() > 2 && token.starts_with('{') && token.ends_with('}'))
        .find_map(|token| match serde_json::from_str::<Value>(token) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!("Skipping brace-shaped noise '{}': {}", token, e);
                None
            }
        })
}

pub struct MetadataClient<'a> {
    ctx: &'a HarnessContext,
}

impl<'a> MetadataClient<'a> {
    pub fn new(ctx: &'a HarnessContext) -> Self {
        Self { ctx }
    }

    fn store(&self) -> &dyn MetadataStore {
        self.ctx.store.as_ref()
    }

    /// Read `path` and return its structured value
    pub async fn query(&self, path: &str, mode: QueryMode) -> HarnessResult<Option<Value>> {
        let output = self.store().get(path).await?;

        match extract_structured(&output.stdout) {
            Some(value) => Ok(Some(value)),
            None if mode == QueryMode::Strict => Err(HarnessError::MetadataQuery {
                command: output.command,
                stderr: output.stderr.trim().to_string(),
            }),
            None => {
                debug!("No structured value at {} ({})", path, output.command);
                Ok(None)
            }
        }
    }

    /// Read `path` and decode it as `record`
    pub async fn query_as<T: DeserializeOwned>(
        &self,
        path: &str,
        mode: QueryMode,
        record: &'static str,
    ) -> HarnessResult<Option<T>> {
        let Some(value) = self.query(path, mode).await? else {
            return Ok(None);
        };

        serde_json::from_value(value).map(Some).map_err(|e| {
            HarnessError::Shared(SharedError::Decode {
                record,
                path: path.to_string(),
                message: e.to_string(),
            })
        })
    }

    async fn query_required<T: DeserializeOwned>(&self, path: &str, record: &'static str) -> HarnessResult<T> {
        // Strict mode never yields Ok(None)
        self.query_as(path, QueryMode::Strict, record)
            .await?
            .ok_or_else(|| HarnessError::MetadataQuery {
                command: path.to_string(),
                stderr: format!("no {} found", record),
            })
    }

    /// Current replication state of the session's partition, if published
    pub async fn partition_state(&self) -> HarnessResult<Option<PartitionState>> {
        let path = self.ctx.session.partition_state_path();
        self.query_as(&path, QueryMode::Lenient, "partition state").await
    }

    /// Broker currently acting as controller
    pub async fn controller(&self) -> HarnessResult<ControllerRecord> {
        self.query_required(self.ctx.session.controller_path(), "controller record")
            .await
    }

    /// Registration of a live broker
    pub async fn broker_registration(&self, broker: BrokerId) -> HarnessResult<BrokerRegistration> {
        let path = self.ctx.session.broker_path(broker);
        self.query_required(&path, "broker registration").await
    }

    /// Replica assignment of the session's topic, if published
    pub async fn topic_assignment(&self) -> HarnessResult<Option<TopicAssignment>> {
        let path = self.ctx.session.topic_path();
        self.query_as(&path, QueryMode::Lenient, "topic assignment").await
    }
}
