//! A [`ClusterClient`] that serves a fixed, in-memory snapshot.
//!
//! Useful for offline analysis of a previously captured cluster state and as
//! the control-plane fake in tests. Every call is counted per method, and
//! individual methods can be made to fail.

use std::fs;
use std::path::Path;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use super::error::{ClusterError, ClusterResult};
use super::protocol::methods;
use super::types::*;
use super::ClusterClient;

/// Everything a snapshot client knows about a cluster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterSnapshot {
    pub cluster: ClusterDescription,
    pub topics: Vec<TopicDescription>,
    pub log_dirs: Vec<BrokerLogDirs>,
    pub configs: Vec<ResourceConfig>,
    pub consumer_groups: Vec<ConsumerGroupDescription>,
    pub reassignments: Vec<PartitionReassignment>,
}

/// Serves control-plane calls from a [`ClusterSnapshot`].
#[derive(Debug, Default)]
pub struct SnapshotClient {
    snapshot: ClusterSnapshot,
    calls: DashMap<&'static str, usize>,
    failures: DashMap<&'static str, String>,
}

impl SnapshotClient {
    pub fn new(snapshot: ClusterSnapshot) -> Self {
        Self {
            snapshot,
            calls: DashMap::new(),
            failures: DashMap::new(),
        }
    }

    /// Load a snapshot from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ClusterResult<Self> {
        let content = fs::read_to_string(path).map_err(ClusterError::ReadFailed)?;
        let snapshot = serde_json::from_str(&content).map_err(ClusterError::DeserializeFailed)?;
        Ok(Self::new(snapshot))
    }

    pub fn snapshot(&self) -> &ClusterSnapshot {
        &self.snapshot
    }

    /// Number of calls made to `method` (one of [`methods`]).
    pub fn call_count(&self, method: &str) -> usize {
        self.calls.get(method).map(|count| *count).unwrap_or(0)
    }

    /// Make every subsequent call to `method` fail with `message`.
    pub fn fail_on(&self, method: &'static str, message: impl Into<String>) {
        self.failures.insert(method, message.into());
    }

    /// Undo [`fail_on`](Self::fail_on).
    pub fn recover(&self, method: &str) {
        self.failures.remove(method);
    }

    fn record(&self, method: &'static str) -> ClusterResult<()> {
        *self.calls.entry(method).or_insert(0) += 1;
        match self.failures.get(method) {
            Some(message) => Err(ClusterError::remote("INJECTED", message.value().clone())),
            None => Ok(()),
        }
    }
}

impl ClusterClient for SnapshotClient {
    fn describe_cluster(&self) -> ClusterResult<ClusterDescription> {
        self.record(methods::DESCRIBE_CLUSTER)?;
        Ok(self.snapshot.cluster.clone())
    }

    fn list_topics(&self, include_internal: bool) -> ClusterResult<Vec<String>> {
        self.record(methods::LIST_TOPICS)?;
        Ok(self
            .snapshot
            .topics
            .iter()
            .filter(|t| include_internal || !t.internal)
            .map(|t| t.name.clone())
            .collect())
    }

    fn describe_topics(&self, topics: &[String]) -> ClusterResult<Vec<TopicDescription>> {
        self.record(methods::DESCRIBE_TOPICS)?;
        topics
            .iter()
            .map(|name| {
                self.snapshot
                    .topics
                    .iter()
                    .find(|t| &t.name == name)
                    .cloned()
                    .ok_or_else(|| ClusterError::NotFound {
                        kind: "topic",
                        name: name.clone(),
                    })
            })
            .collect()
    }

    fn describe_log_dirs(&self, broker_ids: &[i32]) -> ClusterResult<Vec<BrokerLogDirs>> {
        self.record(methods::DESCRIBE_LOG_DIRS)?;
        Ok(self
            .snapshot
            .log_dirs
            .iter()
            .filter(|dirs| broker_ids.contains(&dirs.broker_id))
            .cloned()
            .collect())
    }

    fn describe_configs(&self, resources: &[ConfigResource]) -> ClusterResult<Vec<ResourceConfig>> {
        self.record(methods::DESCRIBE_CONFIGS)?;
        Ok(resources
            .iter()
            .filter_map(|resource| {
                self.snapshot
                    .configs
                    .iter()
                    .find(|config| &config.resource == resource)
                    .cloned()
            })
            .collect())
    }

    fn list_consumer_groups(&self) -> ClusterResult<Vec<String>> {
        self.record(methods::LIST_CONSUMER_GROUPS)?;
        Ok(self
            .snapshot
            .consumer_groups
            .iter()
            .map(|g| g.group_id.clone())
            .collect())
    }

    fn describe_consumer_groups(
        &self,
        group_ids: &[String],
    ) -> ClusterResult<Vec<ConsumerGroupDescription>> {
        self.record(methods::DESCRIBE_CONSUMER_GROUPS)?;
        group_ids
            .iter()
            .map(|id| {
                self.snapshot
                    .consumer_groups
                    .iter()
                    .find(|g| &g.group_id == id)
                    .cloned()
                    .ok_or_else(|| ClusterError::NotFound {
                        kind: "consumer group",
                        name: id.clone(),
                    })
            })
            .collect()
    }

    fn list_partition_reassignments(&self) -> ClusterResult<Vec<PartitionReassignment>> {
        self.record(methods::LIST_REASSIGNMENTS)?;
        Ok(self.snapshot.reassignments.clone())
    }
}
