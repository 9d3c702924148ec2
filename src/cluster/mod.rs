//! Control-plane client boundary.
//!
//! Tables populate themselves through the [`ClusterClient`] trait. Two
//! implementations ship with the crate:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     ClusterClient                        │
//! │  describe_cluster / list_topics / describe_topics / ...  │
//! └──────────────────────────────────────────────────────────┘
//!            │                                  │
//!            ▼                                  ▼
//! ┌──────────────────────┐        ┌──────────────────────────┐
//! │     AgentClient      │        │     SnapshotClient       │
//! │ NDJSON over stdio to │        │ in-memory ClusterSnapshot│
//! │ an agent process     │        │ (JSON file or built)     │
//! └──────────────────────┘        └──────────────────────────┘
//! ```
//!
//! All calls are blocking and run on the caller's thread.

mod agent;
mod error;
pub mod protocol;
mod snapshot;
mod types;

pub use agent::{AgentClient, DEFAULT_TIMEOUT_SECS};
pub use error::{ClusterError, ClusterResult};
pub use snapshot::{ClusterSnapshot, SnapshotClient};
pub use types::*;

/// Blocking access to live control-plane metadata.
pub trait ClusterClient: Send {
    /// Broker membership and the current controller.
    fn describe_cluster(&self) -> ClusterResult<ClusterDescription>;

    /// Names of all topics, optionally including internal ones.
    fn list_topics(&self, include_internal: bool) -> ClusterResult<Vec<String>>;

    /// Partition assignment of the given topics.
    fn describe_topics(&self, topics: &[String]) -> ClusterResult<Vec<TopicDescription>>;

    /// Log directories of the given brokers.
    fn describe_log_dirs(&self, broker_ids: &[i32]) -> ClusterResult<Vec<BrokerLogDirs>>;

    /// Configuration of the given resources.
    fn describe_configs(&self, resources: &[ConfigResource]) -> ClusterResult<Vec<ResourceConfig>>;

    /// Ids of all consumer groups.
    fn list_consumer_groups(&self) -> ClusterResult<Vec<String>>;

    /// Membership and assignment of the given consumer groups.
    fn describe_consumer_groups(
        &self,
        group_ids: &[String],
    ) -> ClusterResult<Vec<ConsumerGroupDescription>>;

    /// Partition reassignments currently in progress.
    fn list_partition_reassignments(&self) -> ClusterResult<Vec<PartitionReassignment>>;

    /// Release the connection. Called once on shutdown.
    fn close(&mut self) -> ClusterResult<()> {
        Ok(())
    }
}
