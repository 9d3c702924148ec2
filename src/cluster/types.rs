//! Control-plane metadata as returned by a [`ClusterClient`](super::ClusterClient).
//!
//! These types double as the agent wire format and the snapshot file format.

use serde::{Deserialize, Serialize};

/// A broker node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: i32,
    pub host: String,
    pub port: i32,
    #[serde(default)]
    pub rack: Option<String>,
}

/// Cluster membership and the current controller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterDescription {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub controller_id: Option<i32>,
}

/// One partition of a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionInfo {
    pub partition: i32,
    #[serde(default)]
    pub leader: Option<i32>,
    /// Assigned replicas; the first one is the preferred leader.
    #[serde(default)]
    pub replicas: Vec<i32>,
    #[serde(default)]
    pub isr: Vec<i32>,
}

/// A topic and its partition assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicDescription {
    pub name: String,
    #[serde(default)]
    pub internal: bool,
    #[serde(default)]
    pub partitions: Vec<PartitionInfo>,
}

/// A topic partition pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TopicPartition {
    pub topic: String,
    pub partition: i32,
}

/// Replica placement inside one log directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicaInfo {
    pub topic: String,
    pub partition: i32,
    pub size: i64,
    pub offset_lag: i64,
    #[serde(default)]
    pub is_future: bool,
}

/// One log directory of a broker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogDirInfo {
    pub path: String,
    #[serde(default)]
    pub replicas: Vec<ReplicaInfo>,
}

/// All log directories of a broker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerLogDirs {
    pub broker_id: i32,
    #[serde(default)]
    pub log_dirs: Vec<LogDirInfo>,
}

/// Kind of resource a configuration belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigResourceType {
    BrokerLogger,
    Broker,
    Topic,
    Unknown,
}

impl ConfigResourceType {
    pub const ALL: [ConfigResourceType; 4] = [
        Self::BrokerLogger,
        Self::Broker,
        Self::Topic,
        Self::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BrokerLogger => "broker_logger",
            Self::Broker => "broker",
            Self::Topic => "topic",
            Self::Unknown => "unknown",
        }
    }
}

/// A configurable resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfigResource {
    pub resource_type: ConfigResourceType,
    pub name: String,
}

impl ConfigResource {
    pub fn broker(id: i32) -> Self {
        Self {
            resource_type: ConfigResourceType::Broker,
            name: id.to_string(),
        }
    }

    pub fn topic(name: impl Into<String>) -> Self {
        Self {
            resource_type: ConfigResourceType::Topic,
            name: name.into(),
        }
    }
}

/// Where a configuration value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigSource {
    DynamicTopicConfig,
    DynamicBrokerLoggerConfig,
    DynamicBrokerConfig,
    DynamicDefaultBrokerConfig,
    StaticBrokerConfig,
    DefaultConfig,
    Unknown,
}

impl ConfigSource {
    pub const ALL: [ConfigSource; 7] = [
        Self::DynamicTopicConfig,
        Self::DynamicBrokerLoggerConfig,
        Self::DynamicBrokerConfig,
        Self::DynamicDefaultBrokerConfig,
        Self::StaticBrokerConfig,
        Self::DefaultConfig,
        Self::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DynamicTopicConfig => "dynamic_topic_config",
            Self::DynamicBrokerLoggerConfig => "dynamic_broker_logger_config",
            Self::DynamicBrokerConfig => "dynamic_broker_config",
            Self::DynamicDefaultBrokerConfig => "dynamic_default_broker_config",
            Self::StaticBrokerConfig => "static_broker_config",
            Self::DefaultConfig => "default_config",
            Self::Unknown => "unknown",
        }
    }
}

/// A single configuration entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
    pub source: ConfigSource,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub is_sensitive: bool,
}

/// Configuration of one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceConfig {
    pub resource: ConfigResource,
    #[serde(default)]
    pub entries: Vec<ConfigEntry>,
}

/// Consumer group coordination state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsumerGroupState {
    Unknown,
    PreparingRebalance,
    CompletingRebalance,
    Stable,
    Dead,
    Empty,
}

impl ConsumerGroupState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::PreparingRebalance => "PreparingRebalance",
            Self::CompletingRebalance => "CompletingRebalance",
            Self::Stable => "Stable",
            Self::Dead => "Dead",
            Self::Empty => "Empty",
        }
    }
}

/// A member of a consumer group and its assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDescription {
    pub consumer_id: String,
    pub client_id: String,
    pub host: String,
    #[serde(default)]
    pub group_instance_id: Option<String>,
    #[serde(default)]
    pub assignment: Vec<TopicPartition>,
}

/// A consumer group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerGroupDescription {
    pub group_id: String,
    pub coordinator_id: i32,
    pub partition_assignor: String,
    pub state: ConsumerGroupState,
    #[serde(default)]
    pub members: Vec<MemberDescription>,
}

/// An in-flight partition reassignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionReassignment {
    pub topic: String,
    pub partition: i32,
    #[serde(default)]
    pub adding_replicas: Vec<i32>,
    #[serde(default)]
    pub removing_replicas: Vec<i32>,
}
