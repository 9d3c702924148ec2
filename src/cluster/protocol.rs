//! Wire types for agent communication.
//!
//! Requests and responses are single-line JSON documents (NDJSON). Every
//! request carries the client properties so the agent can stay stateless.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::types::*;

/// Method names understood by the agent.
pub mod methods {
    pub const DESCRIBE_CLUSTER: &str = "cluster.describe";
    pub const LIST_TOPICS: &str = "topics.list";
    pub const DESCRIBE_TOPICS: &str = "topics.describe";
    pub const DESCRIBE_LOG_DIRS: &str = "logdirs.describe";
    pub const DESCRIBE_CONFIGS: &str = "configs.describe";
    pub const LIST_CONSUMER_GROUPS: &str = "groups.list";
    pub const DESCRIBE_CONSUMER_GROUPS: &str = "groups.describe";
    pub const LIST_REASSIGNMENTS: &str = "reassignments.list";
}

// ============================================================================
// Request/Response Envelope
// ============================================================================

/// Request envelope sent to the agent.
#[derive(Debug, Clone, Serialize)]
pub struct RequestEnvelope {
    /// Unique request ID for correlation.
    pub id: String,
    /// Method name (see [`methods`]).
    pub method: String,
    /// Method-specific parameters.
    pub params: serde_json::Value,
}

/// Response envelope received from the agent.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseEnvelope {
    /// Request ID this response corresponds to.
    pub id: String,
    /// Whether the request succeeded.
    pub success: bool,
    /// Result data (present if success = true).
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    /// Error information (present if success = false).
    #[serde(default)]
    pub error: Option<ErrorInfo>,
}

/// Error information in a failed response.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorInfo {
    pub code: String,
    pub message: String,
}

// ============================================================================
// Request Parameters
// ============================================================================

/// Client properties included in every request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectionParams {
    pub properties: BTreeMap<String, String>,
}

/// Parameters of a request: the connection plus a method-specific body.
#[derive(Debug, Clone, Serialize)]
pub struct Params<'a, B> {
    #[serde(flatten)]
    pub connection: &'a ConnectionParams,
    #[serde(flatten)]
    pub body: B,
}

/// Body of methods without arguments.
#[derive(Debug, Clone, Serialize)]
pub struct NoArgs {}

#[derive(Debug, Clone, Serialize)]
pub struct ListTopicsArgs {
    pub include_internal: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DescribeTopicsArgs<'a> {
    pub topics: &'a [String],
}

#[derive(Debug, Clone, Serialize)]
pub struct DescribeLogDirsArgs<'a> {
    pub broker_ids: &'a [i32],
}

#[derive(Debug, Clone, Serialize)]
pub struct DescribeConfigsArgs<'a> {
    pub resources: &'a [ConfigResource],
}

#[derive(Debug, Clone, Serialize)]
pub struct DescribeConsumerGroupsArgs<'a> {
    pub group_ids: &'a [String],
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ListTopicsResponse {
    pub topics: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DescribeTopicsResponse {
    pub topics: Vec<TopicDescription>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DescribeLogDirsResponse {
    pub brokers: Vec<BrokerLogDirs>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DescribeConfigsResponse {
    pub configs: Vec<ResourceConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListConsumerGroupsResponse {
    pub group_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DescribeConsumerGroupsResponse {
    pub groups: Vec<ConsumerGroupDescription>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListReassignmentsResponse {
    pub reassignments: Vec<PartitionReassignment>,
}
