//! Client for an external control-plane agent process.

use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::runtime::Runtime;
use tokio::sync::{oneshot, Mutex};

use super::error::{ClusterError, ClusterResult};
use super::protocol::{self, methods, ConnectionParams, ErrorInfo, Params, RequestEnvelope, ResponseEnvelope};
use super::types::*;
use super::ClusterClient;
use crate::config::Settings;

/// Default timeout for requests (30 seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

type PendingMap = Arc<Mutex<HashMap<String, oneshot::Sender<ResponseEnvelope>>>>;

/// Blocking client for the control-plane agent.
///
/// The client spawns the agent as a child process and communicates via
/// NDJSON (newline-delimited JSON) over stdin/stdout. Each request has a
/// unique ID for correlation with its response. The async plumbing runs on a
/// private single-threaded runtime, so callers simply block until the
/// response arrives or the timeout elapses.
pub struct AgentClient {
    runtime: Runtime,

    /// Writer for sending requests to agent stdin.
    stdin: Arc<Mutex<BufWriter<ChildStdin>>>,

    /// Map of pending request IDs to response channels.
    pending: PendingMap,

    child: Child,

    reader_task: tokio::task::JoinHandle<()>,

    timeout: Duration,

    /// Client properties sent with every request.
    connection: ConnectionParams,
}

impl AgentClient {
    /// Spawn the agent at `agent_path`.
    pub fn spawn<P: AsRef<Path>>(
        agent_path: P,
        properties: BTreeMap<String, String>,
        timeout: Duration,
    ) -> ClusterResult<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ClusterError::RuntimeFailed)?;

        let mut child = {
            let _guard = runtime.enter();
            Command::new(agent_path.as_ref())
                .stdin(std::process::Stdio::piped())
                .stdout(std::process::Stdio::piped())
                .stderr(std::process::Stdio::inherit())
                .kill_on_drop(true)
                .spawn()
                .map_err(ClusterError::SpawnFailed)?
        };

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ClusterError::SpawnFailed(io::Error::other("agent stdin not captured")))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ClusterError::SpawnFailed(io::Error::other("agent stdout not captured")))?;

        let stdin = Arc::new(Mutex::new(BufWriter::new(stdin)));
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));

        let reader_task = runtime.spawn(Self::read_responses(stdout, pending.clone()));

        log::debug!("spawned agent {}", agent_path.as_ref().display());

        Ok(Self {
            runtime,
            stdin,
            pending,
            child,
            reader_task,
            timeout,
            connection: ConnectionParams { properties },
        })
    }

    /// Spawn the agent described by `settings`.
    pub fn spawn_with_settings(settings: &Settings) -> ClusterResult<Self> {
        let agent_path = Self::resolve_agent_path(settings)?;
        let properties = settings
            .resolved_client_properties()
            .map_err(|e| ClusterError::SpawnFailed(io::Error::other(e.to_string())))?;
        Self::spawn(
            agent_path,
            properties,
            Duration::from_secs(settings.agent.timeout_secs),
        )
    }

    fn resolve_agent_path(settings: &Settings) -> ClusterResult<PathBuf> {
        settings.agent_path().ok_or_else(|| {
            ClusterError::SpawnFailed(io::Error::new(
                io::ErrorKind::NotFound,
                "Agent binary not found. Set agent.path in the client properties file",
            ))
        })
    }

    /// Background task that routes agent responses to waiting requests.
    async fn read_responses(stdout: ChildStdout, pending: PendingMap) {
        let mut reader = BufReader::new(stdout);
        let mut line = String::new();

        loop {
            line.clear();
            match reader.read_line(&mut line).await {
                Ok(0) => break,
                Ok(_) => match serde_json::from_str::<ResponseEnvelope>(&line) {
                    Ok(resp) => {
                        let mut pending = pending.lock().await;
                        if let Some(tx) = pending.remove(&resp.id) {
                            let _ = tx.send(resp);
                        }
                    }
                    Err(e) => log::warn!("agent: failed to parse response: {}", e),
                },
                Err(e) => {
                    log::warn!("agent: read error: {}", e);
                    break;
                }
            }
        }

        // Agent exited: fail every request still waiting.
        let mut pending = pending.lock().await;
        for (id, tx) in pending.drain() {
            let _ = tx.send(ResponseEnvelope {
                id,
                success: false,
                result: None,
                error: Some(ErrorInfo {
                    code: "AGENT_EXITED".to_string(),
                    message: "Agent process exited unexpectedly".to_string(),
                }),
            });
        }
    }

    /// Send a request and block until its response arrives.
    pub fn request<B, R>(&self, method: &str, body: B) -> ClusterResult<R>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let params = Params {
            connection: &self.connection,
            body,
        };
        let params = serde_json::to_value(params).map_err(ClusterError::SerializeFailed)?;
        self.runtime.block_on(self.send(method, params))
    }

    async fn send<R: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> ClusterResult<R> {
        let id = uuid::Uuid::new_v4().to_string();
        let request = RequestEnvelope {
            id: id.clone(),
            method: method.to_string(),
            params,
        };

        let line = serde_json::to_string(&request).map_err(ClusterError::SerializeFailed)? + "\n";

        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.insert(id.clone(), tx);

        if let Err(e) = self.write_line(&line).await {
            self.pending.lock().await.remove(&id);
            return Err(e);
        }

        let response = match tokio::time::timeout(self.timeout, rx).await {
            Ok(resp) => resp?,
            Err(_) => {
                self.pending.lock().await.remove(&id);
                return Err(ClusterError::Timeout(self.timeout.as_secs()));
            }
        };

        if response.success {
            let result = response.result.unwrap_or(serde_json::Value::Null);
            serde_json::from_value(result).map_err(ClusterError::DeserializeFailed)
        } else {
            let error = response.error.unwrap_or_else(|| ErrorInfo {
                code: "UNKNOWN".to_string(),
                message: "Unknown error".to_string(),
            });
            Err(Self::classify_error(&error.code, &error.message))
        }
    }

    async fn write_line(&self, line: &str) -> ClusterResult<()> {
        let mut stdin = self.stdin.lock().await;
        stdin
            .write_all(line.as_bytes())
            .await
            .map_err(ClusterError::WriteFailed)?;
        stdin.flush().await.map_err(ClusterError::WriteFailed)
    }

    fn classify_error(code: &str, message: &str) -> ClusterError {
        match code {
            "AGENT_EXITED" => ClusterError::AgentExited,
            _ => ClusterError::remote(code, message),
        }
    }
}

impl ClusterClient for AgentClient {
    fn describe_cluster(&self) -> ClusterResult<ClusterDescription> {
        self.request(methods::DESCRIBE_CLUSTER, protocol::NoArgs {})
    }

    fn list_topics(&self, include_internal: bool) -> ClusterResult<Vec<String>> {
        let response: protocol::ListTopicsResponse = self.request(
            methods::LIST_TOPICS,
            protocol::ListTopicsArgs { include_internal },
        )?;
        Ok(response.topics)
    }

    fn describe_topics(&self, topics: &[String]) -> ClusterResult<Vec<TopicDescription>> {
        let response: protocol::DescribeTopicsResponse =
            self.request(methods::DESCRIBE_TOPICS, protocol::DescribeTopicsArgs { topics })?;
        Ok(response.topics)
    }

    fn describe_log_dirs(&self, broker_ids: &[i32]) -> ClusterResult<Vec<BrokerLogDirs>> {
        let response: protocol::DescribeLogDirsResponse = self.request(
            methods::DESCRIBE_LOG_DIRS,
            protocol::DescribeLogDirsArgs { broker_ids },
        )?;
        Ok(response.brokers)
    }

    fn describe_configs(&self, resources: &[ConfigResource]) -> ClusterResult<Vec<ResourceConfig>> {
        let response: protocol::DescribeConfigsResponse = self.request(
            methods::DESCRIBE_CONFIGS,
            protocol::DescribeConfigsArgs { resources },
        )?;
        Ok(response.configs)
    }

    fn list_consumer_groups(&self) -> ClusterResult<Vec<String>> {
        let response: protocol::ListConsumerGroupsResponse =
            self.request(methods::LIST_CONSUMER_GROUPS, protocol::NoArgs {})?;
        Ok(response.group_ids)
    }

    fn describe_consumer_groups(
        &self,
        group_ids: &[String],
    ) -> ClusterResult<Vec<ConsumerGroupDescription>> {
        let response: protocol::DescribeConsumerGroupsResponse = self.request(
            methods::DESCRIBE_CONSUMER_GROUPS,
            protocol::DescribeConsumerGroupsArgs { group_ids },
        )?;
        Ok(response.groups)
    }

    fn list_partition_reassignments(&self) -> ClusterResult<Vec<PartitionReassignment>> {
        let response: protocol::ListReassignmentsResponse =
            self.request(methods::LIST_REASSIGNMENTS, protocol::NoArgs {})?;
        Ok(response.reassignments)
    }

    fn close(&mut self) -> ClusterResult<()> {
        self.reader_task.abort();
        let child = &mut self.child;
        self.runtime.block_on(async move {
            if child.try_wait().map_err(ClusterError::ReadFailed)?.is_some() {
                return Ok(());
            }
            child.kill().await.map_err(ClusterError::WriteFailed)
        })
    }
}
