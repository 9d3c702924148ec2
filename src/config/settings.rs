//! TOML-based client properties file for metaql.
//!
//! Values support environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [client]
//! "bootstrap.servers" = "${BROKERS}"
//! "security.protocol" = "SSL"
//!
//! [agent]
//! path = "/usr/local/bin/metaql-agent"
//! timeout_secs = 30
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cluster::protocol::ConnectionParams;

/// Property naming the control-plane endpoint.
pub const BOOTSTRAP_SERVERS: &str = "bootstrap.servers";

/// Agent binary name searched for when no path is configured.
const AGENT_BINARY: &str = "metaql-agent";

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Missing {BOOTSTRAP_SERVERS}")]
    MissingEndpoint,
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Free-form properties handed to the control-plane client.
    pub client: BTreeMap<String, String>,

    /// Agent process configuration.
    pub agent: AgentSettings,
}

/// Agent process configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Path to the agent binary (supports ${ENV_VAR} expansion).
    pub path: Option<String>,

    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            path: None,
            timeout_secs: crate::cluster::DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Load the optional properties file and apply command-line overrides.
    pub fn resolve(
        properties_file: Option<&Path>,
        bootstrap_servers: Option<&str>,
    ) -> Result<Self, SettingsError> {
        let mut settings = match properties_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Some(servers) = bootstrap_servers {
            settings
                .client
                .insert(BOOTSTRAP_SERVERS.to_string(), servers.to_string());
        }
        Ok(settings)
    }

    /// The configured endpoint, with environment variables expanded.
    pub fn bootstrap_servers(&self) -> Result<String, SettingsError> {
        let raw = self
            .client
            .get(BOOTSTRAP_SERVERS)
            .ok_or(SettingsError::MissingEndpoint)?;
        let expanded = expand_env_vars(raw)?;
        if expanded.trim().is_empty() {
            return Err(SettingsError::MissingEndpoint);
        }
        Ok(expanded)
    }

    /// Client properties with environment variables expanded.
    pub fn resolved_client_properties(&self) -> Result<BTreeMap<String, String>, SettingsError> {
        self.client
            .iter()
            .map(|(key, value)| Ok((key.clone(), expand_env_vars(value)?)))
            .collect()
    }

    /// Client properties as sent to the agent.
    pub fn connection_params(&self) -> Result<ConnectionParams, SettingsError> {
        Ok(ConnectionParams {
            properties: self.resolved_client_properties()?,
        })
    }

    /// Get the agent binary path.
    ///
    /// Returns the configured path, or searches the working directory and
    /// `PATH` for the default binary name.
    pub fn agent_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.agent.path {
            let expanded = expand_env_vars(path).ok()?;
            return Some(PathBuf::from(expanded));
        }

        let local = PathBuf::from(".").join(AGENT_BINARY);
        if local.exists() {
            return Some(local);
        }

        let path_var = env::var_os("PATH")?;
        env::split_paths(&path_var)
            .map(|dir| dir.join(AGENT_BINARY))
            .find(|candidate| candidate.is_file())
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax. A lone `$` is kept as is.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let mut var_name = String::new();
        if chars.peek() == Some(&'{') {
            chars.next();
            for ch in chars.by_ref() {
                if ch == '}' {
                    break;
                }
                var_name.push(ch);
            }
        } else {
            while let Some(&ch) = chars.peek() {
                if !(ch.is_alphanumeric() || ch == '_') {
                    break;
                }
                var_name.push(ch);
                chars.next();
            }
            if var_name.is_empty() {
                result.push('$');
                continue;
            }
        }

        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
