//! Configuration module for metaql.
//!
//! Handles the client properties file, environment variables and the
//! command-line endpoint override.

mod settings;

pub use settings::{expand_env_vars, AgentSettings, Settings, SettingsError, BOOTSTRAP_SERVERS};
