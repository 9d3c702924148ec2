use rusqlite::{params, Connection};

use super::{select_column, Table, TableResult};
use crate::cluster::{ClusterClient, ConfigResource};

/// Configuration of every broker and every topic.
///
/// Resources are taken from `brokers` and the distinct topics of `replicas`.
pub struct ConfigsTable;

impl Table for ConfigsTable {
    fn name(&self) -> &str {
        "configs"
    }

    fn dependencies(&self) -> Vec<String> {
        vec!["brokers".to_string(), "replicas".to_string()]
    }

    fn create_schema(&self, conn: &Connection) -> TableResult<()> {
        conn.execute_batch(
            "CREATE TABLE configs (
                resource_type TEXT NOT NULL
                    CHECK (resource_type IN ('broker_logger', 'broker', 'topic', 'unknown')),
                name TEXT NOT NULL,
                \"key\" TEXT NOT NULL,
                value TEXT,
                source TEXT
                    CHECK (source IN ('dynamic_topic_config', 'dynamic_broker_logger_config',
                                      'dynamic_broker_config', 'dynamic_default_broker_config',
                                      'static_broker_config', 'default_config', 'unknown')),
                is_default BOOLEAN NOT NULL,
                is_sensitive BOOLEAN NOT NULL,
                PRIMARY KEY (resource_type, name, \"key\")
            )",
        )?;
        Ok(())
    }

    fn populate(&self, conn: &Connection, client: &dyn ClusterClient) -> TableResult<()> {
        let broker_ids: Vec<i32> = select_column(conn, "SELECT id FROM brokers")?;
        let topics: Vec<String> =
            select_column(conn, "SELECT DISTINCT topic FROM replicas ORDER BY topic")?;

        let resources: Vec<ConfigResource> = broker_ids
            .into_iter()
            .map(ConfigResource::broker)
            .chain(topics.into_iter().map(ConfigResource::topic))
            .collect();
        if resources.is_empty() {
            return Ok(());
        }
        let configs = client.describe_configs(&resources)?;

        let mut stmt = conn.prepare(
            "INSERT INTO configs (resource_type, name, \"key\", value, source, is_default, is_sensitive)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        for config in &configs {
            for entry in &config.entries {
                stmt.execute(params![
                    config.resource.resource_type.as_str(),
                    config.resource.name,
                    entry.name,
                    entry.value,
                    entry.source.as_str(),
                    entry.is_default,
                    entry.is_sensitive,
                ])?;
            }
        }
        Ok(())
    }
}
