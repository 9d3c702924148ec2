use rusqlite::{params, Connection};

use super::{Table, TableResult};
use crate::cluster::ClusterClient;

/// Broker membership, one row per node.
pub struct BrokersTable;

impl Table for BrokersTable {
    fn name(&self) -> &str {
        "brokers"
    }

    fn create_schema(&self, conn: &Connection) -> TableResult<()> {
        conn.execute_batch(
            "CREATE TABLE brokers (
                id INTEGER NOT NULL,
                host TEXT NOT NULL,
                port INTEGER NOT NULL,
                rack TEXT,
                is_controller BOOLEAN NOT NULL,
                PRIMARY KEY (id)
            )",
        )?;
        Ok(())
    }

    fn populate(&self, conn: &Connection, client: &dyn ClusterClient) -> TableResult<()> {
        let cluster = client.describe_cluster()?;
        let mut stmt = conn.prepare(
            "INSERT INTO brokers (id, host, port, rack, is_controller) VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for node in &cluster.nodes {
            stmt.execute(params![
                node.id,
                node.host,
                node.port,
                node.rack,
                cluster.controller_id == Some(node.id),
            ])?;
        }
        Ok(())
    }
}
