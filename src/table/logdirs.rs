use rusqlite::{params, Connection};

use super::{select_column, Table, TableResult};
use crate::cluster::ClusterClient;

/// Replica placement on broker log directories.
///
/// Broker ids are read from `brokers`.
pub struct LogdirsTable;

impl Table for LogdirsTable {
    fn name(&self) -> &str {
        "logdirs"
    }

    fn dependencies(&self) -> Vec<String> {
        vec!["brokers".to_string()]
    }

    fn create_schema(&self, conn: &Connection) -> TableResult<()> {
        conn.execute_batch(
            "CREATE TABLE logdirs (
                broker_id INTEGER NOT NULL,
                path TEXT NOT NULL,
                topic TEXT NOT NULL,
                \"partition\" INTEGER NOT NULL,
                size INTEGER NOT NULL,
                offset_lag INTEGER NOT NULL,
                is_future BOOLEAN NOT NULL,
                PRIMARY KEY (broker_id, path, topic, \"partition\")
            )",
        )?;
        Ok(())
    }

    fn populate(&self, conn: &Connection, client: &dyn ClusterClient) -> TableResult<()> {
        let broker_ids: Vec<i32> = select_column(conn, "SELECT id FROM brokers")?;
        if broker_ids.is_empty() {
            return Ok(());
        }
        let brokers = client.describe_log_dirs(&broker_ids)?;

        let mut stmt = conn.prepare(
            "INSERT INTO logdirs (broker_id, path, topic, \"partition\", size, offset_lag, is_future)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        for broker in &brokers {
            for dir in &broker.log_dirs {
                for replica in &dir.replicas {
                    stmt.execute(params![
                        broker.broker_id,
                        dir.path,
                        replica.topic,
                        replica.partition,
                        replica.size,
                        replica.offset_lag,
                        replica.is_future,
                    ])?;
                }
            }
        }
        Ok(())
    }
}
