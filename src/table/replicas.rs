use rusqlite::{params, Connection};

use super::{Table, TableResult};
use crate::cluster::ClusterClient;

/// Replica placement of every partition, internal topics included.
pub struct ReplicasTable;

impl Table for ReplicasTable {
    fn name(&self) -> &str {
        "replicas"
    }

    fn create_schema(&self, conn: &Connection) -> TableResult<()> {
        conn.execute_batch(
            "CREATE TABLE replicas (
                topic TEXT NOT NULL,
                \"partition\" INTEGER NOT NULL,
                broker_id INTEGER NOT NULL,
                is_leader BOOLEAN NOT NULL,
                is_preferred_leader BOOLEAN NOT NULL,
                is_in_sync BOOLEAN NOT NULL,
                replica_order INTEGER NOT NULL,
                PRIMARY KEY (topic, \"partition\", broker_id)
            )",
        )?;
        Ok(())
    }

    fn populate(&self, conn: &Connection, client: &dyn ClusterClient) -> TableResult<()> {
        let topics = client.list_topics(true)?;
        if topics.is_empty() {
            return Ok(());
        }
        let descriptions = client.describe_topics(&topics)?;

        let mut stmt = conn.prepare(
            "INSERT INTO replicas
                (topic, \"partition\", broker_id, is_leader, is_preferred_leader, is_in_sync, replica_order)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        for topic in &descriptions {
            for partition in &topic.partitions {
                let preferred = partition.replicas.first().copied();
                for (order, &broker_id) in partition.replicas.iter().enumerate() {
                    stmt.execute(params![
                        topic.name,
                        partition.partition,
                        broker_id,
                        partition.leader == Some(broker_id),
                        preferred == Some(broker_id),
                        partition.isr.contains(&broker_id),
                        order as i64,
                    ])?;
                }
            }
        }
        Ok(())
    }
}
