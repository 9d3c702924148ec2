use rusqlite::{params, Connection};

use super::{Table, TableResult};
use crate::cluster::ClusterClient;

/// Consumer group members, one row per assigned partition.
pub struct ConsumersTable;

impl Table for ConsumersTable {
    fn name(&self) -> &str {
        "consumers"
    }

    fn create_schema(&self, conn: &Connection) -> TableResult<()> {
        conn.execute_batch(
            "CREATE TABLE consumers (
                group_id TEXT NOT NULL,
                coordinator_id INTEGER NOT NULL,
                assignor TEXT NOT NULL,
                state TEXT NOT NULL
                    CHECK (state IN ('Unknown', 'PreparingRebalance', 'CompletingRebalance',
                                     'Stable', 'Dead', 'Empty')),
                client_id TEXT NOT NULL,
                consumer_id TEXT NOT NULL,
                host TEXT NOT NULL,
                instance_id TEXT,
                topic TEXT NOT NULL,
                \"partition\" INTEGER NOT NULL,
                PRIMARY KEY (group_id, consumer_id, topic, \"partition\")
            )",
        )?;
        Ok(())
    }

    fn populate(&self, conn: &Connection, client: &dyn ClusterClient) -> TableResult<()> {
        let group_ids = client.list_consumer_groups()?;
        if group_ids.is_empty() {
            return Ok(());
        }
        let groups = client.describe_consumer_groups(&group_ids)?;

        let mut stmt = conn.prepare(
            "INSERT INTO consumers
                (group_id, coordinator_id, assignor, state, client_id, consumer_id, host,
                 instance_id, topic, \"partition\")
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )?;
        for group in &groups {
            for member in &group.members {
                for tp in &member.assignment {
                    stmt.execute(params![
                        group.group_id,
                        group.coordinator_id,
                        group.partition_assignor,
                        group.state.as_str(),
                        member.client_id,
                        member.consumer_id,
                        member.host,
                        member.group_instance_id,
                        tp.topic,
                        tp.partition,
                    ])?;
                }
            }
        }
        Ok(())
    }
}
