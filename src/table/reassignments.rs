use rusqlite::{params, Connection, Statement};

use super::{Table, TableResult};
use crate::cluster::ClusterClient;

/// Replicas being added to or removed from partitions by in-flight
/// reassignments.
pub struct ReassignmentsTable;

impl Table for ReassignmentsTable {
    fn name(&self) -> &str {
        "reassignments"
    }

    fn create_schema(&self, conn: &Connection) -> TableResult<()> {
        conn.execute_batch(
            "CREATE TABLE reassignments (
                topic TEXT NOT NULL,
                \"partition\" INTEGER NOT NULL,
                replica_id INTEGER NOT NULL,
                operation TEXT NOT NULL CHECK (operation IN ('adding', 'removing')),
                PRIMARY KEY (topic, \"partition\", replica_id)
            )",
        )?;
        Ok(())
    }

    fn populate(&self, conn: &Connection, client: &dyn ClusterClient) -> TableResult<()> {
        let reassignments = client.list_partition_reassignments()?;

        let mut stmt = conn.prepare(
            "INSERT INTO reassignments (topic, \"partition\", replica_id, operation)
             VALUES (?1, ?2, ?3, ?4)",
        )?;
        for reassignment in &reassignments {
            for &replica in &reassignment.adding_replicas {
                insert(&mut stmt, &reassignment.topic, reassignment.partition, replica, "adding")?;
            }
            for &replica in &reassignment.removing_replicas {
                insert(&mut stmt, &reassignment.topic, reassignment.partition, replica, "removing")?;
            }
        }
        Ok(())
    }
}

fn insert(
    stmt: &mut Statement<'_>,
    topic: &str,
    partition: i32,
    replica: i32,
    operation: &str,
) -> TableResult<()> {
    stmt.execute(params![topic, partition, replica, operation])?;
    Ok(())
}
