//! Table providers.
//!
//! A [`Table`] declares one relational table and knows how to fill it from
//! the control plane. The store creates every schema up front and calls
//! [`Table::populate`] lazily, after the table's dependencies hold data, so
//! a provider may read from the tables it depends on.

mod brokers;
mod configs;
mod consumers;
mod logdirs;
mod reassignments;
mod replicas;

use std::sync::Arc;

use rusqlite::types::FromSql;
use rusqlite::Connection;

use crate::cluster::ClusterClient;

pub use crate::store::{TableError, TableResult};
pub use brokers::BrokersTable;
pub use configs::ConfigsTable;
pub use consumers::ConsumersTable;
pub use logdirs::LogdirsTable;
pub use reassignments::ReassignmentsTable;
pub use replicas::ReplicasTable;

/// A materializable metadata table.
pub trait Table: Send + Sync {
    /// Table name, as used in SQL.
    fn name(&self) -> &str;

    /// Tables that must be populated before this one.
    fn dependencies(&self) -> Vec<String> {
        Vec::new()
    }

    /// Create the (empty) table.
    fn create_schema(&self, conn: &Connection) -> TableResult<()>;

    /// Insert the table's rows, fetched through `client`.
    fn populate(&self, conn: &Connection, client: &dyn ClusterClient) -> TableResult<()>;
}

/// The built-in control-plane tables.
pub fn default_tables() -> Vec<Arc<dyn Table>> {
    vec![
        Arc::new(BrokersTable),
        Arc::new(ReplicasTable),
        Arc::new(LogdirsTable),
        Arc::new(ConfigsTable),
        Arc::new(ConsumersTable),
        Arc::new(ReassignmentsTable),
    ]
}

/// Read the first column of every row returned by `sql`.
fn select_column<T: FromSql>(conn: &Connection, sql: &str) -> TableResult<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let values = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<T>, _>>()?;
    Ok(values)
}
