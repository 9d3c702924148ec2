//! Metadata store.
//!
//! Owns the embedded engine connection and materializes cataloged tables on
//! demand. Every table's schema is created when the store is opened; rows
//! appear only once [`MetadataStore::prepare_table`] has populated it.
//!
//! ```text
//! prepare_table("configs")
//!   ├─ prepare_table("brokers")   populate, mark initialized
//!   ├─ prepare_table("replicas")  populate, mark initialized
//!   └─ populate configs           mark initialized
//! ```
//!
//! Initialization flags are plain fields behind `&mut self`. Callers that
//! share one store across sessions wrap it in a `Mutex`.

mod error;
mod value;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use rusqlite::Connection;

use crate::cluster::ClusterClient;
use crate::registry::TableRegistry;
use crate::table::Table;

pub use error::{StoreError, StoreResult, TableError, TableResult};
pub use value::{Column, MemoryRows, QueryRows, RowCursor, Value};

struct TableState {
    table: Arc<dyn Table>,
    initialized: bool,
}

/// Lazily materialized control-plane tables in an embedded SQL engine.
pub struct MetadataStore {
    tables: BTreeMap<String, TableState>,
    conn: Connection,
}

impl MetadataStore {
    /// Open a fresh in-memory engine holding every table in `registry`.
    pub fn open_in_memory(registry: &TableRegistry) -> StoreResult<Self> {
        Self::new(Connection::open_in_memory()?, registry)
    }

    /// Create the schema of every table in `registry` on `conn`.
    pub fn new(conn: Connection, registry: &TableRegistry) -> StoreResult<Self> {
        let mut tables = BTreeMap::new();
        for (name, table) in registry.iter() {
            table
                .create_schema(&conn)
                .map_err(|source| StoreError::Schema {
                    table: name.clone(),
                    source,
                })?;
            tables.insert(
                name,
                TableState {
                    table,
                    initialized: false,
                },
            );
        }
        log::debug!("opened metadata store with {} tables", tables.len());
        Ok(Self { tables, conn })
    }

    fn state(&self, name: &str) -> StoreResult<&TableState> {
        self.tables
            .get(name)
            .ok_or_else(|| StoreError::UnknownTable(name.to_string()))
    }

    /// Populate `name` and, first, each of its dependencies that holds no
    /// data yet. A table that is already initialized is left alone.
    pub fn prepare_table(&mut self, name: &str, client: &dyn ClusterClient) -> StoreResult<()> {
        let mut chain = Vec::new();
        self.prepare_in_chain(name, client, &mut chain)
    }

    fn prepare_in_chain(
        &mut self,
        name: &str,
        client: &dyn ClusterClient,
        chain: &mut Vec<String>,
    ) -> StoreResult<()> {
        let state = self.state(name)?;
        if state.initialized {
            return Ok(());
        }
        if chain.iter().any(|visited| visited == name) {
            chain.push(name.to_string());
            return Err(StoreError::CyclicDependency(chain.clone()));
        }
        let table = Arc::clone(&state.table);

        chain.push(name.to_string());
        for dependency in table.dependencies() {
            self.prepare_in_chain(&dependency, client, chain)?;
        }
        chain.pop();

        log::debug!("preparing table {}", name);
        let started = Instant::now();
        self.populate(name, table.as_ref(), client)?;
        if let Some(state) = self.tables.get_mut(name) {
            state.initialized = true;
        }
        log::info!("populated table {} in {:?}", name, started.elapsed());
        Ok(())
    }

    /// Run `populate` in a transaction so a failure leaves no rows behind.
    fn populate(&self, name: &str, table: &dyn Table, client: &dyn ClusterClient) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        table
            .populate(&tx, client)
            .map_err(|source| StoreError::Populate {
                table: name.to_string(),
                source,
            })?;
        tx.commit()?;
        Ok(())
    }

    /// Prepare every cataloged table, in name order.
    pub fn prepare_all_tables(&mut self, client: &dyn ClusterClient) -> StoreResult<()> {
        let names: Vec<String> = self.tables.keys().cloned().collect();
        for name in names {
            self.prepare_table(&name, client)?;
        }
        Ok(())
    }

    /// Discard the rows of `name` so the next preparation fetches them again.
    pub fn invalidate_table(&mut self, name: &str) -> StoreResult<()> {
        let state = self.state(name)?;
        if !state.initialized {
            return Err(StoreError::NotInitialized(name.to_string()));
        }
        let sql = format!("DELETE FROM {}", quote_identifier(state.table.name()));
        self.conn.execute(&sql, [])?;
        if let Some(state) = self.tables.get_mut(name) {
            state.initialized = false;
        }
        log::info!("invalidated table {}", name);
        Ok(())
    }

    /// Invalidate every initialized table; the rest are skipped.
    pub fn invalidate_all_tables(&mut self) -> StoreResult<()> {
        let initialized: Vec<String> = self
            .tables
            .iter()
            .filter(|(_, state)| state.initialized)
            .map(|(name, _)| name.clone())
            .collect();
        for name in initialized {
            self.invalidate_table(&name)?;
        }
        Ok(())
    }

    /// Run `sql` and hand a cursor over its result to `handler`.
    ///
    /// Engine failures, whether while compiling the statement or while
    /// stepping through rows, surface as [`StoreError::Query`].
    pub fn run_query<T>(
        &self,
        sql: &str,
        handler: impl FnOnce(&mut dyn RowCursor) -> T,
    ) -> StoreResult<T> {
        let mut stmt = self.conn.prepare(sql).map_err(StoreError::query)?;
        let columns: Vec<Column> = stmt
            .columns()
            .iter()
            .map(|column| Column {
                name: column.name().to_string(),
                decl_type: column.decl_type().map(str::to_string),
            })
            .collect();
        let rows = stmt.query([]).map_err(StoreError::query)?;
        let mut cursor = QueryRows::new(columns, rows);
        Ok(handler(&mut cursor))
    }

    pub fn is_initialized(&self, name: &str) -> StoreResult<bool> {
        Ok(self.state(name)?.initialized)
    }

    /// Names of all cataloged tables, sorted.
    pub fn list_tables(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }

    /// Column names of `name`, in declaration order.
    pub fn list_columns(&self, name: &str) -> StoreResult<Vec<String>> {
        let state = self.state(name)?;
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")?;
        let columns = stmt
            .query_map([state.table.name()], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(columns)
    }

    /// Declared dependencies of `name`.
    pub fn dependencies(&self, name: &str) -> StoreResult<Vec<String>> {
        Ok(self.state(name)?.table.dependencies())
    }

    /// Close the engine connection.
    pub fn close(self) -> StoreResult<()> {
        self.conn.close().map_err(|(_, err)| StoreError::Sqlite(err))
    }
}

impl std::fmt::Debug for MetadataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tables: BTreeMap<&str, bool> = self
            .tables
            .iter()
            .map(|(name, state)| (name.as_str(), state.initialized))
            .collect();
        f.debug_struct("MetadataStore").field("tables", &tables).finish()
    }
}

/// Quote an identifier for interpolation into SQL.
pub(crate) fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
