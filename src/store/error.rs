//! Metadata store error types.

use thiserror::Error;

use crate::cluster::ClusterError;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for table schema creation and population.
pub type TableResult<T> = Result<T, TableError>;

/// Errors raised by the metadata store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The name is not in the table catalog.
    #[error("no such table: {0}")]
    UnknownTable(String),

    /// Invalidation of a table that holds no data.
    #[error("table not initialized: {0}")]
    NotInitialized(String),

    /// A dependency chain leads back to a table already being prepared.
    #[error("cyclic table dependency: {}", .0.join(" -> "))]
    CyclicDependency(Vec<String>),

    /// The embedded engine rejected or failed a query.
    #[error("{message}")]
    Query { message: String },

    #[error("failed to create table {table}: {source}")]
    Schema {
        table: String,
        #[source]
        source: TableError,
    },

    #[error("failed to populate table {table}: {source}")]
    Populate {
        table: String,
        #[source]
        source: TableError,
    },

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

impl StoreError {
    /// Wrap an engine failure raised while running a user query.
    pub fn query(err: rusqlite::Error) -> Self {
        Self::Query {
            message: err.to_string(),
        }
    }
}

/// Errors raised by a table provider.
#[derive(Error, Debug)]
pub enum TableError {
    #[error(transparent)]
    Cluster(#[from] ClusterError),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}
