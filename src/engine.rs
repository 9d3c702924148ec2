//! Execution engine.
//!
//! One input line at a time:
//!
//! ```text
//! line ──► is_command? ──yes──► Command registry ──► command.execute(args, engine, out)
//!              │
//!              no
//!              ▼
//!     required_tables(sql) ──► store.prepare_table(..) for each
//!              ▼
//!     store.run_query(sql) ──► active OutputFormat ──► out
//! ```

use std::io::{self, Write};
use std::sync::Arc;

use thiserror::Error;

use crate::analyzer::required_tables;
use crate::cluster::{ClusterClient, ClusterError};
use crate::command::{self, Command};
use crate::format::{OutputFormat, RenderError};
use crate::registry::{CommandRegistry, FormatRegistry, Registries};
use crate::store::{MetadataStore, StoreError};

pub type EngineResult<T> = Result<T, EngineError>;

/// Errors raised while executing an input line.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("no such command: {0}")]
    UnknownCommand(String),

    #[error("unknown output format: {0}")]
    UnknownFormat(String),

    /// A referenced table could not be populated.
    #[error("Error initializing table: {table}: {source}")]
    TablePreparation {
        table: String,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Cluster(#[from] ClusterError),

    /// Writing to the output sink failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl EngineError {
    /// Whether the error leaves the output sink unusable.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Render(RenderError::Io(_)))
    }
}

/// Top-level orchestrator owning the store, the client and the active
/// output format.
pub struct Engine {
    // Dropped in declaration order: store first, then client.
    store: MetadataStore,
    client: Box<dyn ClusterClient>,
    formats: Arc<FormatRegistry>,
    commands: Arc<CommandRegistry>,
    output_format: Arc<dyn OutputFormat>,
    output_format_name: Option<String>,
}

impl Engine {
    pub fn new(
        client: Box<dyn ClusterClient>,
        store: MetadataStore,
        formats: Arc<FormatRegistry>,
        commands: Arc<CommandRegistry>,
        output_format: Arc<dyn OutputFormat>,
    ) -> Self {
        Self {
            store,
            client,
            formats,
            commands,
            output_format,
            output_format_name: None,
        }
    }

    /// Build an engine over a fresh in-memory store holding every table of
    /// `registries`, rendering with the format named `format_name`.
    pub fn from_registries(
        client: Box<dyn ClusterClient>,
        registries: &Registries,
        format_name: &str,
    ) -> EngineResult<Self> {
        let format = registries
            .formats
            .lookup(format_name)
            .ok_or_else(|| EngineError::UnknownFormat(format_name.to_string()))?;
        let store = MetadataStore::open_in_memory(&registries.tables)?;
        let mut engine = Self::new(
            client,
            store,
            Arc::clone(&registries.formats),
            Arc::clone(&registries.commands),
            format,
        );
        engine.output_format_name = Some(format_name.to_string());
        Ok(engine)
    }

    /// Execute one input line, writing its output to `out`.
    pub fn execute(&mut self, line: &str, out: &mut dyn Write) -> EngineResult<()> {
        if command::is_command(line) {
            return self.execute_command(line, out);
        }

        let sql = line.trim();
        self.prepare_required_tables(sql)?;

        let format = Arc::clone(&self.output_format);
        self.store
            .run_query(sql, |rows| format.render(rows, &mut *out))??;
        out.flush()?;
        Ok(())
    }

    fn execute_command(&mut self, line: &str, out: &mut dyn Write) -> EngineResult<()> {
        let mut tokens = command::parse_line(line).into_iter();
        let name = tokens.next().unwrap_or_default();
        let args: Vec<String> = tokens.collect();

        let command: Arc<dyn Command> = self
            .commands
            .lookup(&name)
            .ok_or(EngineError::UnknownCommand(name))?;
        command.execute(&args, self, out)?;
        out.flush()?;
        Ok(())
    }

    fn prepare_required_tables(&mut self, sql: &str) -> EngineResult<()> {
        for table in required_tables(sql) {
            match self.store.prepare_table(&table, self.client.as_ref()) {
                Ok(()) => {}
                Err(StoreError::UnknownTable(name)) if name == table => {
                    log::debug!("skipping reference to uncataloged table {}", table);
                }
                Err(source) => return Err(EngineError::TablePreparation { table, source }),
            }
        }
        Ok(())
    }

    /// Populate every cataloged table now instead of on first use.
    pub fn init_all_tables(&mut self) -> EngineResult<()> {
        self.store.prepare_all_tables(self.client.as_ref())?;
        Ok(())
    }

    /// Render subsequent results with `format`.
    pub fn set_output_format(&mut self, format: Arc<dyn OutputFormat>) {
        self.output_format = format;
        self.output_format_name = None;
    }

    /// Render subsequent results with the registered format `name`.
    pub fn set_output_format_by_name(&mut self, name: &str) -> EngineResult<()> {
        let format = self
            .formats
            .lookup(name)
            .ok_or_else(|| EngineError::UnknownFormat(name.to_string()))?;
        self.output_format = format;
        self.output_format_name = Some(name.to_string());
        Ok(())
    }

    /// Registered name of the active format, unless it was set by instance.
    pub fn output_format_name(&self) -> Option<&str> {
        self.output_format_name.as_deref()
    }

    pub fn store(&self) -> &MetadataStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut MetadataStore {
        &mut self.store
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    pub fn formats(&self) -> &FormatRegistry {
        &self.formats
    }

    /// Close the store, then the client. Both are closed even if the first
    /// fails; the first failure is returned.
    pub fn close(self) -> EngineResult<()> {
        let Engine {
            store, mut client, ..
        } = self;
        let store_result = store.close();
        let client_result = client.close();
        store_result?;
        client_result?;
        Ok(())
    }
}
