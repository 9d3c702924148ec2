//! Name-keyed capability registries.
//!
//! A [`Registry`] binds unique names to shared providers. The same type backs
//! the table catalog, the meta-command set and the output formats:
//!
//! ```text
//! TableRegistry   = Registry<dyn Table>
//! CommandRegistry = Registry<dyn Command>
//! FormatRegistry  = Registry<dyn OutputFormat>
//! ```
//!
//! Registration is atomic and safe to interleave with lookups from other
//! threads, so one set of default registries can be shared process-wide.

use std::fmt;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::command::Command;
use crate::format::OutputFormat;
use crate::table::Table;

/// Errors raised while building a registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("conflicting {kind} name: {name}")]
    Duplicate { kind: &'static str, name: String },
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// A concurrent name -> provider catalog with unique registration.
pub struct Registry<T: ?Sized> {
    kind: &'static str,
    entries: DashMap<String, Arc<T>>,
}

impl<T: ?Sized> Registry<T> {
    /// Create an empty registry. `kind` names the provider kind in errors.
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: DashMap::new(),
        }
    }

    /// Bind `provider` under `name`.
    ///
    /// Fails if the name is already bound; the existing binding is kept.
    pub fn register(&self, name: impl Into<String>, provider: Arc<T>) -> RegistryResult<()> {
        let name = name.into();
        match self.entries.entry(name) {
            Entry::Occupied(entry) => Err(RegistryError::Duplicate {
                kind: self.kind,
                name: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(provider);
                Ok(())
            }
        }
    }

    /// Look up a provider by name.
    pub fn lookup(&self, name: &str) -> Option<Arc<T>> {
        self.entries.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// Whether `name` is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Snapshot of all entries, sorted by name.
    pub fn iter(&self) -> Vec<(String, Arc<T>)> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Sorted names of all entries.
    pub fn names(&self) -> Vec<String> {
        self.iter().into_iter().map(|(name, _)| name).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

impl<T: ?Sized> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("kind", &self.kind)
            .field("names", &self.names())
            .finish()
    }
}

/// Registry of materializable tables.
pub type TableRegistry = Registry<dyn Table>;

/// Registry of meta-commands.
pub type CommandRegistry = Registry<dyn Command>;

/// Registry of output formats.
pub type FormatRegistry = Registry<dyn OutputFormat>;

impl Registry<dyn Table> {
    /// An empty table registry.
    pub fn tables() -> Self {
        Self::new("table")
    }

    /// Register a table under its own name.
    pub fn register_table(&self, table: Arc<dyn Table>) -> RegistryResult<()> {
        let name = table.name().to_string();
        self.register(name, table)
    }

    /// The built-in control-plane tables.
    pub fn with_defaults() -> RegistryResult<Self> {
        let registry = Self::tables();
        for table in crate::table::default_tables() {
            registry.register_table(table)?;
        }
        Ok(registry)
    }
}

impl Registry<dyn Command> {
    /// An empty command registry.
    pub fn commands() -> Self {
        Self::new("command")
    }

    /// The built-in meta-commands.
    pub fn with_defaults() -> RegistryResult<Self> {
        let registry = Self::commands();
        for (name, command) in crate::command::default_commands() {
            registry.register(name, command)?;
        }
        Ok(registry)
    }
}

impl Registry<dyn OutputFormat> {
    /// An empty format registry.
    pub fn formats() -> Self {
        Self::new("format")
    }

    /// The built-in output formats.
    pub fn with_defaults() -> RegistryResult<Self> {
        let registry = Self::formats();
        for (name, format) in crate::format::default_formats() {
            registry.register(name, format)?;
        }
        Ok(registry)
    }
}

/// The process-wide registries, built once at startup.
#[derive(Debug, Clone)]
pub struct Registries {
    pub tables: Arc<TableRegistry>,
    pub commands: Arc<CommandRegistry>,
    pub formats: Arc<FormatRegistry>,
}

impl Registries {
    /// Registries populated with every built-in provider.
    pub fn with_defaults() -> RegistryResult<Self> {
        Ok(Self {
            tables: Arc::new(TableRegistry::with_defaults()?),
            commands: Arc::new(CommandRegistry::with_defaults()?),
            formats: Arc::new(FormatRegistry::with_defaults()?),
        })
    }
}
