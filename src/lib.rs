//! # metaql
//!
//! SQL over a distributed system's control-plane metadata.
//!
//! ## Architecture
//!
//! Control-plane calls are flattened into relational tables that are
//! materialized on demand in an embedded SQL engine:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                 input line (REPL / -e)                   │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [engine]
//! ┌──────────────────────────┐   ┌──────────────────────────┐
//! │  meta-command (:help ..) │   │  query: analyzer finds   │
//! │  [command]               │   │  referenced tables       │
//! └──────────────────────────┘   └──────────────────────────┘
//!                                              │
//!                                              ▼ [store]
//! ┌─────────────────────────────────────────────────────────┐
//! │  dependency-ordered lazy population of [table]s via      │
//! │  the [cluster] client, then the query runs               │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [format]
//! ┌─────────────────────────────────────────────────────────┐
//! │              grid / ssv / csv / json output              │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Tables, meta-commands and output formats are looked up by name in
//! [`registry`]s built once at startup.

pub mod analyzer;
pub mod cluster;
pub mod command;
pub mod completion;
pub mod config;
pub mod engine;
pub mod format;
pub mod registry;
pub mod store;
pub mod table;

pub use engine::{Engine, EngineError, EngineResult};
pub use registry::{CommandRegistry, FormatRegistry, Registries, Registry, TableRegistry};
pub use store::MetadataStore;
