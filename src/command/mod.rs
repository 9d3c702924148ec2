//! Meta-commands.
//!
//! A line whose trimmed form starts with [`COMMAND_PREFIX`] is a
//! meta-command: `:name arg1 arg2 ...`.

mod expire;
mod format;
mod help;
mod tables;

use std::io::Write;
use std::sync::Arc;

use crate::engine::{Engine, EngineResult};

pub use expire::ExpireCommand;
pub use format::FormatCommand;
pub use help::HelpCommand;
pub use tables::TablesCommand;

pub const COMMAND_PREFIX: char = ':';

/// An operator command acting on the engine.
pub trait Command: Send + Sync {
    /// One or more `:usage - description` lines.
    fn help(&self) -> &str;

    fn execute(&self, args: &[String], engine: &mut Engine, out: &mut dyn Write)
        -> EngineResult<()>;
}

/// Whether `line` is a meta-command line.
pub fn is_command(line: &str) -> bool {
    line.trim_start().starts_with(COMMAND_PREFIX)
}

/// Split a meta-command line into `[name, args...]`, stripping the prefix
/// from the name.
pub fn parse_line(line: &str) -> Vec<String> {
    let mut tokens: Vec<String> = line.split_whitespace().map(str::to_string).collect();
    if let Some(first) = tokens.first_mut() {
        if let Some(name) = first.strip_prefix(COMMAND_PREFIX) {
            *first = name.to_string();
        }
    }
    tokens
}

/// The built-in meta-commands.
pub fn default_commands() -> Vec<(&'static str, Arc<dyn Command>)> {
    vec![
        ("help", Arc::new(HelpCommand) as Arc<dyn Command>),
        ("expire", Arc::new(ExpireCommand)),
        ("format", Arc::new(FormatCommand)),
        ("tables", Arc::new(TablesCommand)),
    ]
}
