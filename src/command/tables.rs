use std::io::Write;

use super::Command;
use crate::engine::{Engine, EngineResult};

/// List cataloged tables with their state and dependencies.
pub struct TablesCommand;

impl Command for TablesCommand {
    fn help(&self) -> &str {
        ":tables - List tables, whether they hold data and what they depend on"
    }

    fn execute(&self, _args: &[String], engine: &mut Engine, out: &mut dyn Write) -> EngineResult<()> {
        let store = engine.store();
        for name in store.list_tables() {
            let state = if store.is_initialized(&name)? {
                "initialized"
            } else {
                "empty"
            };
            let dependencies = store.dependencies(&name)?;
            if dependencies.is_empty() {
                writeln!(out, "{} ({})", name, state)?;
            } else {
                writeln!(out, "{} ({}) <- {}", name, state, dependencies.join(", "))?;
            }
        }
        Ok(())
    }
}
