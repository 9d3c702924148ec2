use std::io::Write;

use super::Command;
use crate::engine::{Engine, EngineResult};

/// Drop cached table rows so they are fetched again on next use.
pub struct ExpireCommand;

impl Command for ExpireCommand {
    fn help(&self) -> &str {
        ":expire - Expire all initialized tables (tables are re-created when next time they're queried)\n\
         :expire TABLE1[ TABLE2...] - Expire specified tables"
    }

    fn execute(&self, args: &[String], engine: &mut Engine, out: &mut dyn Write) -> EngineResult<()> {
        if args.is_empty() {
            writeln!(out, "Expiring ALL tables...")?;
            if let Err(e) = engine.store_mut().invalidate_all_tables() {
                writeln!(out, "Failed to expire table: {}", e)?;
            }
            return Ok(());
        }

        for table in args {
            writeln!(out, "Expiring table {}...", table)?;
            if let Err(e) = engine.store_mut().invalidate_table(table) {
                writeln!(out, "Failed to expire table: {}", e)?;
            }
        }
        Ok(())
    }
}
