use std::io::Write;

use super::Command;
use crate::engine::{Engine, EngineResult};

/// Show help for the interactive console.
pub struct HelpCommand;

impl Command for HelpCommand {
    fn help(&self) -> &str {
        ":help - Show this help"
    }

    fn execute(&self, _args: &[String], engine: &mut Engine, out: &mut dyn Write) -> EngineResult<()> {
        writeln!(out, "Execute SQL:")?;
        writeln!(out, "  SELECT * FROM $table WHERE condA = x LIMIT 3;")?;
        writeln!(out, "Meta commands:")?;

        let mut lines: Vec<String> = engine
            .commands()
            .iter()
            .into_iter()
            .map(|(_, command)| command.help().trim().to_string())
            .collect();
        lines.sort();
        for line in lines {
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }
}
