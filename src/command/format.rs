use std::io::Write;

use super::Command;
use crate::engine::{Engine, EngineResult};

/// Switch the active output format.
pub struct FormatCommand;

impl Command for FormatCommand {
    fn help(&self) -> &str {
        ":format FORMAT - Set output format"
    }

    fn execute(&self, args: &[String], engine: &mut Engine, out: &mut dyn Write) -> EngineResult<()> {
        let [format] = args else {
            writeln!(out, "Error usage: :format FORMAT")?;
            return Ok(());
        };

        match engine.set_output_format_by_name(format) {
            Ok(()) => writeln!(out, "Output format set to '{}'", format)?,
            Err(_) => writeln!(out, "Error: no such format '{}'", format)?,
        }
        Ok(())
    }
}
