use std::io::Write;

use super::{stringify, OutputFormat, RenderResult};
use crate::store::RowCursor;

/// Delimiter-separated values with a `# `-prefixed header line.
///
/// ```text
/// # ID HOST IS_CONTROLLER
/// 1 host1.com true
/// 2 host2.com false
/// ```
#[derive(Debug, Clone)]
pub struct DelimitedFormat {
    delimiter: &'static str,
}

impl DelimitedFormat {
    pub const fn new(delimiter: &'static str) -> Self {
        Self { delimiter }
    }

    /// Space-separated values.
    pub const fn ssv() -> Self {
        Self::new(" ")
    }

    /// Comma-separated values.
    pub const fn csv() -> Self {
        Self::new(",")
    }
}

impl OutputFormat for DelimitedFormat {
    fn render(&self, rows: &mut dyn RowCursor, out: &mut dyn Write) -> RenderResult<()> {
        let header: Vec<&str> = rows.columns().iter().map(|c| c.name.as_str()).collect();
        writeln!(out, "# {}", header.join(self.delimiter))?;

        while let Some(row) = rows.next_row()? {
            let fields: Vec<String> = row.iter().map(stringify).collect();
            writeln!(out, "{}", fields.join(self.delimiter))?;
        }
        Ok(())
    }
}
