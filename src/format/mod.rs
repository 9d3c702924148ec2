//! Output formats.
//!
//! An [`OutputFormat`] consumes a query result cursor and writes it to the
//! output sink. Built-ins:
//!
//! | name    | shape                                   |
//! |---------|-----------------------------------------|
//! | `table` | box-drawn grid                          |
//! | `ssv`   | `# ` header line, space-separated rows  |
//! | `csv`   | `# ` header line, comma-separated rows  |
//! | `json`  | one array of row objects                |

mod delimited;
mod grid;
mod json;

use std::io::{self, Write};
use std::sync::Arc;

use thiserror::Error;

use crate::store::{RowCursor, StoreError, Value};

pub use delimited::DelimitedFormat;
pub use grid::GridFormat;
pub use json::JsonFormat;

pub type RenderResult<T> = Result<T, RenderError>;

/// Errors raised while rendering a result.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The output sink failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),

    /// Reading the next row failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to encode result: {0}")]
    Json(#[from] serde_json::Error),
}

/// A renderer for query results.
pub trait OutputFormat: Send + Sync {
    fn render(&self, rows: &mut dyn RowCursor, out: &mut dyn Write) -> RenderResult<()>;
}

/// Textual form of a value used by the text renderers.
pub fn stringify(value: &Value) -> String {
    value.to_string()
}

/// The built-in output formats.
pub fn default_formats() -> Vec<(&'static str, Arc<dyn OutputFormat>)> {
    vec![
        ("table", Arc::new(GridFormat) as Arc<dyn OutputFormat>),
        ("ssv", Arc::new(DelimitedFormat::ssv())),
        ("csv", Arc::new(DelimitedFormat::csv())),
        ("json", Arc::new(JsonFormat)),
    ]
}
