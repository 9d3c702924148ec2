//! Result shapes handed from the store to renderers.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rusqlite::types::ValueRef;

use super::error::{StoreError, StoreResult};

/// A result column: its label and, when it comes straight from a table,
/// the declared SQL type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub decl_type: Option<String>,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            decl_type: None,
        }
    }

    pub fn typed(name: impl Into<String>, decl_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            decl_type: Some(decl_type.into()),
        }
    }

    fn is_boolean(&self) -> bool {
        self.decl_type
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case("BOOLEAN") || t.eq_ignore_ascii_case("BOOL"))
    }
}

/// A single cell of a result row.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Boolean(bool),
    Blob(Vec<u8>),
}

impl Value {
    /// Convert an engine value, typing integers of boolean columns as booleans.
    fn from_sql(value: ValueRef<'_>, column: &Column) -> Self {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) if column.is_boolean() => Value::Boolean(i != 0),
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(f) => Value::Real(f),
            ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
            ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
        }
    }
}

/// Natural textual form; `null` for NULL and base64 for blobs.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(r) => write!(f, "{}", r),
            Value::Text(s) => f.write_str(s),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Blob(bytes) => f.write_str(&STANDARD.encode(bytes)),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Forward-only, single-pass access to a query result.
pub trait RowCursor {
    /// Result columns, in order.
    fn columns(&self) -> &[Column];

    /// The next row, or `None` once the result is exhausted.
    fn next_row(&mut self) -> StoreResult<Option<Vec<Value>>>;
}

/// Cursor over a live embedded-engine result.
pub struct QueryRows<'stmt> {
    columns: Vec<Column>,
    rows: rusqlite::Rows<'stmt>,
}

impl<'stmt> QueryRows<'stmt> {
    pub(crate) fn new(columns: Vec<Column>, rows: rusqlite::Rows<'stmt>) -> Self {
        Self { columns, rows }
    }
}

impl RowCursor for QueryRows<'_> {
    fn columns(&self) -> &[Column] {
        &self.columns
    }

    fn next_row(&mut self) -> StoreResult<Option<Vec<Value>>> {
        let Some(row) = self.rows.next().map_err(StoreError::query)? else {
            return Ok(None);
        };
        let mut values = Vec::with_capacity(self.columns.len());
        for (idx, column) in self.columns.iter().enumerate() {
            let value = row.get_ref(idx).map_err(StoreError::query)?;
            values.push(Value::from_sql(value, column));
        }
        Ok(Some(values))
    }
}

/// Cursor over rows held in memory.
#[derive(Debug, Clone)]
pub struct MemoryRows {
    columns: Vec<Column>,
    rows: std::vec::IntoIter<Vec<Value>>,
}

impl MemoryRows {
    pub fn new(columns: Vec<Column>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns,
            rows: rows.into_iter(),
        }
    }
}

impl RowCursor for MemoryRows {
    fn columns(&self) -> &[Column] {
        &self.columns
    }

    fn next_row(&mut self) -> StoreResult<Option<Vec<Value>>> {
        Ok(self.rows.next())
    }
}
