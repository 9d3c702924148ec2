use std::io::Write;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::{Map, Number};

use super::{OutputFormat, RenderResult};
use crate::store::{RowCursor, Value};

/// The whole result as one JSON array of objects keyed by column label,
/// followed by a newline.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

fn to_json(value: Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Integer(i) => serde_json::Value::Number(i.into()),
        Value::Real(r) => Number::from_f64(r)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Text(s) => serde_json::Value::String(s),
        Value::Boolean(b) => serde_json::Value::Bool(b),
        Value::Blob(bytes) => serde_json::Value::String(STANDARD.encode(bytes)),
    }
}

impl OutputFormat for JsonFormat {
    fn render(&self, rows: &mut dyn RowCursor, out: &mut dyn Write) -> RenderResult<()> {
        let labels: Vec<String> = rows.columns().iter().map(|c| c.name.clone()).collect();

        let mut objects = Vec::new();
        while let Some(row) = rows.next_row()? {
            let object: Map<String, serde_json::Value> = labels
                .iter()
                .cloned()
                .zip(row.into_iter().map(to_json))
                .collect();
            objects.push(serde_json::Value::Object(object));
        }

        let encoded = serde_json::to_vec(&objects)?;
        out.write_all(&encoded)?;
        out.write_all(b"\n")?;
        Ok(())
    }
}
