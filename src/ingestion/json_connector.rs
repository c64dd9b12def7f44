//! JSON Connector - Accepts a raw JSON document for ingestion

use crate::error::{PipelineError, Result};
use crate::ingestion::connector::{ConnectorResult, IngestionConnector, RawRow, SourceFormat};
use serde_json::Value;

/// JSON Connector - Wraps a JSON object (one row) or an array of objects.
pub struct JsonConnector {
    source_id: String,
    json_text: String,
    consumed: bool,
}

impl JsonConnector {
    pub fn new(source_id: String, json_text: String) -> Self {
        Self {
            source_id,
            json_text,
            consumed: false,
        }
    }

    fn parse_rows(&self) -> Result<Vec<RawRow>> {
        let document: Value = serde_json::from_str(&self.json_text)
            .map_err(|e| PipelineError::Format(format!("Malformed JSON document: {}", e)))?;

        match document {
            Value::Object(obj) => Ok(vec![obj]),
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(idx, item)| match item {
                    Value::Object(obj) => Ok(obj),
                    other => Err(PipelineError::Format(format!(
                        "Array element {} is {}, expected an object",
                        idx,
                        json_kind(&other)
                    ))),
                })
                .collect(),
            other => Err(PipelineError::Format(format!(
                "Top-level JSON value is {}, expected an object or an array of objects",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl IngestionConnector for JsonConnector {
    fn fetch(&mut self) -> Result<ConnectorResult> {
        if self.consumed {
            return Ok(ConnectorResult::default());
        }

        let rows = self.parse_rows()?;
        self.consumed = true;

        Ok(ConnectorResult {
            rows,
            delimiter: None,
            has_more: false,
        })
    }

    fn source_id(&self) -> &str {
        &self.source_id
    }

    fn source_format(&self) -> SourceFormat {
        SourceFormat::Json
    }
}
