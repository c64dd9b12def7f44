//! Export Serializer - RecordSet to comma-separated text
//!
//! The header is the union of every record's fields in first-seen order, so a
//! field that only appears in later records is still exported. Cells render as
//! plain values: empty for null, numbers without currency formatting.

use crate::error::{PipelineError, Result};
use crate::record::RecordSet;
use csv::Writer;
use tracing::debug;

pub fn serialize(records: &RecordSet) -> Result<String> {
    let header = records.field_union();
    if header.is_empty() {
        return Ok(String::new());
    }

    let mut wtr = Writer::from_writer(Vec::new());
    wtr.write_record(&header)?;
    for record in records {
        wtr.write_record(header.iter().map(|field| record.value(field).to_string()))?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| PipelineError::Io(e.into_error()))?;
    debug!(records = records.len(), fields = header.len(), "serialized export");

    String::from_utf8(bytes)
        .map_err(|e| PipelineError::Format(format!("Export produced invalid UTF-8: {}", e)))
}
