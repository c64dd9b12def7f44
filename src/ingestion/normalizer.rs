//! Record Normalizer - Raw payload to canonical RecordSet
//!
//! Pure and synchronous over a fully buffered payload. Either the whole
//! payload normalizes or an error is returned; nothing partial escapes.

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::ingestion::coercion::clean_value;
use crate::ingestion::connector::{IngestionConnector, RawRow, SourceFormat};
use crate::ingestion::csv_connector::CsvConnector;
use crate::ingestion::json_connector::JsonConnector;
use crate::ingestion::IngestionReport;
use crate::record::{Record, RecordSet};
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Records plus the report describing how they were produced
#[derive(Debug, Clone)]
pub struct Normalized {
    pub records: RecordSet,
    pub report: IngestionReport,
}

#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: PipelineConfig,
}

impl Normalizer {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Reject payloads larger than the configured limit.
    pub fn check_size(&self, size: u64) -> Result<()> {
        if size > self.config.max_payload_bytes {
            return Err(PipelineError::SizeLimit {
                size,
                limit: self.config.max_payload_bytes,
            });
        }
        Ok(())
    }

    pub fn normalize(&self, raw: &[u8], format: SourceFormat) -> Result<RecordSet> {
        Ok(self.normalize_with_report("inline", raw, format)?.records)
    }

    pub fn normalize_with_report(
        &self,
        source: &str,
        raw: &[u8],
        format: SourceFormat,
    ) -> Result<Normalized> {
        self.check_size(raw.len() as u64)?;
        let text = decode(raw)?;

        let mut connector: Box<dyn IngestionConnector> = match format {
            SourceFormat::Delimited => Box::new(CsvConnector::new(
                source.to_string(),
                text.to_string(),
                self.config.delimiter_sample_rows,
            )),
            SourceFormat::Json => Box::new(JsonConnector::new(source.to_string(), text.to_string())),
        };

        let mut rows: Vec<RawRow> = Vec::new();
        let mut delimiter = None;
        let mut has_more = true;

        while has_more {
            let result = connector.fetch()?;
            rows.extend(result.rows);
            delimiter = delimiter.or(result.delimiter);
            has_more = result.has_more;
        }

        let rows_read = rows.len();
        let records: RecordSet = rows
            .into_iter()
            .map(clean_row)
            .filter(|record| !record.is_blank())
            .collect();
        let rows_dropped = rows_read - records.len();

        if rows_dropped > 0 {
            debug!(source, rows_dropped, "dropped blank rows");
        }

        let report = IngestionReport {
            run_id: Uuid::new_v4().to_string(),
            source: connector.source_id().to_string(),
            format: connector.source_format(),
            delimiter,
            rows_read,
            rows_dropped,
            records_ingested: records.len(),
            fields: records.field_union(),
            ingested_at: Utc::now(),
        };

        info!(
            source,
            format = %report.format,
            records = report.records_ingested,
            rows_dropped,
            "normalized payload"
        );

        Ok(Normalized { records, report })
    }
}

/// Normalize with default configuration.
pub fn normalize(raw: &[u8], format: SourceFormat) -> Result<RecordSet> {
    Normalizer::default().normalize(raw, format)
}

fn decode(raw: &[u8]) -> Result<&str> {
    let raw = raw.strip_prefix(UTF8_BOM).unwrap_or(raw);
    std::str::from_utf8(raw)
        .map_err(|e| PipelineError::Format(format!("Payload is not valid UTF-8: {}", e)))
}

fn clean_row(row: RawRow) -> Record {
    row.into_iter()
        .map(|(key, raw)| {
            let key = key.trim().to_string();
            let value = clean_value(&key, raw);
            (key, value)
        })
        .collect()
}
