//! Ingestion Module
//!
//! Turns uploaded payloads into canonical record sets:
//! - Format resolution and sniffing
//! - Delimiter auto-detection
//! - Value coercion and monetary cleaning
//! - Size limits
//! - Async file loading off the caller's path

pub mod coercion;
pub mod connector;
pub mod csv_connector;
pub mod json_connector;
pub mod normalizer;
pub mod orchestrator;

pub use connector::{ConnectorResult, IngestionConnector, RawRow, SourceFormat};
pub use csv_connector::{detect_delimiter, CsvConnector, DELIMITER_CANDIDATES};
pub use json_connector::JsonConnector;
pub use normalizer::{normalize, Normalized, Normalizer};
pub use orchestrator::IngestionOrchestrator;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ingestion report
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IngestionReport {
    /// Ingestion run ID
    pub run_id: String,

    /// File name or caller-supplied label
    pub source: String,

    pub format: SourceFormat,

    /// Delimiter used, for delimited text
    pub delimiter: Option<char>,

    /// Rows parsed from the payload, including dropped ones
    pub rows_read: usize,

    /// Rows dropped because every field was empty
    pub rows_dropped: usize,

    /// Number of records ingested
    pub records_ingested: usize,

    /// Field names seen, in first-seen order
    pub fields: Vec<String>,

    pub ingested_at: DateTime<Utc>,
}
