//! Ingestion Connector Trait - Abstract interface for raw payload sources

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// One parsed row, before field cleaning
pub type RawRow = Map<String, Value>;

/// Declared or inferred payload format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// Delimited text with a header row; delimiter auto-detected
    Delimited,
    /// A JSON object or an array of objects
    Json,
}

impl SourceFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFormat::Delimited => "delimited",
            SourceFormat::Json => "json",
        }
    }

    /// Resolve a format tag or file extension (`csv`, `.tsv`, `json`, ...).
    pub fn from_tag(tag: &str) -> Result<Self> {
        let normalized = tag.trim().trim_start_matches('.').to_ascii_lowercase();
        match normalized.as_str() {
            "csv" | "tsv" | "tab" | "psv" | "txt" | "delimited" | "text/csv" => {
                Ok(SourceFormat::Delimited)
            }
            "json" | "application/json" => Ok(SourceFormat::Json),
            _ => Err(PipelineError::UnsupportedFormat(format!(
                "'{}' is not a supported format (expected delimited text or JSON)",
                tag
            ))),
        }
    }

    /// Resolve from a file's extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| {
                PipelineError::UnsupportedFormat(format!(
                    "{} has no file extension to infer a format from",
                    path.display()
                ))
            })?;
        Self::from_tag(extension)
    }

    /// Guess the format from content: JSON when the payload opens with `{` or `[`.
    pub fn sniff(raw: &[u8]) -> Self {
        let raw = raw.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(raw);
        match raw.iter().find(|b| !b.is_ascii_whitespace()) {
            Some(b'{') | Some(b'[') => SourceFormat::Json,
            _ => SourceFormat::Delimited,
        }
    }
}

impl FromStr for SourceFormat {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_tag(s)
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result from connector fetch
#[derive(Clone, Debug, Default)]
pub struct ConnectorResult {
    /// Parsed rows, in source order
    pub rows: Vec<RawRow>,

    /// Delimiter chosen for delimited text
    pub delimiter: Option<char>,

    /// Has more data (false if this was the last batch)
    pub has_more: bool,
}

/// Ingestion Connector Trait
///
/// Implementations:
/// - CsvConnector: delimited text with a header row
/// - JsonConnector: a JSON object or array of objects
pub trait IngestionConnector: Send {
    /// Fetch next batch of rows
    fn fetch(&mut self) -> Result<ConnectorResult>;

    /// Get source ID (file name or caller-supplied label)
    fn source_id(&self) -> &str;

    /// Get source format
    fn source_format(&self) -> SourceFormat;
}
