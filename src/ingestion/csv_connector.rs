//! CSV Connector - Accepts raw delimited text and converts it into rows

use crate::error::{PipelineError, Result};
use crate::ingestion::coercion::coerce_cell;
use crate::ingestion::connector::{ConnectorResult, IngestionConnector, RawRow, SourceFormat};
use csv::ReaderBuilder;
use itertools::Itertools;
use tracing::{debug, warn};

/// Delimiters tried by auto-detection, in tie-break order.
pub const DELIMITER_CANDIDATES: [u8; 4] = [b',', b'\t', b'|', b';'];

/// CSV Connector - Wraps provided delimited text and converts it into JSON rows.
pub struct CsvConnector {
    source_id: String,
    csv_text: String,
    sample_rows: usize,
    delimiter: Option<u8>,
    consumed: bool,
}

impl CsvConnector {
    pub fn new(source_id: String, csv_text: String, sample_rows: usize) -> Self {
        Self {
            source_id,
            csv_text,
            sample_rows,
            delimiter: None,
            consumed: false,
        }
    }

    /// Skip detection and use a fixed delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    fn parse_rows(&self, delimiter: u8) -> Result<Vec<RawRow>> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(self.csv_text.as_bytes());

        let headers = rdr
            .headers()
            .map_err(|e| PipelineError::Format(format!("Failed to read CSV headers: {}", e)))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect::<Vec<_>>();

        let duplicates = duplicate_headers(&headers);
        if !duplicates.is_empty() {
            warn!(
                source = %self.source_id,
                headers = ?duplicates,
                "duplicate column headers, later columns overwrite earlier ones"
            );
        }

        let mut out = Vec::new();
        let mut surplus_rows = 0usize;
        for result in rdr.records() {
            let record = result
                .map_err(|e| PipelineError::Format(format!("Failed to read CSV record: {}", e)))?;
            if record.len() > headers.len() {
                surplus_rows += 1;
            }

            let mut obj = RawRow::new();
            for (idx, header) in headers.iter().enumerate() {
                let cell = record.get(idx).unwrap_or("");
                obj.insert(header.clone(), coerce_cell(cell));
            }

            out.push(obj);
        }

        if surplus_rows > 0 {
            debug!(
                source = %self.source_id,
                surplus_rows,
                "ignored cells beyond the header width"
            );
        }

        Ok(out)
    }
}

/// Header names that occur more than once, in first-repeat order.
pub fn duplicate_headers(headers: &[String]) -> Vec<&str> {
    headers.iter().map(String::as_str).duplicates().collect()
}

/// Pick the candidate delimiter that yields the most consistent field count
/// over the first `sample_rows` rows.
///
/// A candidate must split the header into at least two fields. Among eligible
/// candidates the one with the most rows matching the header width wins; ties
/// go to the wider header, then to candidate order. Falls back to `,`.
pub fn detect_delimiter(text: &str, sample_rows: usize) -> u8 {
    let mut best: Option<(u8, usize, usize)> = None;

    for &candidate in DELIMITER_CANDIDATES.iter() {
        let mut rdr = ReaderBuilder::new()
            .delimiter(candidate)
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let counts: Vec<usize> = rdr
            .records()
            .take(sample_rows.max(1))
            .filter_map(|r| r.ok())
            .map(|r| r.len())
            .collect();

        let header_width = match counts.first() {
            Some(&w) if w > 1 => w,
            _ => continue,
        };
        let consistent = counts.iter().filter(|&&c| c == header_width).count();

        let better = match best {
            None => true,
            Some((_, best_consistent, best_width)) => {
                (consistent, header_width) > (best_consistent, best_width)
            }
        };
        if better {
            best = Some((candidate, consistent, header_width));
        }
    }

    best.map(|(d, _, _)| d).unwrap_or(b',')
}

impl IngestionConnector for CsvConnector {
    fn fetch(&mut self) -> Result<ConnectorResult> {
        if self.consumed {
            return Ok(ConnectorResult::default());
        }

        let delimiter = self
            .delimiter
            .unwrap_or_else(|| detect_delimiter(&self.csv_text, self.sample_rows));
        debug!(source = %self.source_id, delimiter = ?(delimiter as char), "delimiter selected");

        let rows = self.parse_rows(delimiter)?;
        self.consumed = true;

        Ok(ConnectorResult {
            rows,
            delimiter: Some(delimiter as char),
            has_more: false,
        })
    }

    fn source_id(&self) -> &str {
        &self.source_id
    }

    fn source_format(&self) -> SourceFormat {
        SourceFormat::Delimited
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_detects_each_candidate() {
        assert_eq!(detect_delimiter("a,b,c\n1,2,3", 10), b',');
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3", 10), b'\t');
        assert_eq!(detect_delimiter("a|b|c\n1|2|3", 10), b'|');
        assert_eq!(detect_delimiter("a;b;c\n1;2;3", 10), b';');
    }

    #[test]
    fn test_prefers_consistent_delimiter_over_incidental_commas() {
        let text = "Country;Revenue\n\"US\";\"1,200\"\nDE;3,400\nFR;50";
        assert_eq!(detect_delimiter(text, 10), b';');
    }

    #[test]
    fn test_single_column_falls_back_to_comma() {
        assert_eq!(detect_delimiter("Country\nUS\nDE", 10), b',');
    }

    #[test]
    fn test_short_rows_are_padded_with_null() {
        let mut connector = CsvConnector::new("t".into(), "a,b,c\n1,2".into(), 10);
        let result = connector.fetch().unwrap();
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].get("c"), Some(&Value::Null));
        assert!(!result.has_more);
        assert!(connector.fetch().unwrap().rows.is_empty());
    }

    #[test]
    fn test_duplicate_headers_reported_and_last_cell_wins() {
        let headers: Vec<String> = ["Revenue", "Country", "Revenue"]
            .iter()
            .map(|h| h.to_string())
            .collect();
        assert_eq!(duplicate_headers(&headers), vec!["Revenue"]);

        let mut connector =
            CsvConnector::new("t".into(), "Revenue,Country, Revenue\n1,US,2".into(), 10);
        let result = connector.fetch().unwrap();
        assert_eq!(result.rows[0].len(), 2);
        assert_eq!(result.rows[0].get("Revenue"), Some(&Value::from(2)));
    }
}
