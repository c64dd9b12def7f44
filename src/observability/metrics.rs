//! Session Metrics
//!
//! Usage counters for one pipeline session.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionMetrics {
    pub ingestions: u64,
    pub records_ingested: u64,
    pub superseded_ingestions: u64,
    pub filters_applied: u64,
    rejected_ingestions: HashMap<String, u64>,
    dimension_usage: HashMap<String, u64>,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_ingestion(&mut self, records: usize) {
        self.ingestions += 1;
        self.records_ingested += records as u64;
    }

    pub fn record_rejection(&mut self, error_class: &str) {
        *self
            .rejected_ingestions
            .entry(error_class.to_string())
            .or_insert(0) += 1;
    }

    pub fn record_superseded(&mut self) {
        self.superseded_ingestions += 1;
    }

    pub fn record_filter(&mut self) {
        self.filters_applied += 1;
    }

    pub fn record_dimension_usage(&mut self, dimension_name: &str) {
        *self
            .dimension_usage
            .entry(dimension_name.to_string())
            .or_insert(0) += 1;
    }

    pub fn rejected_ingestions(&self) -> &HashMap<String, u64> {
        &self.rejected_ingestions
    }

    pub fn dimension_usage(&self) -> &HashMap<String, u64> {
        &self.dimension_usage
    }

    pub fn total_rejections(&self) -> u64 {
        self.rejected_ingestions.values().sum()
    }
}
