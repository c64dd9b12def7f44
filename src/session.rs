//! Pipeline Session - Query interface for the rendering layer
//!
//! Owns the active RecordSet and FilterSpec. A new ingestion replaces the
//! RecordSet wholesale; a failed ingestion leaves it untouched. Every query is
//! recomputed from the current state.

use crate::aggregate::{self, Aggregate, Kpis};
use crate::catalog::{self, DimensionCatalog};
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::export;
use crate::filter::{self, Constraint, FilterSpec};
use crate::ingestion::{IngestionReport, Normalized, Normalizer, SourceFormat};
use crate::observability::SessionMetrics;
use crate::record::{RecordSet, Value};
use crate::sample::{sample_bike_sales, SAMPLE_SOURCE};
use crate::semantic::Dimension;
use serde_json::Value as JsonValue;
use tracing::{debug, info, warn};

/// Claim on the next RecordSet replacement. Only the most recently issued
/// ticket can still be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionTicket(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    /// The new RecordSet is now active
    Applied(IngestionReport),
    /// A newer ingestion was started; this result was discarded
    Superseded,
}

#[derive(Debug, Default)]
pub struct PipelineSession {
    config: PipelineConfig,
    normalizer: Normalizer,
    records: RecordSet,
    filter: FilterSpec,
    report: Option<IngestionReport>,
    source: Option<String>,
    generation: u64,
    metrics: SessionMetrics,
}

impl PipelineSession {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            normalizer: Normalizer::new(config.clone()),
            config,
            ..Default::default()
        }
    }

    /// A session preloaded with the built-in bike sales sample.
    pub fn with_sample(config: PipelineConfig) -> Self {
        let mut session = Self::new(config);
        session.load_sample();
        session
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The full, unfiltered RecordSet.
    pub fn record_set(&self) -> &RecordSet {
        &self.records
    }

    pub fn last_report(&self) -> Option<&IngestionReport> {
        self.report.as_ref()
    }

    /// Name of what the active RecordSet came from, if known.
    pub fn source_name(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn metrics(&self) -> &SessionMetrics {
        &self.metrics
    }

    /// Replace the active RecordSet. Any in-flight ingestion is superseded.
    pub fn set_record_set(&mut self, records: RecordSet) {
        self.generation += 1;
        self.report = None;
        self.source = None;
        self.records = records;
    }

    /// Replace the active RecordSet with the built-in sample.
    pub fn load_sample(&mut self) {
        self.set_record_set(sample_bike_sales());
        self.source = Some(SAMPLE_SOURCE.to_string());
    }

    /// Normalize a payload and, if it succeeds, make it the active RecordSet.
    pub fn ingest(
        &mut self,
        source: &str,
        raw: &[u8],
        format: SourceFormat,
    ) -> Result<IngestionReport> {
        let ticket = self.begin_ingestion();
        let result = self.normalizer.normalize_with_report(source, raw, format);
        match self.finish_ingestion(ticket, result)? {
            IngestOutcome::Applied(report) => Ok(report),
            IngestOutcome::Superseded => Err(PipelineError::Ingestion(format!(
                "ingestion of {} was superseded",
                source
            ))),
        }
    }

    /// Start an ingestion whose result arrives later, e.g. from
    /// `IngestionOrchestrator`. Starting another one supersedes this ticket.
    pub fn begin_ingestion(&mut self) -> IngestionTicket {
        self.generation += 1;
        IngestionTicket(self.generation)
    }

    /// Complete an ingestion. Stale tickets are discarded without touching
    /// state; errors on a current ticket leave the previous RecordSet active.
    pub fn finish_ingestion(
        &mut self,
        ticket: IngestionTicket,
        result: Result<Normalized>,
    ) -> Result<IngestOutcome> {
        if ticket.0 != self.generation {
            debug!(
                ticket = ticket.0,
                current = self.generation,
                "discarding superseded ingestion"
            );
            self.metrics.record_superseded();
            return Ok(IngestOutcome::Superseded);
        }

        match result {
            Ok(Normalized { records, report }) => {
                info!(
                    run_id = %report.run_id,
                    source = %report.source,
                    records = records.len(),
                    "record set replaced"
                );
                self.metrics.record_ingestion(records.len());
                self.records = records;
                self.source = Some(report.source.clone());
                self.report = Some(report.clone());
                Ok(IngestOutcome::Applied(report))
            }
            Err(e) => {
                warn!(error = %e, "ingestion rejected, keeping previous record set");
                self.metrics.record_rejection(e.class());
                Err(e)
            }
        }
    }

    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    pub fn set_filter(&mut self, spec: FilterSpec) {
        for (field, constraint) in spec.active() {
            self.metrics.record_dimension_usage(field);
            if let Constraint::Equals { value } = constraint {
                let known = catalog::distinct_values(&self.records, field)
                    .iter()
                    .any(|v| v.matches(value));
                if !known && !value.is_null() {
                    warn!(field, value = %value, "filter value not present in data");
                }
            }
        }
        self.metrics.record_filter();
        self.filter = spec;
    }

    /// Parse the UI's filter state and apply it. On error the current filter stays.
    pub fn set_filter_json(&mut self, state: &JsonValue) -> Result<()> {
        let spec = FilterSpec::from_json(state)?;
        self.set_filter(spec);
        Ok(())
    }

    pub fn clear_filter(&mut self) {
        self.filter = FilterSpec::new();
    }

    pub fn current_filtered(&self) -> RecordSet {
        filter::apply(&self.records, &self.filter)
    }

    pub fn current_kpis(&self) -> Kpis {
        aggregate::kpis(&self.current_filtered())
    }

    /// Groups of the filtered records, first-encountered order.
    pub fn group_by(&self, dimension: &Dimension) -> Vec<Aggregate> {
        aggregate::group_by(&self.current_filtered(), dimension)
    }

    /// Top groups of the filtered records by revenue, `top_n` from config.
    pub fn top_by_revenue(&self, dimension: &Dimension) -> Vec<Aggregate> {
        aggregate::top_by_revenue(&self.current_filtered(), dimension, self.config.top_n)
    }

    pub fn monthly_trend(&self) -> Vec<Aggregate> {
        aggregate::monthly_trend(&self.current_filtered())
    }

    /// Filter choices, drawn from the full RecordSet.
    pub fn distinct_values(&self, dimension: &Dimension) -> Vec<Value> {
        catalog::distinct_values(&self.records, dimension.clone())
    }

    pub fn catalog(&self) -> DimensionCatalog {
        DimensionCatalog::filterable(&self.records)
    }

    pub fn export_filtered(&self) -> Result<String> {
        export::serialize(&self.current_filtered())
    }
}
