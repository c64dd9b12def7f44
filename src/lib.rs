pub mod aggregate;
pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod ingestion;
pub mod observability;
pub mod record;
pub mod sample;
pub mod semantic;
pub mod session;

pub use aggregate::{
    group_by, group_by_many, kpis, monthly_trend, rank_by_revenue, top_by_revenue, Aggregate,
    GroupKey, Kpis,
};
pub use catalog::{display_label, distinct_values, DimensionCatalog};
pub use config::PipelineConfig;
pub use error::{PipelineError, Result};
pub use export::serialize;
pub use filter::{Constraint, FilterSpec};
pub use ingestion::{
    normalize, IngestionOrchestrator, IngestionReport, Normalized, Normalizer, SourceFormat,
};
pub use observability::{init_default_tracing, init_tracing, SessionMetrics};
pub use record::{fields, Record, RecordSet, Value};
pub use sample::{sample_bike_sales, SAMPLE_SOURCE};
pub use semantic::{Dimension, FieldRef, Measure};
pub use session::{IngestOutcome, IngestionTicket, PipelineSession};
