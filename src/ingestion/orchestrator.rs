//! Ingestion Orchestrator - Async boundary around the synchronous normalizer
//!
//! Reading the payload happens on the tokio runtime; normalization runs on a
//! blocking worker over the fully buffered bytes.

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::ingestion::connector::SourceFormat;
use crate::ingestion::normalizer::{Normalized, Normalizer};
use std::path::Path;
use tracing::{info, warn};

/// Ingestion Orchestrator - Loads files and byte payloads without blocking the caller
#[derive(Debug, Clone, Default)]
pub struct IngestionOrchestrator {
    normalizer: Normalizer,
}

impl IngestionOrchestrator {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            normalizer: Normalizer::new(config),
        }
    }

    /// Load a file. The format comes from `format` or, when absent, the file extension.
    ///
    /// The size limit is checked against file metadata before any bytes are read.
    pub async fn load_path(
        &self,
        path: impl AsRef<Path>,
        format: Option<SourceFormat>,
    ) -> Result<Normalized> {
        let path = path.as_ref();
        let format = match format {
            Some(format) => format,
            None => SourceFormat::from_path(path)?,
        };

        let metadata = tokio::fs::metadata(path).await?;
        if let Err(e) = self.normalizer.check_size(metadata.len()) {
            warn!(path = %path.display(), size = metadata.len(), "rejected oversized file");
            return Err(e);
        }

        let raw = tokio::fs::read(path).await?;
        let source = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        info!(source = %source, bytes = raw.len(), "loaded file for ingestion");
        self.load_bytes(source, raw, format).await
    }

    /// Normalize an in-memory payload on a blocking worker.
    pub async fn load_bytes(
        &self,
        source: String,
        raw: Vec<u8>,
        format: SourceFormat,
    ) -> Result<Normalized> {
        let normalizer = self.normalizer.clone();
        tokio::task::spawn_blocking(move || normalizer.normalize_with_report(&source, &raw, format))
            .await
            .map_err(|e| PipelineError::Ingestion(format!("Normalization worker failed: {}", e)))?
    }
}
