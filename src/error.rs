use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Format error: {0}")]
    Format(String),

    #[error("Size limit exceeded: payload is {size} bytes, limit is {limit} bytes")]
    SizeLimit { size: u64, limit: u64 },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Filter validation error: {0}")]
    FilterValidation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Ingestion error: {0}")]
    Ingestion(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl PipelineError {
    /// Short, stable name of the error class, used as a metrics key.
    pub fn class(&self) -> &'static str {
        match self {
            PipelineError::Format(_) => "format",
            PipelineError::SizeLimit { .. } => "size_limit",
            PipelineError::UnsupportedFormat(_) => "unsupported_format",
            PipelineError::FilterValidation(_) => "filter_validation",
            PipelineError::Config(_) => "config",
            PipelineError::Ingestion(_) => "ingestion",
            PipelineError::Io(_) => "io",
            PipelineError::Json(_) => "json",
            PipelineError::Csv(_) => "csv",
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
