//! Pipeline Configuration
//!
//! Limits and tuning knobs for ingestion and ranking. Values come from
//! defaults, a JSON file, or the process environment (a `.env` file is
//! honoured).

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const ENV_MAX_PAYLOAD_BYTES: &str = "SALES_PIPELINE_MAX_PAYLOAD_BYTES";
pub const ENV_TOP_N: &str = "SALES_PIPELINE_TOP_N";
pub const ENV_DELIMITER_SAMPLE_ROWS: &str = "SALES_PIPELINE_DELIMITER_SAMPLE_ROWS";

/// 5 MiB
pub const DEFAULT_MAX_PAYLOAD_BYTES: u64 = 5 * 1024 * 1024;
pub const DEFAULT_TOP_N: usize = 10;
pub const DEFAULT_DELIMITER_SAMPLE_ROWS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Hard upper bound on an ingestion payload. Larger payloads are rejected, never truncated.
    pub max_payload_bytes: u64,

    /// Number of groups kept by the "top-N by revenue" ranking.
    pub top_n: usize,

    /// Number of leading lines inspected when guessing the delimiter.
    pub delimiter_sample_rows: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            top_n: DEFAULT_TOP_N,
            delimiter_sample_rows: DEFAULT_DELIMITER_SAMPLE_ROWS,
        }
    }
}

impl PipelineConfig {
    pub fn with_max_payload_bytes(mut self, max_payload_bytes: u64) -> Self {
        self.max_payload_bytes = max_payload_bytes;
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Load from the environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_MAX_PAYLOAD_BYTES) {
            config.max_payload_bytes = parse_setting(ENV_MAX_PAYLOAD_BYTES, &raw)?;
        }
        if let Some(raw) = lookup(ENV_TOP_N) {
            config.top_n = parse_setting(ENV_TOP_N, &raw)?;
        }
        if let Some(raw) = lookup(ENV_DELIMITER_SAMPLE_ROWS) {
            config.delimiter_sample_rows = parse_setting(ENV_DELIMITER_SAMPLE_ROWS, &raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON document. Missing keys fall back to defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: PipelineConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_payload_bytes == 0 {
            return Err(PipelineError::Config(
                "max_payload_bytes must be greater than zero".to_string(),
            ));
        }
        if self.delimiter_sample_rows == 0 {
            return Err(PipelineError::Config(
                "delimiter_sample_rows must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_setting<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| PipelineError::Config(format!("{} has invalid value '{}'", key, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_lookup_overrides_defaults() {
        let env: HashMap<&str, &str> = [(ENV_TOP_N, "5"), (ENV_MAX_PAYLOAD_BYTES, "1024")]
            .into_iter()
            .collect();
        let config = PipelineConfig::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(config.top_n, 5);
        assert_eq!(config.max_payload_bytes, 1024);
        assert_eq!(config.delimiter_sample_rows, DEFAULT_DELIMITER_SAMPLE_ROWS);
    }

    #[test]
    fn test_invalid_setting_is_config_error() {
        let err = PipelineConfig::from_lookup(|k| {
            (k == ENV_TOP_N).then(|| "ten".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn test_zero_payload_limit_rejected() {
        let err = PipelineConfig::from_lookup(|k| {
            (k == ENV_MAX_PAYLOAD_BYTES).then(|| "0".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }
}
