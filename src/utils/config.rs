// src/utils/config.rs
use crate::utils::error::AppError;

/// Environment variable holding the minimum body length, overridden by `--min-body-chars`.
pub const MIN_BODY_CHARS_ENV: &str = "SEGMENTER_MIN_BODY_CHARS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmenterConfig {
    /// Bodies shorter than this (in characters) count as "no explanation". Never below 1.
    pub min_body_chars: usize,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self { min_body_chars: 1 }
    }
}

impl SegmenterConfig {
    /// Reads `SEGMENTER_MIN_BODY_CHARS`, falling back to the default when unset.
    pub fn from_env() -> Result<Self, AppError> {
        match std::env::var(MIN_BODY_CHARS_ENV) {
            Ok(raw) => {
                let value = parse_min_body_chars(&raw)?;
                tracing::debug!("Using {}={} from environment", MIN_BODY_CHARS_ENV, value);
                Ok(Self::default().with_min_body_chars(Some(value)))
            }
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn with_min_body_chars(mut self, value: Option<usize>) -> Self {
        if let Some(value) = value {
            self.min_body_chars = value.max(1);
        }
        self
    }
}

pub fn parse_min_body_chars(raw: &str) -> Result<usize, AppError> {
    raw.trim().parse::<usize>().map_err(|e| {
        AppError::Config(format!("Invalid {} value '{}': {}", MIN_BODY_CHARS_ENV, raw, e))
    })
}
