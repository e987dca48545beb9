//! Error types for requirement extraction

use thiserror::Error;

/// Error type for requirement extraction
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExtractionError {
    #[error("LLM extraction failed: {0}")]
    ExtractionFailed(String),
}
