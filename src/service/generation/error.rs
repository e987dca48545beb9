//! Error types for test case generation

use thiserror::Error;

/// Error type for test case generation
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("LLM test generation failed: {0}")]
    GenerationFailed(String),

    #[error("LLM returned no test cases")]
    EmptyResponse,
}
