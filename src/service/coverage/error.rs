//! Error types for coverage analysis

use thiserror::Error;

/// Error type for coverage analysis
///
/// Only malformed embedding matrices (or a failing embedder) abort a run;
/// scoring and classification never fail.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AnalysisError {
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Embedder returned {actual} vectors for {expected} texts")]
    EmbeddingCountMismatch { expected: usize, actual: usize },

    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error("Coverage analysis task failed: {0}")]
    TaskFailed(String),
}
