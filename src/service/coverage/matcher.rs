//! Semantic matching of requirement embeddings against test embeddings
//!
//! Linear scan: every requirement is compared with every test. Vectors are
//! normalised to unit length first so the dot product is a cosine similarity
//! and the match thresholds keep their meaning regardless of the embedder.

use rayon::prelude::*;

use super::error::AnalysisError;
use crate::model::{CoverageThresholds, MatchType};

pub type Embedding = Vec<f64>;

/// A test whose similarity to a requirement cleared the partial threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityHit {
    /// Position of the test in the caller's pool
    pub test_index: usize,
    pub similarity: f64,
    pub match_type: MatchType,
}

/// Rank candidate tests for every requirement.
///
/// Returns one hit list per requirement, in requirement order. Each list is
/// sorted by similarity descending with ties broken by ascending test index.
/// An empty test pool yields empty lists.
pub fn match_requirements(
    requirement_embeddings: &[Embedding],
    test_embeddings: &[Embedding],
    thresholds: &CoverageThresholds,
) -> Result<Vec<Vec<SimilarityHit>>, AnalysisError> {
    check_dimensions(requirement_embeddings, test_embeddings)?;

    if test_embeddings.is_empty() {
        return Ok(vec![Vec::new(); requirement_embeddings.len()]);
    }

    let tests: Vec<Embedding> = test_embeddings.iter().map(|v| normalize(v)).collect();

    // Ordered collect keeps requirement order
    let ranked = requirement_embeddings
        .par_iter()
        .map(|requirement| rank_tests(&normalize(requirement), &tests, thresholds))
        .collect();

    Ok(ranked)
}

/// Every vector in both sets must share one dimension. Empty sets impose none.
pub fn check_dimensions(
    requirement_embeddings: &[Embedding],
    test_embeddings: &[Embedding],
) -> Result<(), AnalysisError> {
    let requirement_dim = common_dimension(requirement_embeddings)?;
    let test_dim = common_dimension(test_embeddings)?;

    if let (Some(expected), Some(actual)) = (requirement_dim, test_dim)
        && expected != actual
    {
        return Err(AnalysisError::DimensionMismatch { expected, actual });
    }
    Ok(())
}

/// Label a similarity, or `None` when it does not clear the partial threshold
pub fn match_type_for(similarity: f64, thresholds: &CoverageThresholds) -> Option<MatchType> {
    if similarity > thresholds.full_match {
        Some(MatchType::Full)
    } else if similarity > thresholds.partial_match {
        Some(MatchType::Partial)
    } else {
        None
    }
}

fn rank_tests(
    requirement: &[f64],
    tests: &[Embedding],
    thresholds: &CoverageThresholds,
) -> Vec<SimilarityHit> {
    let mut hits: Vec<SimilarityHit> = tests
        .iter()
        .enumerate()
        .filter_map(|(test_index, test)| {
            let similarity = dot(requirement, test).clamp(0.0, 1.0);
            match_type_for(similarity, thresholds).map(|match_type| SimilarityHit {
                test_index,
                similarity,
                match_type,
            })
        })
        .collect();

    hits.sort_by(|a, b| {
        b.similarity
            .total_cmp(&a.similarity)
            .then(a.test_index.cmp(&b.test_index))
    });

    hits
}

/// Shared dimension of a set of vectors; `None` for an empty set
fn common_dimension(vectors: &[Embedding]) -> Result<Option<usize>, AnalysisError> {
    let Some(first) = vectors.first() else {
        return Ok(None);
    };
    let expected = first.len();

    match vectors.iter().find(|v| v.len() != expected) {
        Some(ragged) => Err(AnalysisError::DimensionMismatch {
            expected,
            actual: ragged.len(),
        }),
        None => Ok(Some(expected)),
    }
}

fn normalize(vector: &[f64]) -> Embedding {
    let norm = vector.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm < f64::EPSILON {
        return vec![0.0; vector.len()];
    }
    vector.iter().map(|x| x / norm).collect()
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
