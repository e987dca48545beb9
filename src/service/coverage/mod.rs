//! Coverage gap analysis engine
//!
//! Pure, synchronous pipeline over precomputed embeddings:
//! match -> score -> classify (per requirement) -> prioritize -> aggregate -> assemble.

use std::sync::Arc;

use crate::model::{CoverageGap, CoverageThresholds, Requirement, TestArtifact, TestMatch};

pub mod classifier;
pub mod error;
pub mod matcher;
pub mod prioritizer;
pub mod report;
pub mod scoring;
pub mod stats;

pub use classifier::{Classification, classify_requirement};
pub use error::AnalysisError;
pub use matcher::{Embedding, check_dimensions, match_requirements};
pub use prioritizer::prioritize_gaps;
pub use report::generate_gap_analysis_report;
pub use scoring::coverage_score;
pub use stats::calculate_overall_coverage;

/// Requirements partitioned by coverage, each in input order
#[derive(Debug, Clone, Default)]
pub struct CoverageAnalysis {
    pub covered: Vec<Arc<Requirement>>,
    pub gaps: Vec<CoverageGap>,
}

/// Match every requirement against the test pool and classify it.
///
/// Embeddings are parallel to `requirements` and `tests`. Every requirement
/// lands in exactly one of `covered` or `gaps`.
pub fn analyze_coverage(
    requirements: &[Arc<Requirement>],
    tests: &[Arc<TestArtifact>],
    requirement_embeddings: &[Embedding],
    test_embeddings: &[Embedding],
    thresholds: &CoverageThresholds,
) -> Result<CoverageAnalysis, AnalysisError> {
    check_count(requirements.len(), requirement_embeddings.len())?;
    check_count(tests.len(), test_embeddings.len())?;
    check_dimensions(requirement_embeddings, test_embeddings)?;

    tracing::info!(
        requirements = requirements.len(),
        tests = tests.len(),
        "Analyzing coverage"
    );

    if requirements.is_empty() {
        return Ok(CoverageAnalysis::default());
    }
    if tests.is_empty() {
        tracing::warn!("No test cases available, all requirements are gaps");
    }

    let ranked = match_requirements(requirement_embeddings, test_embeddings, thresholds)?;

    let mut analysis = CoverageAnalysis::default();
    for (requirement, hits) in requirements.iter().zip(ranked) {
        let similarities: Vec<f64> = hits.iter().map(|h| h.similarity).collect();
        let score = coverage_score(&similarities, thresholds.top_matches);

        let matched_tests: Vec<TestMatch> = hits
            .into_iter()
            .map(|hit| TestMatch {
                test: Arc::clone(&tests[hit.test_index]),
                similarity: hit.similarity,
                match_type: hit.match_type,
            })
            .collect();

        tracing::debug!(
            requirement_id = %requirement.id,
            coverage_score = score,
            matches = matched_tests.len(),
            "Scored requirement"
        );

        match classify_requirement(Arc::clone(requirement), matched_tests, score, thresholds) {
            Classification::Covered(requirement) => analysis.covered.push(requirement),
            Classification::Gap(gap) => {
                tracing::debug!(
                    requirement_id = %gap.requirement.id,
                    severity = %gap.gap_severity,
                    recommended_tests = gap.recommended_test_count,
                    "Gap identified"
                );
                analysis.gaps.push(gap);
            }
        }
    }

    tracing::info!(
        covered = analysis.covered.len(),
        gaps = analysis.gaps.len(),
        "Coverage analysis complete"
    );

    Ok(analysis)
}

fn check_count(expected: usize, actual: usize) -> Result<(), AnalysisError> {
    if expected == actual {
        Ok(())
    } else {
        Err(AnalysisError::EmbeddingCountMismatch { expected, actual })
    }
}
