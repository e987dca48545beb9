//! End-to-end gap analysis
//!
//! Glues extraction, embedding, the coverage engine and test generation
//! together. All network access sits behind the injected traits.

use std::sync::Arc;

use crate::model::{
    CoverageGap, CoverageReport, CoverageStats, CoverageThresholds, GeneratedTestCase, Requirement,
    SourceDocument, TestArtifact,
};
use crate::service::coverage::{
    AnalysisError, Embedding, analyze_coverage, calculate_overall_coverage,
    generate_gap_analysis_report,
};
use crate::service::embedding::Embedder;
use crate::service::generation::{TestCaseGenerator, TestGenerationService};
use crate::service::requirements::{RequirementExtractor, extract_requirements_from_documents};

/// Coverage gap analysis over documents or pre-extracted requirements
#[derive(Clone)]
pub struct GapAnalysisService {
    embedder: Arc<dyn Embedder>,
    extractor: Arc<dyn RequirementExtractor>,
    test_generation: TestGenerationService,
    thresholds: CoverageThresholds,
}

impl GapAnalysisService {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        extractor: Arc<dyn RequirementExtractor>,
        generator: Arc<dyn TestCaseGenerator>,
        thresholds: CoverageThresholds,
    ) -> Self {
        Self {
            embedder,
            extractor,
            test_generation: TestGenerationService::new(generator),
            thresholds,
        }
    }

    /// Replace the test generation wrapper (e.g. to change the retry policy)
    pub fn with_test_generation(mut self, test_generation: TestGenerationService) -> Self {
        self.test_generation = test_generation;
        self
    }

    pub fn thresholds(&self) -> &CoverageThresholds {
        &self.thresholds
    }

    /// Extract requirements from `documents` and analyze them against `tests`
    pub async fn analyze_documents(
        &self,
        documents: &[SourceDocument],
        tests: Vec<TestArtifact>,
    ) -> Result<CoverageReport, AnalysisError> {
        let requirements =
            extract_requirements_from_documents(self.extractor.as_ref(), documents).await;
        self.analyze_requirements(requirements, tests).await
    }

    /// Analyze already extracted requirements against the test pool
    pub async fn analyze_requirements(
        &self,
        requirements: Vec<Requirement>,
        tests: Vec<TestArtifact>,
    ) -> Result<CoverageReport, AnalysisError> {
        let start_time = std::time::Instant::now();

        let requirements: Vec<Arc<Requirement>> = requirements.into_iter().map(Arc::new).collect();
        let tests: Vec<Arc<TestArtifact>> = tests.into_iter().map(Arc::new).collect();

        if requirements.is_empty() {
            tracing::info!(tests = tests.len(), "No requirements to analyze");
            let stats = calculate_overall_coverage(0, 0, &[]);
            return Ok(generate_gap_analysis_report(&[], &[], &[], &stats));
        }

        let requirement_texts: Vec<String> =
            requirements.iter().map(|r| r.embedding_text()).collect();
        let test_texts: Vec<String> = tests.iter().map(|t| t.embedding_text()).collect();

        let (requirement_embeddings, test_embeddings) =
            futures::try_join!(self.embed(&requirement_texts), self.embed(&test_texts))?;

        let requirement_count = requirements.len();
        let test_count = tests.len();
        let thresholds = self.thresholds;

        // Matching is CPU-bound; keep it off the async workers
        let (stats, report) = tokio::task::spawn_blocking(
            move || -> Result<(CoverageStats, CoverageReport), AnalysisError> {
                let analysis = analyze_coverage(
                    &requirements,
                    &tests,
                    &requirement_embeddings,
                    &test_embeddings,
                    &thresholds,
                )?;
                let stats = calculate_overall_coverage(
                    requirements.len(),
                    analysis.covered.len(),
                    &analysis.gaps,
                );
                let report = generate_gap_analysis_report(
                    &requirements,
                    &analysis.covered,
                    &analysis.gaps,
                    &stats,
                );
                Ok((stats, report))
            },
        )
        .await
        .map_err(|e| AnalysisError::TaskFailed(e.to_string()))??;

        tracing::info!(
            requirements = requirement_count,
            tests = test_count,
            coverage_percentage = stats.coverage_percentage,
            gaps = stats.gaps_count,
            elapsed_ms = start_time.elapsed().as_millis(),
            "Gap analysis complete"
        );

        Ok(report)
    }

    /// Generate test cases that would close `gap`
    pub async fn generate_tests_for_gap(
        &self,
        gap: &CoverageGap,
        context_documents: &[SourceDocument],
    ) -> Vec<GeneratedTestCase> {
        self.test_generation
            .generate_tests_for_gap(gap, context_documents)
            .await
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>, AnalysisError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.embedder.embed(texts).await
    }
}
