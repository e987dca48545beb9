//! REST API endpoints for coverage gap analysis

use std::collections::HashSet;

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::error::ApiError;
use crate::model::{
    CoverageGap, CoverageReport, GeneratedTestCase, Requirement, SourceDocument, TestArtifact,
};
use crate::service::GapAnalysisService;

/// Analyze pre-extracted requirements against a test pool
#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyzeRequirementsRequest {
    pub requirements: Vec<Requirement>,
    #[serde(default)]
    pub tests: Vec<TestArtifact>,
}

/// Extract requirements from documents, then analyze them
#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyzeDocumentsRequest {
    pub documents: Vec<SourceDocument>,
    #[serde(default)]
    pub tests: Vec<TestArtifact>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateTestsRequest {
    /// Gap taken from a previous report
    pub gap: CoverageGap,
    /// Optional context; at most two documents are used
    #[serde(default)]
    pub context_documents: Vec<SourceDocument>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GenerateTestsResponse {
    pub requirement_id: String,
    pub test_cases: Vec<GeneratedTestCase>,
}

/// Analyze requirement coverage
#[utoipa::path(
    post,
    path = "/v1/coverage/analyze",
    request_body = AnalyzeRequirementsRequest,
    responses(
        (status = 200, description = "Coverage report", body = CoverageReport),
        (status = 400, description = "Empty or duplicate requirement id", body = crate::api::error::ErrorResponse),
        (status = 502, description = "Embedding service failed", body = crate::api::error::ErrorResponse)
    ),
    tag = "coverage"
)]
#[post("/v1/coverage/analyze")]
pub async fn analyze_requirements(
    service: web::Data<GapAnalysisService>,
    body: web::Json<AnalyzeRequirementsRequest>,
) -> Result<HttpResponse, ApiError> {
    let AnalyzeRequirementsRequest { requirements, tests } = body.into_inner();
    check_requirement_ids(&requirements)?;

    tracing::info!(
        requirements = requirements.len(),
        tests = tests.len(),
        "Coverage analysis requested"
    );

    let report = service.analyze_requirements(requirements, tests).await?;
    Ok(HttpResponse::Ok().json(report))
}

/// Extract requirements from documents and analyze their coverage
#[utoipa::path(
    post,
    path = "/v1/coverage/documents/analyze",
    request_body = AnalyzeDocumentsRequest,
    responses(
        (status = 200, description = "Coverage report", body = CoverageReport),
        (status = 502, description = "Embedding service failed", body = crate::api::error::ErrorResponse)
    ),
    tag = "coverage"
)]
#[post("/v1/coverage/documents/analyze")]
pub async fn analyze_documents(
    service: web::Data<GapAnalysisService>,
    body: web::Json<AnalyzeDocumentsRequest>,
) -> Result<HttpResponse, ApiError> {
    let AnalyzeDocumentsRequest { documents, tests } = body.into_inner();

    tracing::info!(
        documents = documents.len(),
        tests = tests.len(),
        "Document coverage analysis requested"
    );

    let report = service.analyze_documents(&documents, tests).await?;
    Ok(HttpResponse::Ok().json(report))
}

/// Generate test cases that close a coverage gap
#[utoipa::path(
    post,
    path = "/v1/coverage/gaps/tests",
    request_body = GenerateTestsRequest,
    responses(
        (status = 200, description = "Generated test cases", body = GenerateTestsResponse)
    ),
    tag = "coverage"
)]
#[post("/v1/coverage/gaps/tests")]
pub async fn generate_gap_tests(
    service: web::Data<GapAnalysisService>,
    body: web::Json<GenerateTestsRequest>,
) -> Result<HttpResponse, ApiError> {
    let GenerateTestsRequest {
        gap,
        context_documents,
    } = body.into_inner();

    let test_cases = service
        .generate_tests_for_gap(&gap, &context_documents)
        .await;

    Ok(HttpResponse::Ok().json(GenerateTestsResponse {
        requirement_id: gap.requirement.id.clone(),
        test_cases,
    }))
}

/// Requirement ids must be non-empty and unique within a request
fn check_requirement_ids(requirements: &[Requirement]) -> Result<(), ApiError> {
    let mut seen = HashSet::new();
    for requirement in requirements {
        if requirement.id.trim().is_empty() {
            return Err(ApiError::BadRequest("requirement id must not be empty".to_string()));
        }
        if !seen.insert(requirement.id.as_str()) {
            return Err(ApiError::BadRequest(format!(
                "duplicate requirement id: {}",
                requirement.id
            )));
        }
    }
    Ok(())
}

/// Configure coverage routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(analyze_requirements)
        .service(analyze_documents)
        .service(generate_gap_tests);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test};
    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::model::CoverageThresholds;
    use crate::model::extraction::ExtractedTestCase;
    use crate::service::coverage::{AnalysisError, Embedding};
    use crate::service::embedding::Embedder;
    use crate::service::generation::{GenerationError, TestCaseGenerator, TestGenerationService};
    use crate::service::requirements::{ExtractionError, RequirementExtractor};

    /// One-hot on text length; `dimension_per_call` forces [requirements, tests] sizes
    struct StubEmbedder {
        dimension_per_call: Option<Vec<usize>>,
    }

    #[async_trait]
    impl Embedder for StubEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>, AnalysisError> {
            let dimension = match &self.dimension_per_call {
                Some(dims) if texts.len() == 1 => dims[0],
                Some(dims) => dims[1],
                None => 2,
            };
            Ok(texts
                .iter()
                .map(|text| {
                    let mut v = vec![0.0; dimension];
                    v[text.len() % dimension] = 1.0;
                    v
                })
                .collect())
        }
    }

    /// One requirement per line: "<id>|<title>"
    struct LineExtractor;

    #[async_trait]
    impl RequirementExtractor for LineExtractor {
        async fn extract(
            &self,
            document: &SourceDocument,
        ) -> Result<Vec<Requirement>, ExtractionError> {
            Ok(document
                .content
                .lines()
                .filter_map(|line| line.split_once('|'))
                .map(|(id, title)| Requirement {
                    id: id.to_string(),
                    title: title.to_string(),
                    description: String::new(),
                    source_document: document.filename.clone(),
                    priority: Default::default(),
                    category: Default::default(),
                    acceptance_criteria: vec![],
                    compliance_standards: Default::default(),
                    extracted_at: chrono::Utc::now(),
                })
                .collect())
        }
    }

    struct SingleCaseGenerator;

    #[async_trait]
    impl TestCaseGenerator for SingleCaseGenerator {
        async fn generate(
            &self,
            _gap: &CoverageGap,
            _context_documents: &[SourceDocument],
        ) -> Result<Vec<ExtractedTestCase>, GenerationError> {
            Ok(vec![ExtractedTestCase {
                title: "Encrypted at rest".to_string(),
                description: "Inspect storage".to_string(),
                ..Default::default()
            }])
        }
    }

    fn service(embedder: StubEmbedder) -> web::Data<GapAnalysisService> {
        let service = GapAnalysisService::new(
            Arc::new(embedder),
            Arc::new(LineExtractor),
            Arc::new(SingleCaseGenerator),
            CoverageThresholds::default(),
        )
        .with_test_generation(
            TestGenerationService::new(Arc::new(SingleCaseGenerator))
                .with_retry_policy(0, std::time::Duration::ZERO),
        );
        web::Data::new(service)
    }

    #[actix_web::test]
    async fn test_analyze_returns_report() {
        let app = test::init_service(
            App::new()
                .app_data(service(StubEmbedder {
                    dimension_per_call: None,
                }))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/v1/coverage/analyze")
            .set_json(json!({
                "requirements": [
                    {"id": "REQ-001", "title": "Login", "priority": "High", "category": "Security"}
                ],
                "tests": []
            }))
            .to_request();
        let report: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(report["summary"]["total_requirements"], 1);
        assert_eq!(report["coverage_gaps"][0]["requirement"]["id"], "REQ-001");
        assert_eq!(report["coverage_gaps"][0]["gap_severity"], "Critical");
        assert_eq!(report["coverage_gaps"][0]["recommended_test_count"], 4);
        assert_eq!(report["gaps_by_severity"]["Critical"], 1);
    }

    #[actix_web::test]
    async fn test_dimension_mismatch_is_upstream_failure() {
        let app = test::init_service(
            App::new()
                .app_data(service(StubEmbedder {
                    dimension_per_call: Some(vec![2, 3]),
                }))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/v1/coverage/analyze")
            .set_json(json!({
                "requirements": [{"id": "REQ-001", "title": "Login"}],
                "tests": [
                    {"id": "TC-1", "title": "Login ok"},
                    {"id": "TC-2", "title": "Login locked"}
                ]
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "external_service_error");
        assert!(body["request_id"].is_string());
    }

    #[actix_web::test]
    async fn test_duplicate_requirement_ids_are_rejected() {
        let app = test::init_service(
            App::new()
                .app_data(service(StubEmbedder {
                    dimension_per_call: None,
                }))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/v1/coverage/analyze")
            .set_json(json!({
                "requirements": [
                    {"id": "REQ-001", "title": "Login"},
                    {"id": "REQ-001", "title": "Logout"}
                ]
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "bad_request");
    }

    #[actix_web::test]
    async fn test_analyze_documents_extracts_then_reports() {
        let app = test::init_service(
            App::new()
                .app_data(service(StubEmbedder {
                    dimension_per_call: None,
                }))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/v1/coverage/documents/analyze")
            .set_json(json!({
                "documents": [
                    {"filename": "prd.md", "content": "REQ-001|Login\nREQ-002|Export"},
                    {"filename": "security.md", "content": "REQ-003|Encryption"}
                ],
                "tests": [{"id": "TC-1", "title": "Login ok"}]
            }))
            .to_request();
        let report: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(report["summary"]["total_requirements"], 3);
        let gaps = report["coverage_gaps"].as_array().unwrap().len();
        let covered = report["covered_requirements"].as_array().unwrap().len();
        assert_eq!(gaps + covered, 3);
    }

    #[actix_web::test]
    async fn test_generate_gap_tests() {
        let app = test::init_service(
            App::new()
                .app_data(service(StubEmbedder {
                    dimension_per_call: None,
                }))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/v1/coverage/gaps/tests")
            .set_json(json!({
                "gap": {
                    "requirement": {"id": "REQ-002", "title": "Encryption", "priority": "Critical"},
                    "coverage_score": 0.0,
                    "matched_tests": [],
                    "gap_severity": "Critical",
                    "recommended_test_count": 4,
                    "gap_description": "No tests found for requirement 'Encryption'",
                    "suggested_test_types": ["security"]
                }
            }))
            .to_request();
        let body: GenerateTestsResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.requirement_id, "REQ-002");
        assert_eq!(body.test_cases.len(), 1);
        assert_eq!(body.test_cases[0].id, "TC_GAP_REQ-002_1");
        assert!(!body.test_cases[0].fallback);
    }
}
