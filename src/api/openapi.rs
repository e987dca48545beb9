//! OpenAPI specification endpoints

use actix_web::{HttpResponse, get};
use utoipa::OpenApi;

use crate::api::error::ApiError;
use crate::api::{coverage, error, health};
use crate::model;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Trustify DA Coverage Gaps",
        description = "Requirement-to-test coverage gap analysis"
    ),
    paths(
        coverage::analyze_requirements,
        coverage::analyze_documents,
        coverage::generate_gap_tests,
        health::liveness,
        health::readiness
    ),
    components(schemas(
        coverage::AnalyzeRequirementsRequest,
        coverage::AnalyzeDocumentsRequest,
        coverage::GenerateTestsRequest,
        coverage::GenerateTestsResponse,
        error::ErrorResponse,
        health::HealthStatus,
        health::ReadinessStatus,
        health::DependencyHealth,
        model::Requirement,
        model::SourceDocument,
        model::TestArtifact,
        model::GeneratedTestCase,
        model::Priority,
        model::Category,
        model::MatchType,
        model::TestMatch,
        model::Severity,
        model::CoverageGap,
        model::CoverageStats,
        model::CoverageReport
    )),
    tags(
        (name = "coverage", description = "Coverage gap analysis"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
#[get("/openapi.json")]
pub async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Serve OpenAPI YAML specification
#[get("/openapi.yaml")]
pub async fn openapi_yaml() -> Result<HttpResponse, ApiError> {
    let yaml = ApiDoc::openapi()
        .to_yaml()
        .map_err(|e| ApiError::Internal(format!("Failed to render OpenAPI YAML: {}", e)))?;
    Ok(HttpResponse::Ok().content_type("text/yaml").body(yaml))
}

/// Configure OpenAPI routes
pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.service(openapi_json).service(openapi_yaml);
}
