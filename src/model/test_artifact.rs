use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::coverage::Severity;
use super::requirement::{Category, Priority};

/// Existing test case from the caller's test pool. Read-only to this service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TestArtifact {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Free-form; test suites use their own taxonomies
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub priority: Priority,
}

impl TestArtifact {
    /// Text handed to the embedder.
    pub fn embedding_text(&self) -> String {
        format!("{}. {}", self.title, self.description)
    }
}

/// Test case synthesized to close a coverage gap
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GeneratedTestCase {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    pub compliance: Vec<String>,
    pub preconditions: String,
    pub test_steps: Vec<String>,
    pub expected_results: String,
    pub edge_cases: Vec<String>,
    pub negative_tests: Vec<String>,
    pub automation_feasible: bool,
    pub estimated_duration: String,
    pub traceability: String,
    pub requirement_id: String,
    pub gap_severity: Severity,
    pub generated_for_gap: bool,
    /// Set when the LLM failed and the case was built from the requirement alone
    pub fallback: bool,
    pub generated_at: DateTime<Utc>,
}
