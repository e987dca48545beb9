//! LLM-extractable models for requirement extraction and test generation
//!
//! Fields are loosely typed on purpose; converters in the service layer map
//! them onto the domain models with explicit defaults.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// LLM-extractable requirement list
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExtractedRequirements {
    pub requirements: Vec<ExtractedRequirement>,
}

/// A single extracted requirement
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ExtractedRequirement {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Critical | High | Medium | Low
    pub priority: Option<String>,
    /// Functional | Security | Integration | Performance | Compliance | Usability
    pub category: Option<String>,
    #[serde(default)]
    pub acceptance_criteria: Vec<String>,
    #[serde(default)]
    pub compliance_standards: Vec<String>,
}

/// LLM-extractable test case list
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExtractedTestCases {
    pub test_cases: Vec<ExtractedTestCase>,
}

/// A single generated test case
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ExtractedTestCase {
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub preconditions: Option<String>,
    #[serde(default)]
    pub test_steps: Vec<String>,
    pub expected_results: Option<String>,
    #[serde(default)]
    pub edge_cases: Vec<String>,
    #[serde(default)]
    pub negative_tests: Vec<String>,
    pub automation_feasible: Option<bool>,
    pub estimated_duration: Option<String>,
}
