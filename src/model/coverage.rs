//! Coverage analysis results

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::requirement::{Category, Requirement};
use super::test_artifact::TestArtifact;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Full,
    Partial,
}

/// A candidate test for a requirement whose similarity cleared the partial threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TestMatch {
    #[schema(value_type = TestArtifact)]
    pub test: Arc<TestArtifact>,
    pub similarity: f64,
    pub match_type: MatchType,
}

/// How urgently a gap needs new tests. Gaps are never `Low` by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    pub fn weight(self) -> u32 {
        match self {
            Severity::Critical => 4,
            Severity::High => 3,
            Severity::Medium => 2,
            Severity::Low => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A requirement whose coverage score fell below the covered threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CoverageGap {
    #[schema(value_type = Requirement)]
    pub requirement: Arc<Requirement>,
    /// 0-100
    pub coverage_score: f64,
    /// Sorted by similarity descending, ties by test pool order
    pub matched_tests: Vec<TestMatch>,
    pub gap_severity: Severity,
    pub recommended_test_count: u32,
    pub gap_description: String,
    pub suggested_test_types: Vec<String>,
}

/// Aggregate statistics for one analysis run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CoverageStats {
    pub total_requirements: usize,
    pub covered_requirements: usize,
    pub coverage_percentage: f64,
    pub gaps_count: usize,
    pub critical_gaps: usize,
    pub high_gaps: usize,
    pub medium_gaps: usize,
    pub recommended_tests_to_add: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CoverageReport {
    pub timestamp: DateTime<Utc>,
    pub summary: CoverageStats,
    #[schema(value_type = Vec<Requirement>)]
    pub covered_requirements: Vec<Arc<Requirement>>,
    pub coverage_gaps: Vec<CoverageGap>,
    pub gaps_by_category: BTreeMap<Category, usize>,
    pub gaps_by_severity: BTreeMap<Severity, usize>,
    /// Top five gaps after prioritisation
    pub most_critical_gaps: Vec<CoverageGap>,
    pub recommendations: Vec<String>,
}
