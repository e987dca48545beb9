//! Gap classification
//!
//! Severity and recommended test count are a pure function of the coverage
//! score and the requirement priority.

use std::sync::Arc;

use super::scoring::is_covered;
use crate::model::{CoverageGap, CoverageThresholds, Priority, Requirement, Severity, TestMatch};

/// Outcome of classifying one requirement
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Covered(Arc<Requirement>),
    Gap(CoverageGap),
}

/// Decide severity and how many tests to add for a gap.
///
/// Base bucket comes from the score; Critical/High priority adds one test and
/// lifts a Medium gap to High.
pub fn severity_for(
    coverage_score: f64,
    priority: Priority,
    thresholds: &CoverageThresholds,
) -> (Severity, u32) {
    let (base, count) = if coverage_score < thresholds.critical_below {
        (Severity::Critical, 3)
    } else if coverage_score < thresholds.high_below {
        (Severity::High, 2)
    } else {
        (Severity::Medium, 1)
    };

    match priority {
        Priority::Critical | Priority::High => {
            let severity = if base == Severity::Medium {
                Severity::High
            } else {
                base
            };
            (severity, count + 1)
        }
        Priority::Medium | Priority::Low => (base, count),
    }
}

/// Sort a requirement into covered or gap
pub fn classify_requirement(
    requirement: Arc<Requirement>,
    matched_tests: Vec<TestMatch>,
    coverage_score: f64,
    thresholds: &CoverageThresholds,
) -> Classification {
    if is_covered(coverage_score, thresholds) {
        Classification::Covered(requirement)
    } else {
        Classification::Gap(build_gap(
            requirement,
            matched_tests,
            coverage_score,
            thresholds,
        ))
    }
}

/// Build the gap record for an under-covered requirement
pub fn build_gap(
    requirement: Arc<Requirement>,
    matched_tests: Vec<TestMatch>,
    coverage_score: f64,
    thresholds: &CoverageThresholds,
) -> CoverageGap {
    let coverage_score = if coverage_score.is_finite() {
        coverage_score.clamp(0.0, 100.0)
    } else {
        0.0
    };

    let (gap_severity, recommended_test_count) =
        severity_for(coverage_score, requirement.priority, thresholds);

    let gap_description = describe_gap(&requirement.title, matched_tests.len(), coverage_score);

    let suggested_test_types = requirement
        .category
        .suggested_test_types()
        .iter()
        .map(|t| t.to_string())
        .collect();

    CoverageGap {
        requirement,
        coverage_score,
        matched_tests,
        gap_severity,
        recommended_test_count,
        gap_description,
        suggested_test_types,
    }
}

fn describe_gap(title: &str, match_count: usize, coverage_score: f64) -> String {
    if coverage_score == 0.0 {
        format!("No tests found for requirement '{}'", title)
    } else if match_count > 0 {
        format!(
            "Only {} partial test(s) found. Coverage: {:.0}%",
            match_count, coverage_score
        )
    } else {
        format!("Insufficient test coverage ({:.0}%)", coverage_score)
    }
}
