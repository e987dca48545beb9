//! Coverage statistics and recommendations

use std::collections::BTreeSet;

use crate::model::{CoverageGap, CoverageStats, Severity};

/// Roll up totals and severity buckets for a run
pub fn calculate_overall_coverage(
    total_requirements: usize,
    covered_requirements: usize,
    gaps: &[CoverageGap],
) -> CoverageStats {
    if total_requirements == 0 {
        return CoverageStats::default();
    }

    let count = |severity: Severity| gaps.iter().filter(|g| g.gap_severity == severity).count();

    let stats = CoverageStats {
        total_requirements,
        covered_requirements,
        coverage_percentage: covered_requirements as f64 / total_requirements as f64 * 100.0,
        gaps_count: gaps.len(),
        critical_gaps: count(Severity::Critical),
        high_gaps: count(Severity::High),
        medium_gaps: count(Severity::Medium),
        recommended_tests_to_add: gaps.iter().map(|g| g.recommended_test_count).sum(),
    };

    tracing::info!(
        coverage_percentage = stats.coverage_percentage,
        gaps = stats.gaps_count,
        critical = stats.critical_gaps,
        high = stats.high_gaps,
        medium = stats.medium_gaps,
        "Calculated coverage statistics"
    );

    stats
}

/// Actionable recommendation lines, in a fixed order
pub fn generate_recommendations(stats: &CoverageStats, gaps: &[CoverageGap]) -> Vec<String> {
    let mut recommendations = Vec::new();

    let coverage = stats.coverage_percentage;
    let overall = if coverage < 50.0 {
        "⚠️ CRITICAL: Less than 50% requirement coverage. Immediate action required."
    } else if coverage < 70.0 {
        "⚠️ Coverage below 70%. Focus on high-priority gaps."
    } else if coverage < 90.0 {
        "✅ Good coverage. Address remaining gaps for completeness."
    } else {
        "✅ Excellent coverage! Focus on maintenance and regression testing."
    };
    recommendations.push(overall.to_string());

    let critical = gaps
        .iter()
        .filter(|g| g.gap_severity == Severity::Critical)
        .count();
    if critical > 0 {
        recommendations.push(format!(
            "🔴 {} critical gap(s) require immediate attention",
            critical
        ));
    }

    let standards: BTreeSet<&str> = gaps
        .iter()
        .flat_map(|g| g.requirement.compliance_standards.iter().map(String::as_str))
        .collect();
    if !standards.is_empty() {
        recommendations.push(format!(
            "⚖️ Compliance gaps found for: {}",
            standards.into_iter().collect::<Vec<_>>().join(", ")
        ));
    }

    if stats.recommended_tests_to_add > 0 {
        recommendations.push(format!(
            "💡 Generate {} test(s) to achieve 100% coverage",
            stats.recommended_tests_to_add
        ));
    }

    recommendations
}
