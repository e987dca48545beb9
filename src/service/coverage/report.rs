//! Gap analysis report assembly

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;

use super::prioritizer::prioritize_gaps;
use super::stats::generate_recommendations;
use crate::model::{CoverageGap, CoverageReport, CoverageStats, Requirement, Severity};

/// Number of gaps surfaced in `most_critical_gaps`
pub const TOP_GAPS: usize = 5;

/// Compose analysis results into the report returned to consumers
pub fn generate_gap_analysis_report(
    requirements: &[Arc<Requirement>],
    covered: &[Arc<Requirement>],
    gaps: &[CoverageGap],
    stats: &CoverageStats,
) -> CoverageReport {
    if covered.len() + gaps.len() != requirements.len() {
        tracing::warn!(
            requirements = requirements.len(),
            covered = covered.len(),
            gaps = gaps.len(),
            "Covered and gap counts do not add up to the requirement count"
        );
    }

    let mut gaps_by_category = BTreeMap::new();
    for gap in gaps {
        *gaps_by_category.entry(gap.requirement.category).or_insert(0) += 1;
    }

    let mut gaps_by_severity: BTreeMap<Severity, usize> =
        Severity::ALL.iter().map(|s| (*s, 0)).collect();
    for gap in gaps {
        *gaps_by_severity.entry(gap.gap_severity).or_insert(0) += 1;
    }

    let prioritized = prioritize_gaps(gaps);
    let has_critical = prioritized
        .iter()
        .any(|g| g.gap_severity == Severity::Critical);
    let most_critical_gaps = prioritized
        .into_iter()
        .filter(|g| !has_critical || g.gap_severity == Severity::Critical)
        .take(TOP_GAPS)
        .collect();

    tracing::info!(
        covered = covered.len(),
        gaps = gaps.len(),
        "Gap analysis report generated"
    );

    CoverageReport {
        timestamp: Utc::now(),
        summary: stats.clone(),
        covered_requirements: covered.to_vec(),
        coverage_gaps: gaps.to_vec(),
        gaps_by_category,
        gaps_by_severity,
        most_critical_gaps,
        recommendations: generate_recommendations(stats, gaps),
    }
}
