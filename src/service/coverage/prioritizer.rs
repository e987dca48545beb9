//! Gap prioritisation

use std::cmp::Reverse;

use crate::model::CoverageGap;

/// Composite rank: severity weighted twice as heavily as requirement priority
pub fn gap_priority_score(gap: &CoverageGap) -> u32 {
    gap.gap_severity.weight() * 2 + gap.requirement.priority.weight()
}

/// Order gaps by composite score, highest first.
///
/// The sort is stable so equal-score gaps keep their input order, which also
/// makes the operation idempotent. Input gaps are left untouched.
pub fn prioritize_gaps(gaps: &[CoverageGap]) -> Vec<CoverageGap> {
    let mut ordered = gaps.to_vec();
    ordered.sort_by_key(|gap| Reverse(gap_priority_score(gap)));

    tracing::debug!(
        gaps = ordered.len(),
        top_gap = ordered.first().map(|g| g.requirement.id.as_str()).unwrap_or("none"),
        "Gaps prioritized"
    );

    ordered
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::model::{Category, Priority, Requirement, Severity};

    fn gap(id: &str, severity: Severity, priority: Priority) -> CoverageGap {
        CoverageGap {
            requirement: Arc::new(Requirement {
                id: id.to_string(),
                title: id.to_string(),
                description: String::new(),
                source_document: String::new(),
                priority,
                category: Category::Functional,
                acceptance_criteria: vec![],
                compliance_standards: Default::default(),
                extracted_at: chrono::Utc::now(),
            }),
            coverage_score: 0.0,
            matched_tests: vec![],
            gap_severity: severity,
            recommended_test_count: 1,
            gap_description: String::new(),
            suggested_test_types: vec![],
        }
    }

    fn ids(gaps: &[CoverageGap]) -> Vec<&str> {
        gaps.iter().map(|g| g.requirement.id.as_str()).collect()
    }

    #[test]
    fn test_priority_can_outrank_severity() {
        let a = gap("A", Severity::Critical, Priority::Low);
        let b = gap("B", Severity::High, Priority::Critical);

        assert_eq!(gap_priority_score(&a), 9);
        assert_eq!(gap_priority_score(&b), 10);
        assert_eq!(ids(&prioritize_gaps(&[a, b])), vec!["B", "A"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let gaps = vec![
            gap("first", Severity::Medium, Priority::Medium),
            gap("top", Severity::Critical, Priority::Critical),
            gap("second", Severity::Medium, Priority::Medium),
            gap("third", Severity::Medium, Priority::Medium),
        ];

        assert_eq!(
            ids(&prioritize_gaps(&gaps)),
            vec!["top", "first", "second", "third"]
        );
    }

    #[test]
    fn test_idempotent() {
        let gaps = vec![
            gap("1", Severity::Medium, Priority::Low),
            gap("2", Severity::High, Priority::High),
            gap("3", Severity::Critical, Priority::Medium),
            gap("4", Severity::High, Priority::High),
            gap("5", Severity::Critical, Priority::Low),
        ];

        let once = prioritize_gaps(&gaps);
        let twice = prioritize_gaps(&once);
        assert_eq!(ids(&once), ids(&twice));
        // input untouched
        assert_eq!(ids(&gaps), vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_empty() {
        assert!(prioritize_gaps(&[]).is_empty());
    }
}
