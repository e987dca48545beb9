//! Coverage score computation

use crate::model::CoverageThresholds;

/// Reduce a requirement's match similarities to a 0-100 coverage score.
///
/// `similarities` must be sorted descending. The score is the mean of the
/// best `top_matches` similarities scaled to percent; no matches score 0.
pub fn coverage_score(similarities: &[f64], top_matches: usize) -> f64 {
    let top = &similarities[..similarities.len().min(top_matches.max(1))];
    if top.is_empty() {
        return 0.0;
    }

    let mean = top.iter().sum::<f64>() / top.len() as f64;
    let score = mean * 100.0;
    if score.is_finite() {
        score.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

pub fn is_covered(score: f64, thresholds: &CoverageThresholds) -> bool {
    score >= thresholds.covered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_matches_scores_zero() {
        assert_eq!(coverage_score(&[], 3), 0.0);
    }

    #[test]
    fn test_mean_of_top_three() {
        let score = coverage_score(&[0.9, 0.6, 0.45, 0.41], 3);
        assert!((score - 65.0).abs() < 1e-9);
    }

    #[test]
    fn test_fewer_matches_than_top_k() {
        let score = coverage_score(&[0.5], 3);
        assert!((score - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_is_clamped() {
        assert_eq!(coverage_score(&[1.5, 1.2], 3), 100.0);
        assert_eq!(coverage_score(&[f64::NAN], 3), 0.0);
    }

    #[test]
    fn test_covered_threshold_is_inclusive() {
        let thresholds = CoverageThresholds::default();
        assert!(is_covered(60.0, &thresholds));
        assert!(!is_covered(59.99, &thresholds));
    }
}
