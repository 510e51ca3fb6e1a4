// Evaluation metrics for generated output

use crate::models::EpicRecord;
use serde::{Deserialize, Serialize};

/// Story count at which completeness is considered full
const COMPLETENESS_TARGET: usize = 3;

/// Heuristic quality scores for a batch of generated epics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    /// 0-100: whether enough stories were produced overall
    pub story_count_completeness: f64,
    /// 0-100: placeholder coverage score while stories carry no risk field
    pub risk_coverage: f64,
    /// 0-100: weighted blend of the above, rounded to one decimal
    pub consistency_score: f64,
}

/// Compute completeness, risk coverage, and consistency for a batch
pub fn compute_metrics(records: &[EpicRecord]) -> EvaluationMetrics {
    let total_stories: usize = records.iter().map(|r| r.user_stories.len()).sum();

    let story_count_completeness = if total_stories >= COMPLETENESS_TARGET {
        100.0
    } else {
        (total_stories as f64 / COMPLETENESS_TARGET as f64) * 100.0
    };

    let risk_coverage = if total_stories > 0 { 40.0 } else { 0.0 };

    let consistency_score =
        ((story_count_completeness * 0.6 + risk_coverage * 0.4) * 10.0).round() / 10.0;

    EvaluationMetrics {
        story_count_completeness,
        risk_coverage,
        consistency_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AcceptanceCriteria, UserStory};

    fn record_with_stories(count: usize) -> EpicRecord {
        EpicRecord {
            epic: "Test".to_string(),
            epic_id: None,
            description: String::new(),
            user_stories: (0..count)
                .map(|i| UserStory {
                    title: format!("Story {}", i),
                    description: String::new(),
                    acceptance_criteria: AcceptanceCriteria::default(),
                    story_points: 3,
                })
                .collect(),
            test_cases: Vec::new(),
        }
    }

    #[test]
    fn test_full_completeness_at_three_stories() {
        let metrics = compute_metrics(&[record_with_stories(3)]);
        assert_eq!(metrics.story_count_completeness, 100.0);
        assert_eq!(metrics.risk_coverage, 40.0);
        assert_eq!(metrics.consistency_score, 76.0);
    }

    #[test]
    fn test_partial_completeness_below_target() {
        let metrics = compute_metrics(&[record_with_stories(1)]);
        assert!((metrics.story_count_completeness - 33.333).abs() < 0.01);
        assert_eq!(metrics.risk_coverage, 40.0);
    }

    #[test]
    fn test_empty_batch_scores_zero() {
        let metrics = compute_metrics(&[]);
        assert_eq!(metrics.story_count_completeness, 0.0);
        assert_eq!(metrics.risk_coverage, 0.0);
        assert_eq!(metrics.consistency_score, 0.0);
    }

    #[test]
    fn test_stories_counted_across_records() {
        let metrics = compute_metrics(&[record_with_stories(2), record_with_stories(2)]);
        assert_eq!(metrics.story_count_completeness, 100.0);
    }
}
