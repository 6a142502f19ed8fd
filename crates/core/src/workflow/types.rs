//! Types for the sourcing workflow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::fallback::FallbackRecommendation;
use crate::heap::HeapError;
use crate::scoring::{QualityAssessment, ScoringError, Strategy};
use crate::source::CandidateRecord;

/// Errors that can occur while running a workflow.
///
/// Source and extraction failures are not here: a failed page ends the
/// search phase with partial results, and a failed extraction degrades
/// to scoring whatever sections exist.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Scoring error.
    #[error("scoring error: {0}")]
    Scoring(#[from] ScoringError),

    /// Heap error.
    #[error("heap error: {0}")]
    Heap(#[from] HeapError),
}

/// One sourcing request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRequest {
    pub query: String,
    pub location: String,
    /// Strategy context; absent means neutral scoring, no bonuses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Strategy>,
}

/// A candidate that went through full evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatedCandidate {
    pub record: CandidateRecord,
    /// Lightweight score that admitted this candidate at search time.
    pub headline_score: f64,
    pub assessment: QualityAssessment,
}

/// Evaluated-score counts per quality band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreDistribution {
    /// overall_score >= 9.
    pub exceptional: usize,
    /// 7 <= overall_score < 9.
    pub target: usize,
    /// 4 <= overall_score < 7.
    pub acceptable: usize,
    /// overall_score < 4.
    pub below: usize,
}

impl ScoreDistribution {
    pub fn from_scores<I: IntoIterator<Item = f64>>(scores: I) -> Self {
        let mut dist = Self::default();
        for score in scores {
            if score >= 9.0 {
                dist.exceptional += 1;
            } else if score >= 7.0 {
                dist.target += 1;
            } else if score >= 4.0 {
                dist.acceptable += 1;
            } else {
                dist.below += 1;
            }
        }
        dist
    }
}

/// Aggregate over all evaluated candidates of a run.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SummaryStats {
    pub count: usize,
    pub average_score: f64,
    pub score_distribution: ScoreDistribution,
}

/// Final outcome of a workflow run.
///
/// Insufficiency and cancellation both land here as
/// `quality_sufficient = false` with whatever partial results exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Identifier of the run that produced this result.
    pub run_id: Uuid,
    /// When the run finished.
    pub completed_at: DateTime<Utc>,
    /// Evaluated candidates meeting the final threshold, best first.
    pub quality_candidates: Vec<EvaluatedCandidate>,
    pub quality_sufficient: bool,
    /// Last fallback action taken, if any cycle ran.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_recommendation: Option<FallbackRecommendation>,
    pub summary_stats: SummaryStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_distribution_bands() {
        let dist = ScoreDistribution::from_scores([9.5, 9.0, 8.0, 7.0, 5.0, 4.0, 3.9, 0.0]);
        assert_eq!(
            dist,
            ScoreDistribution {
                exceptional: 2,
                target: 2,
                acceptable: 2,
                below: 2,
            }
        );
    }

    #[test]
    fn test_request_strategy_optional() {
        let json = r#"{"query": "backend engineer", "location": "Berlin"}"#;
        let request: WorkflowRequest = serde_json::from_str(json).unwrap();
        assert!(request.strategy.is_none());
    }
}
