use serde::{Deserialize, Serialize};

use crate::budget::BudgetConfig;
use crate::fallback::FallbackConfig;
use crate::scoring::ScoreWeights;

/// Root engine configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub heap: HeapConfig,
    #[serde(default)]
    pub budget: BudgetConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub fallback: FallbackConfig,
    #[serde(default)]
    pub evaluation: EvaluationConfig,
}

/// Candidate heap configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HeapConfig {
    /// Maximum number of retained candidates.
    #[serde(default = "default_heap_capacity")]
    pub capacity: usize,
    /// Minimum lightweight score for heap admission.
    #[serde(default = "default_admission_threshold")]
    pub admission_threshold: f64,
}

impl Default for HeapConfig {
    fn default() -> Self {
        Self {
            capacity: default_heap_capacity(),
            admission_threshold: default_admission_threshold(),
        }
    }
}

fn default_heap_capacity() -> usize {
    50
}

fn default_admission_threshold() -> f64 {
    3.0
}

/// Scoring configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ScoringConfig {
    /// Component weights for full scoring; strategy overrides win.
    #[serde(default)]
    pub weights: ScoreWeights,
}

/// Evaluation phase configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EvaluationConfig {
    /// Overall score a candidate must reach to count as quality.
    #[serde(default = "default_quality_threshold")]
    pub quality_threshold: f64,
    /// How many top candidates get full extraction per cycle.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Quality candidates required before the run is sufficient.
    #[serde(default = "default_min_quality_candidates")]
    pub min_quality_candidates: usize,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            quality_threshold: default_quality_threshold(),
            batch_size: default_batch_size(),
            min_quality_candidates: default_min_quality_candidates(),
        }
    }
}

fn default_quality_threshold() -> f64 {
    7.0
}

fn default_batch_size() -> usize {
    6
}

fn default_min_quality_candidates() -> usize {
    3
}
