//! Component weights for the full scoring mode.

use serde::{Deserialize, Serialize};

use super::types::ScoringError;

/// Default weights: technical relevance and experience quality dominate,
/// completeness is a small tiebreaker.
pub const DEFAULT_WEIGHTS: ScoreWeights = ScoreWeights {
    technical_relevance: 0.35,
    experience_quality: 0.35,
    cultural_fit: 0.20,
    profile_completeness: 0.10,
};

/// Weights applied to the four component scores.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub technical_relevance: f64,
    pub experience_quality: f64,
    pub cultural_fit: f64,
    pub profile_completeness: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        DEFAULT_WEIGHTS
    }
}

impl ScoreWeights {
    pub fn sum(&self) -> f64 {
        self.technical_relevance
            + self.experience_quality
            + self.cultural_fit
            + self.profile_completeness
    }

    /// Reject malformed weight maps. Negative weights would let a bad
    /// component raise the overall score.
    pub fn validate(&self) -> Result<(), ScoringError> {
        for (name, value) in [
            ("technical_relevance", self.technical_relevance),
            ("experience_quality", self.experience_quality),
            ("cultural_fit", self.cultural_fit),
            ("profile_completeness", self.profile_completeness),
        ] {
            if value < 0.0 {
                return Err(ScoringError::InvalidWeights(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}
