//! Types for candidate scoring.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::weights::ScoreWeights;

/// Errors that can occur during scoring.
///
/// Missing profiles or absent strategies are never errors; only malformed
/// caller input is.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Invalid score weights: {0}")]
    InvalidWeights(String),
}

/// Ordered company tier lists for the company-tier bonus.
///
/// Tier 1 is checked before tier 2; the first match wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyTiers {
    #[serde(default)]
    pub tier_1: Vec<String>,
    #[serde(default)]
    pub tier_2: Vec<String>,
}

/// One seniority band: keywords that identify it and the bonus it grants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeniorityBand {
    pub keywords: Vec<String>,
    pub bonus: f64,
}

/// Default seniority bands, most senior first.
///
/// First matching band wins its bonus, so executive outranks principal
/// outranks senior.
pub fn default_seniority_bands() -> Vec<SeniorityBand> {
    vec![
        SeniorityBand {
            keywords: vec![
                "cto".to_string(),
                "ceo".to_string(),
                "vp".to_string(),
                "head of".to_string(),
                "director".to_string(),
            ],
            bonus: 2.0,
        },
        SeniorityBand {
            keywords: vec![
                "principal".to_string(),
                "staff".to_string(),
                "architect".to_string(),
            ],
            bonus: 1.8,
        },
        SeniorityBand {
            keywords: vec![
                "senior".to_string(),
                "lead".to_string(),
                "sr.".to_string(),
            ],
            bonus: 1.5,
        },
    ]
}

/// Search strategy context supplied by the strategy collaborator.
///
/// Optional everywhere: scoring without a strategy yields zero bonuses and
/// neutral relevance, never an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Strategy {
    /// Job titles the search is targeting.
    #[serde(default)]
    pub target_titles: Vec<String>,
    /// Key technologies for the role.
    #[serde(default)]
    pub key_technologies: Vec<String>,
    /// Ordered company tiers for the employer bonus.
    #[serde(default)]
    pub company_tiers: CompanyTiers,
    /// Ordered seniority bands, most senior first.
    #[serde(default = "default_seniority_bands")]
    pub seniority_bands: Vec<SeniorityBand>,
    /// Caller-supplied component weights; defaults apply when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_overrides: Option<ScoreWeights>,
}

impl Default for Strategy {
    fn default() -> Self {
        Self {
            target_titles: Vec::new(),
            key_technologies: Vec::new(),
            company_tiers: CompanyTiers::default(),
            seniority_bands: default_seniority_bands(),
            weight_overrides: None,
        }
    }
}

/// The four component scores of a full assessment, each in [0, 10].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ComponentScores {
    pub technical_relevance: f64,
    pub experience_quality: f64,
    pub cultural_fit: f64,
    pub profile_completeness: f64,
}

/// Additive strategic bonuses, independent of the weighted base score.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StrategicBonuses {
    pub company_tier: f64,
    pub seniority: f64,
    pub technology: f64,
}

impl StrategicBonuses {
    pub fn total(&self) -> f64 {
        self.company_tier + self.seniority + self.technology
    }
}

/// A complete quality assessment of one candidate.
///
/// Computed fresh on every scoring call and never mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityAssessment {
    pub components: ComponentScores,
    pub bonuses: StrategicBonuses,
    /// clamp(weighted components + bonuses, 0, 10).
    pub overall_score: f64,
    /// Whether the overall score cleared the evaluation threshold.
    pub meets_threshold: bool,
    /// Positive signals derived from the component scores.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub strengths: Vec<String>,
    /// Gaps or risks derived from the component scores.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub concerns: Vec<String>,
}
