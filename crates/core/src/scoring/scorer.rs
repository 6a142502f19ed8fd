//! The quality scorer.

use crate::source::CandidateRecord;

use super::bonuses::calculate_bonuses;
use super::types::{ComponentScores, QualityAssessment, ScoringError, Strategy};
use super::weights::{ScoreWeights, DEFAULT_WEIGHTS};

/// Score when no signal is available either way.
const NEUTRAL_SCORE: f64 = 5.0;
/// Base for lightweight headline scoring under a strategy.
const HEADLINE_BASE: f64 = 3.0;
/// Bonus for a target-title match in the headline.
const TITLE_MATCH_BONUS: f64 = 2.0;

/// Deterministic candidate scorer.
///
/// Lightweight mode gates heap admission at search time from the headline
/// alone; full mode produces a component breakdown over the extracted
/// profile. Both are pure functions of their inputs.
pub struct QualityScorer {
    weights: ScoreWeights,
}

impl Default for QualityScorer {
    fn default() -> Self {
        Self {
            weights: DEFAULT_WEIGHTS,
        }
    }
}

impl QualityScorer {
    pub fn new(weights: ScoreWeights) -> Result<Self, ScoringError> {
        weights.validate()?;
        Ok(Self { weights })
    }

    /// Lightweight headline-only score in [0, 10].
    ///
    /// Without a strategy there is nothing to match against, so every
    /// candidate gets the neutral score and admission falls to the
    /// threshold alone.
    pub fn score_headline(&self, record: &CandidateRecord, strategy: Option<&Strategy>) -> f64 {
        let Some(strategy) = strategy else {
            return NEUTRAL_SCORE;
        };

        let headline = record.headline.to_lowercase();
        let mut score = HEADLINE_BASE;

        if strategy
            .target_titles
            .iter()
            .any(|t| headline.contains(&t.to_lowercase()))
        {
            score += TITLE_MATCH_BONUS;
        }

        score += calculate_bonuses(record, Some(strategy)).total();
        score.clamp(0.0, 10.0)
    }

    /// Full assessment over the extracted profile.
    ///
    /// Missing profile sections degrade the relevant components toward
    /// neutral (or zero for completeness) instead of failing. The only
    /// error is a malformed weight override.
    pub fn score_full(
        &self,
        record: &CandidateRecord,
        strategy: Option<&Strategy>,
        threshold: f64,
    ) -> Result<QualityAssessment, ScoringError> {
        let weights = match strategy.and_then(|s| s.weight_overrides) {
            Some(overrides) => {
                overrides.validate()?;
                overrides
            }
            None => self.weights,
        };

        let components = ComponentScores {
            technical_relevance: technical_relevance(record, strategy),
            experience_quality: experience_quality(record, strategy),
            cultural_fit: cultural_fit(record),
            profile_completeness: profile_completeness(record),
        };
        let bonuses = calculate_bonuses(record, strategy);

        Ok(assemble(components, bonuses, &weights, threshold))
    }
}

/// Compose the final assessment from components and bonuses.
fn assemble(
    components: ComponentScores,
    bonuses: super::types::StrategicBonuses,
    weights: &ScoreWeights,
    threshold: f64,
) -> QualityAssessment {
    let weighted = components.technical_relevance * weights.technical_relevance
        + components.experience_quality * weights.experience_quality
        + components.cultural_fit * weights.cultural_fit
        + components.profile_completeness * weights.profile_completeness;

    let overall_score = (weighted + bonuses.total()).clamp(0.0, 10.0);
    let (strengths, concerns) = insights(&components);

    QualityAssessment {
        components,
        bonuses,
        overall_score,
        meets_threshold: overall_score >= threshold,
        strengths,
        concerns,
    }
}

/// How well the headline and skills match the strategy's titles and
/// technologies. Neutral without a strategy.
fn technical_relevance(record: &CandidateRecord, strategy: Option<&Strategy>) -> f64 {
    let Some(strategy) = strategy else {
        return NEUTRAL_SCORE;
    };
    if strategy.target_titles.is_empty() && strategy.key_technologies.is_empty() {
        return NEUTRAL_SCORE;
    }

    let headline = record.headline.to_lowercase();
    let skills: Vec<String> = record
        .profile
        .as_ref()
        .map(|p| p.skills.iter().map(|s| s.to_lowercase()).collect())
        .unwrap_or_default();

    let mut score = 5.0;

    if strategy
        .target_titles
        .iter()
        .any(|t| headline.contains(&t.to_lowercase()))
    {
        score += 2.0;
    }

    let tech_matches = strategy
        .key_technologies
        .iter()
        .map(|t| t.to_lowercase())
        .filter(|tech| headline.contains(tech) || skills.iter().any(|s| s.contains(tech)))
        .count();
    score += (tech_matches as f64 * 0.5).min(3.0);

    score.min(10.0)
}

/// Quantity and seniority of the work history. Neutral when the
/// profile carries no experience section.
fn experience_quality(record: &CandidateRecord, strategy: Option<&Strategy>) -> f64 {
    let experiences = match &record.profile {
        Some(profile) if !profile.experiences.is_empty() => &profile.experiences,
        _ => return NEUTRAL_SCORE,
    };

    let mut score = 5.0;

    if experiences.len() >= 4 {
        score += 1.5;
    } else if experiences.len() >= 2 {
        score += 1.0;
    }

    // Seniority scan over the most recent titles, strategy bands first
    let bands = strategy.map(|s| s.seniority_bands.as_slice()).unwrap_or(&[]);
    for exp in experiences.iter().take(3) {
        let title = exp.title.to_lowercase();
        let band_bonus = bands
            .iter()
            .find(|band| band.keywords.iter().any(|kw| title.contains(&kw.to_lowercase())))
            .map(|band| band.bonus);
        if let Some(bonus) = band_bonus {
            score += bonus;
            break;
        }
        if ["engineer", "developer", "architect"]
            .iter()
            .any(|role| title.contains(role))
        {
            score += 0.5;
            break;
        }
    }

    // Recent employers against the strategy's company tiers
    if let Some(strategy) = strategy {
        for exp in experiences.iter().take(2) {
            let company = exp.company.to_lowercase();
            if strategy
                .company_tiers
                .tier_1
                .iter()
                .any(|c| company.contains(&c.to_lowercase()))
            {
                score += 1.5;
                break;
            }
            if strategy
                .company_tiers
                .tier_2
                .iter()
                .any(|c| company.contains(&c.to_lowercase()))
            {
                score += 1.0;
                break;
            }
        }
    }

    score.min(10.0)
}

/// Communication and background signals: summary depth, headline
/// richness, education presence.
fn cultural_fit(record: &CandidateRecord) -> f64 {
    let mut score: f64 = 5.0;

    if let Some(profile) = &record.profile {
        let summary_len = profile.summary.as_deref().map(str::len).unwrap_or(0);
        if summary_len > 100 {
            score += 2.0;
        } else if summary_len > 50 {
            score += 1.0;
        }
        if !profile.education.is_empty() {
            score += 1.0;
        }
    }

    if record.headline.len() > 50 {
        score += 1.0;
    }

    score.min(10.0)
}

/// Fraction of expected profile sections present, scaled to [0, 10].
fn profile_completeness(record: &CandidateRecord) -> f64 {
    let Some(profile) = &record.profile else {
        return 0.0;
    };
    10.0 * profile.sections_present() as f64 / crate::source::FullProfile::EXPECTED_SECTIONS as f64
}

/// Derive strength and concern notes from the component scores.
fn insights(components: &ComponentScores) -> (Vec<String>, Vec<String>) {
    let mut strengths = Vec::new();
    let mut concerns = Vec::new();

    for (label, value) in [
        ("technical relevance", components.technical_relevance),
        ("experience quality", components.experience_quality),
        ("cultural fit", components.cultural_fit),
        ("profile completeness", components.profile_completeness),
    ] {
        if value >= 7.0 {
            strengths.push(format!("Strong {}", label));
        } else if value < 4.0 {
            concerns.push(format!("Limited {}", label));
        }
    }

    (strengths, concerns)
}
