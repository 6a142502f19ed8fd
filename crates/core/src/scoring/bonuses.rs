//! Strategic bonus calculation.
//!
//! Bonuses are additive terms on top of the weighted base score, computed
//! whenever a strategy is supplied, in both lightweight and full mode.

use crate::source::CandidateRecord;

use super::types::{SeniorityBand, Strategy, StrategicBonuses};

/// Bonus for a tier-1 company match.
const TIER_1_BONUS: f64 = 1.5;
/// Bonus for a tier-2 company match.
const TIER_2_BONUS: f64 = 1.0;
/// Bonus per matched strategy technology.
const TECH_BONUS_PER_MATCH: f64 = 0.5;
/// Cap on the total technology bonus.
const TECH_BONUS_CAP: f64 = 1.0;

/// Calculate all strategic bonuses for a candidate.
///
/// Without a strategy every bonus is zero.
pub fn calculate_bonuses(record: &CandidateRecord, strategy: Option<&Strategy>) -> StrategicBonuses {
    let Some(strategy) = strategy else {
        return StrategicBonuses::default();
    };

    StrategicBonuses {
        company_tier: company_tier_bonus(record, strategy),
        seniority: seniority_bonus(&record.headline, &strategy.seniority_bands),
        technology: technology_bonus(record, strategy),
    }
}

/// Case-insensitive match of the candidate's current employer against the
/// ordered tier lists. Tier 1 is checked first; the first match wins.
fn company_tier_bonus(record: &CandidateRecord, strategy: &Strategy) -> f64 {
    let employer = current_employer(record);
    let Some(employer) = employer else {
        return 0.0;
    };
    let employer = employer.to_lowercase();

    for tier_1 in &strategy.company_tiers.tier_1 {
        if employer.contains(&tier_1.to_lowercase()) {
            return TIER_1_BONUS;
        }
    }
    for tier_2 in &strategy.company_tiers.tier_2 {
        if employer.contains(&tier_2.to_lowercase()) {
            return TIER_2_BONUS;
        }
    }
    0.0
}

/// The best available employer signal: the most recent experience entry,
/// falling back to the search-time employer hint, falling back to the
/// headline (profiles often carry "Engineer at Acme" there).
fn current_employer(record: &CandidateRecord) -> Option<String> {
    if let Some(profile) = &record.profile {
        if let Some(exp) = profile.experiences.first() {
            return Some(exp.company.clone());
        }
    }
    if let Some(hint) = &record.employer_hint {
        return Some(hint.clone());
    }
    if record.headline.is_empty() {
        None
    } else {
        Some(record.headline.clone())
    }
}

/// Keyword scan of the headline against ordered seniority bands.
/// Most senior band first; the first matching band wins its bonus.
fn seniority_bonus(headline: &str, bands: &[SeniorityBand]) -> f64 {
    let headline = headline.to_lowercase();
    for band in bands {
        if band
            .keywords
            .iter()
            .any(|kw| headline.contains(&kw.to_lowercase()))
        {
            return band.bonus;
        }
    }
    0.0
}

/// min(0.5 x matched technologies, 1.0) over headline and skills.
fn technology_bonus(record: &CandidateRecord, strategy: &Strategy) -> f64 {
    if strategy.key_technologies.is_empty() {
        return 0.0;
    }

    let headline = record.headline.to_lowercase();
    let skills: Vec<String> = record
        .profile
        .as_ref()
        .map(|p| p.skills.iter().map(|s| s.to_lowercase()).collect())
        .unwrap_or_default();

    let matches = strategy
        .key_technologies
        .iter()
        .map(|t| t.to_lowercase())
        .filter(|tech| headline.contains(tech) || skills.iter().any(|s| s.contains(tech)))
        .count();

    (matches as f64 * TECH_BONUS_PER_MATCH).min(TECH_BONUS_CAP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{ExperienceEntry, FullProfile};

    fn make_record(headline: &str, employer_hint: Option<&str>) -> CandidateRecord {
        CandidateRecord {
            identity_key: "in/test".to_string(),
            display_name: "Test".to_string(),
            headline: headline.to_string(),
            employer_hint: employer_hint.map(|s| s.to_string()),
            profile: None,
        }
    }

    fn make_strategy() -> Strategy {
        Strategy {
            target_titles: vec!["engineer".to_string()],
            key_technologies: vec!["rust".to_string(), "kubernetes".to_string()],
            company_tiers: crate::scoring::CompanyTiers {
                tier_1: vec!["google".to_string()],
                tier_2: vec!["stripe".to_string()],
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_no_strategy_zero_bonuses() {
        let record = make_record("Senior Engineer at Google", None);
        let bonuses = calculate_bonuses(&record, None);
        assert_eq!(bonuses.total(), 0.0);
    }

    #[test]
    fn test_tier_1_wins_over_tier_2() {
        let strategy = Strategy {
            company_tiers: crate::scoring::CompanyTiers {
                tier_1: vec!["google".to_string()],
                tier_2: vec!["google cloud".to_string()],
            },
            ..Default::default()
        };
        let record = make_record("Engineer", Some("Google Cloud"));
        let bonuses = calculate_bonuses(&record, Some(&strategy));
        assert_eq!(bonuses.company_tier, TIER_1_BONUS);
    }

    #[test]
    fn test_tier_2_match() {
        let record = make_record("Engineer", Some("Stripe"));
        let bonuses = calculate_bonuses(&record, Some(&make_strategy()));
        assert_eq!(bonuses.company_tier, TIER_2_BONUS);
    }

    #[test]
    fn test_tier_match_is_case_insensitive() {
        let record = make_record("Engineer", Some("GOOGLE"));
        let bonuses = calculate_bonuses(&record, Some(&make_strategy()));
        assert_eq!(bonuses.company_tier, TIER_1_BONUS);
    }

    #[test]
    fn test_employer_from_profile_beats_hint() {
        let mut record = make_record("Engineer", Some("Google"));
        record.profile = Some(FullProfile {
            experiences: vec![ExperienceEntry {
                title: "Engineer".to_string(),
                company: "Stripe".to_string(),
            }],
            ..Default::default()
        });
        let bonuses = calculate_bonuses(&record, Some(&make_strategy()));
        assert_eq!(bonuses.company_tier, TIER_2_BONUS);
    }

    #[test]
    fn test_most_senior_band_wins() {
        // Headline matches both "director" (executive) and "senior"
        let record = make_record("Senior Director of Engineering", None);
        let bonuses = calculate_bonuses(&record, Some(&make_strategy()));
        assert_eq!(bonuses.seniority, 2.0);
    }

    #[test]
    fn test_senior_band() {
        let record = make_record("Senior Engineer at Google", None);
        let bonuses = calculate_bonuses(&record, Some(&make_strategy()));
        assert_eq!(bonuses.seniority, 1.5);
    }

    #[test]
    fn test_no_seniority_match() {
        let record = make_record("Software Engineer", None);
        let bonuses = calculate_bonuses(&record, Some(&make_strategy()));
        assert_eq!(bonuses.seniority, 0.0);
    }

    #[test]
    fn test_tech_bonus_counts_headline_and_skills() {
        let mut record = make_record("Rust Engineer", None);
        record.profile = Some(FullProfile {
            skills: vec!["Kubernetes".to_string(), "Go".to_string()],
            ..Default::default()
        });
        let bonuses = calculate_bonuses(&record, Some(&make_strategy()));
        // rust (headline) + kubernetes (skills) = 2 matches = 1.0
        assert_eq!(bonuses.technology, 1.0);
    }

    #[test]
    fn test_tech_bonus_capped() {
        let strategy = Strategy {
            key_technologies: vec![
                "rust".to_string(),
                "tokio".to_string(),
                "serde".to_string(),
                "axum".to_string(),
            ],
            ..Default::default()
        };
        let record = make_record("Rust tokio serde axum engineer", None);
        let bonuses = calculate_bonuses(&record, Some(&strategy));
        assert_eq!(bonuses.technology, TECH_BONUS_CAP);
    }

    #[test]
    fn test_single_tech_match() {
        let record = make_record("Rust Engineer", None);
        let bonuses = calculate_bonuses(&record, Some(&make_strategy()));
        assert_eq!(bonuses.technology, 0.5);
    }
}
