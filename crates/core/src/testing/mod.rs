//! Testing utilities and mock implementations.
//!
//! This module provides a mock candidate source and fixture helpers,
//! allowing full workflow testing without real infrastructure.
//!
//! # Example
//!
//! ```rust,ignore
//! use talentscout_core::testing::{fixtures, MockCandidateSource};
//!
//! let source = MockCandidateSource::new();
//! source.push_page(vec![
//!     fixtures::raw_candidate("in/jane", "Senior Backend Engineer"),
//! ]).await;
//!
//! // Use as the workflow's candidate source...
//! ```

mod mock_source;

pub use mock_source::{MockCandidateSource, RecordedSearch};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::scoring::{CompanyTiers, Strategy};
    use crate::source::{EducationEntry, ExperienceEntry, FullProfile, RawCandidate};

    /// Create a raw search result with reasonable defaults.
    pub fn raw_candidate(identity_key: &str, headline: &str) -> RawCandidate {
        RawCandidate {
            identity_key: identity_key.to_string(),
            display_name: identity_key
                .rsplit('/')
                .next()
                .unwrap_or(identity_key)
                .to_string(),
            headline: headline.to_string(),
            employer_hint: None,
        }
    }

    /// Raw search result with an employer hint.
    pub fn employed_candidate(identity_key: &str, headline: &str, employer: &str) -> RawCandidate {
        RawCandidate {
            employer_hint: Some(employer.to_string()),
            ..raw_candidate(identity_key, headline)
        }
    }

    /// A complete profile: two positions, one degree, skills and summary.
    pub fn full_profile(title: &str, company: &str, skills: &[&str]) -> FullProfile {
        FullProfile {
            experiences: vec![
                ExperienceEntry {
                    title: title.to_string(),
                    company: company.to_string(),
                },
                ExperienceEntry {
                    title: format!("Junior {}", title),
                    company: "Startup GmbH".to_string(),
                },
            ],
            education: vec![EducationEntry {
                school: "TU Berlin".to_string(),
                degree: Some("MSc Computer Science".to_string()),
            }],
            skills: skills.iter().map(|s| s.to_string()).collect(),
            summary: Some(
                "Experienced engineer who has shipped and operated large production systems \
                 across several teams and domains."
                    .to_string(),
            ),
        }
    }

    /// A strategy targeting one title with one tier-1 company.
    pub fn strategy(target_title: &str, tier_1_company: &str, technologies: &[&str]) -> Strategy {
        Strategy {
            target_titles: vec![target_title.to_string()],
            key_technologies: technologies.iter().map(|s| s.to_string()).collect(),
            company_tiers: CompanyTiers {
                tier_1: vec![tier_1_company.to_string()],
                tier_2: vec![],
            },
            ..Default::default()
        }
    }
}
