//! Types for the candidate source seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A candidate as yielded by one search results page, before any
/// profile extraction has happened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCandidate {
    /// Canonicalized profile identifier, unique per candidate.
    /// Used for deduplication across pages.
    pub identity_key: String,
    /// Display name as shown on the results page.
    pub display_name: String,
    /// Headline / current title text.
    pub headline: String,
    /// Current employer hint, if the results page exposes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employer_hint: Option<String>,
}

/// A single position in a candidate's work history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
}

/// A single education entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EducationEntry {
    pub school: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
}

/// A fully extracted candidate profile.
///
/// Every section is optional in practice: extraction frequently yields
/// partial profiles, and scoring must degrade gracefully rather than fail.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FullProfile {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub experiences: Vec<ExperienceEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub education: Vec<EducationEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl FullProfile {
    /// Number of expected profile sections that are actually present.
    pub fn sections_present(&self) -> usize {
        let mut present = 0;
        if !self.experiences.is_empty() {
            present += 1;
        }
        if !self.education.is_empty() {
            present += 1;
        }
        if !self.skills.is_empty() {
            present += 1;
        }
        if self.summary.as_deref().is_some_and(|s| !s.is_empty()) {
            present += 1;
        }
        present
    }

    /// Total number of expected sections.
    pub const EXPECTED_SECTIONS: usize = 4;
}

/// A candidate record captured for one workflow run.
///
/// Immutable once captured: rescoring or profile enrichment produces a new
/// record, never an in-place mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub identity_key: String,
    pub display_name: String,
    pub headline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employer_hint: Option<String>,
    /// Full profile, present only after extraction succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<FullProfile>,
}

impl CandidateRecord {
    /// Capture a record from a raw search result.
    pub fn from_raw(raw: RawCandidate) -> Self {
        Self {
            identity_key: raw.identity_key,
            display_name: raw.display_name,
            headline: raw.headline,
            employer_hint: raw.employer_hint,
            profile: None,
        }
    }

    /// A copy of this record with the extracted profile attached.
    pub fn with_profile(&self, profile: FullProfile) -> Self {
        Self {
            profile: Some(profile),
            ..self.clone()
        }
    }
}

/// Errors from fetching a search results page.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Source connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Source navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Internal source error: {0}")]
    Internal(String),
}

/// Errors from extracting a single full profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionError {
    #[error("Authentication required")]
    AuthRequired,

    #[error("Rate limited by source")]
    RateLimited,

    #[error("Profile not found")]
    NotFound,

    #[error("Failed to parse profile page")]
    ParseError,
}

/// Trait for candidate source backends.
///
/// Implementations drive a browser or API client. Pages are finite and
/// non-restartable: the core requests them strictly in order and never
/// asks for the same page twice within a run.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Source name for logging.
    fn name(&self) -> &str;

    /// Fetch one page of search results.
    ///
    /// Returns an empty vector when the source has no more results for
    /// this query.
    async fn search_page(
        &self,
        query: &str,
        location: &str,
        page_index: u32,
    ) -> Result<Vec<RawCandidate>, SourceError>;

    /// Extract the full profile for a previously seen candidate.
    async fn extract_profile(&self, identity_key: &str) -> Result<FullProfile, ExtractionError>;
}
