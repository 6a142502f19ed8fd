//! Mock candidate source for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::source::{
    CandidateSource, ExtractionError, FullProfile, RawCandidate, SourceError,
};

/// A recorded search call for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedSearch {
    pub query: String,
    pub location: String,
    pub page_index: u32,
}

/// Mock implementation of the CandidateSource trait.
///
/// Provides controllable behavior for testing:
/// - Scripted result pages, served strictly by page index
/// - Scripted full profiles per identity key
/// - Error injection for page fetches and extractions
/// - Recorded calls for assertions
pub struct MockCandidateSource {
    /// Scripted result pages, indexed by page number.
    pages: Arc<RwLock<Vec<Vec<RawCandidate>>>>,
    /// Scripted full profiles by identity key.
    profiles: Arc<RwLock<HashMap<String, FullProfile>>>,
    /// Per-key extraction errors, returned instead of a profile.
    extraction_errors: Arc<RwLock<HashMap<String, ExtractionError>>>,
    /// If set, the next page fetch fails with this error.
    next_search_error: Arc<RwLock<Option<SourceError>>>,
    /// Recorded search calls.
    searches: Arc<RwLock<Vec<RecordedSearch>>>,
    /// Recorded extraction calls.
    extractions: Arc<RwLock<Vec<String>>>,
}

impl std::fmt::Debug for MockCandidateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockCandidateSource").finish()
    }
}

impl Default for MockCandidateSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCandidateSource {
    /// Create a new mock source with no pages and no profiles.
    pub fn new() -> Self {
        Self {
            pages: Arc::new(RwLock::new(Vec::new())),
            profiles: Arc::new(RwLock::new(HashMap::new())),
            extraction_errors: Arc::new(RwLock::new(HashMap::new())),
            next_search_error: Arc::new(RwLock::new(None)),
            searches: Arc::new(RwLock::new(Vec::new())),
            extractions: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Append one scripted result page.
    pub async fn push_page(&self, candidates: Vec<RawCandidate>) {
        self.pages.write().await.push(candidates);
    }

    /// Script the full profile returned for an identity key.
    pub async fn set_profile(&self, identity_key: &str, profile: FullProfile) {
        self.profiles
            .write()
            .await
            .insert(identity_key.to_string(), profile);
    }

    /// Make extraction of the given key fail with an error.
    pub async fn set_extraction_error(&self, identity_key: &str, error: ExtractionError) {
        self.extraction_errors
            .write()
            .await
            .insert(identity_key.to_string(), error);
    }

    /// Make the next page fetch fail.
    pub async fn fail_next_search(&self, error: SourceError) {
        *self.next_search_error.write().await = Some(error);
    }

    /// All recorded search calls, in order.
    pub async fn recorded_searches(&self) -> Vec<RecordedSearch> {
        self.searches.read().await.clone()
    }

    /// All recorded extraction calls, in order.
    pub async fn recorded_extractions(&self) -> Vec<String> {
        self.extractions.read().await.clone()
    }
}

#[async_trait]
impl CandidateSource for MockCandidateSource {
    fn name(&self) -> &str {
        "mock-source"
    }

    async fn search_page(
        &self,
        query: &str,
        location: &str,
        page_index: u32,
    ) -> Result<Vec<RawCandidate>, SourceError> {
        self.searches.write().await.push(RecordedSearch {
            query: query.to_string(),
            location: location.to_string(),
            page_index,
        });

        if let Some(error) = self.next_search_error.write().await.take() {
            return Err(error);
        }

        // Pages beyond the script are empty, like a drained source
        Ok(self
            .pages
            .read()
            .await
            .get(page_index as usize)
            .cloned()
            .unwrap_or_default())
    }

    async fn extract_profile(&self, identity_key: &str) -> Result<FullProfile, ExtractionError> {
        self.extractions.write().await.push(identity_key.to_string());

        if let Some(error) = self.extraction_errors.read().await.get(identity_key) {
            return Err(*error);
        }

        self.profiles
            .read()
            .await
            .get(identity_key)
            .cloned()
            .ok_or(ExtractionError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_raw(key: &str) -> RawCandidate {
        RawCandidate {
            identity_key: key.to_string(),
            display_name: key.to_string(),
            headline: "Engineer".to_string(),
            employer_hint: None,
        }
    }

    #[tokio::test]
    async fn test_pages_served_by_index() {
        let source = MockCandidateSource::new();
        source.push_page(vec![make_raw("in/a")]).await;
        source.push_page(vec![make_raw("in/b")]).await;

        let page0 = source.search_page("q", "loc", 0).await.unwrap();
        assert_eq!(page0[0].identity_key, "in/a");

        let page1 = source.search_page("q", "loc", 1).await.unwrap();
        assert_eq!(page1[0].identity_key, "in/b");

        let page2 = source.search_page("q", "loc", 2).await.unwrap();
        assert!(page2.is_empty());

        assert_eq!(source.recorded_searches().await.len(), 3);
    }

    #[tokio::test]
    async fn test_search_error_injection_is_one_shot() {
        let source = MockCandidateSource::new();
        source.push_page(vec![make_raw("in/a")]).await;
        source
            .fail_next_search(SourceError::ConnectionFailed("down".to_string()))
            .await;

        assert!(source.search_page("q", "loc", 0).await.is_err());
        assert!(source.search_page("q", "loc", 0).await.is_ok());
    }

    #[tokio::test]
    async fn test_extraction_script_and_errors() {
        let source = MockCandidateSource::new();
        source
            .set_profile(
                "in/a",
                FullProfile {
                    skills: vec!["rust".to_string()],
                    ..Default::default()
                },
            )
            .await;
        source
            .set_extraction_error("in/b", ExtractionError::RateLimited)
            .await;

        assert!(source.extract_profile("in/a").await.is_ok());
        assert_eq!(
            source.extract_profile("in/b").await.unwrap_err(),
            ExtractionError::RateLimited
        );
        assert_eq!(
            source.extract_profile("in/c").await.unwrap_err(),
            ExtractionError::NotFound
        );
        assert_eq!(source.recorded_extractions().await.len(), 3);
    }
}
