//! Workflow runner implementation.
//!
//! Drives one sourcing run through its phases:
//! - Search: pages strictly in order (plateau detection needs an
//!   ordered score history), lightweight scoring, heap admission
//! - Evaluation: profile extraction and full scoring of the top batch
//! - Fallback cycles while quality is insufficient, bounded by attempts
//!
//! The heap lives inside the run and the runner is its only mutation
//! site. Cancellation is cooperative and checked at page boundaries and
//! between fallback tiers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::budget::{PageDecision, SearchBudgetController};
use crate::config::EngineConfig;
use crate::fallback::{FallbackCoordinator, FallbackRecommendation};
use crate::heap::{AddOutcome, CandidateHeap, HeapEntry};
use crate::scoring::{QualityScorer, Strategy};
use crate::source::{CandidateRecord, CandidateSource};

use super::types::{
    EvaluatedCandidate, EvaluationResult, ScoreDistribution, SummaryStats, WorkflowError,
    WorkflowRequest,
};

/// Runs sourcing workflows against a candidate source.
pub struct WorkflowRunner {
    config: EngineConfig,
    source: Arc<dyn CandidateSource>,
    scorer: QualityScorer,
    cancelled: Arc<AtomicBool>,
}

impl WorkflowRunner {
    pub fn new(config: EngineConfig, source: Arc<dyn CandidateSource>) -> Result<Self, WorkflowError> {
        let scorer = QualityScorer::new(config.scoring.weights)?;
        Ok(Self {
            config,
            source,
            scorer,
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Handle for cooperative cancellation. Setting it stops the run at
    /// the next page boundary or fallback tier transition.
    pub fn cancellation_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Run one sourcing workflow to completion or cancellation.
    pub async fn run(&self, request: WorkflowRequest) -> Result<EvaluationResult, WorkflowError> {
        let run_id = Uuid::new_v4();
        let strategy = request.strategy.as_ref();
        let mut heap = CandidateHeap::new(self.config.heap.capacity);
        let mut budget = SearchBudgetController::new(self.config.budget.clone());
        let mut coordinator = FallbackCoordinator::new(self.config.fallback.clone());
        let mut threshold = self.config.evaluation.quality_threshold;
        let mut evaluated: Vec<EvaluatedCandidate> = Vec::new();
        let mut last_recommendation = None;

        info!(
            %run_id,
            source = self.source.name(),
            query = %request.query,
            location = %request.location,
            "Starting sourcing workflow"
        );

        self.search_pages(&request, strategy, &mut heap, &mut budget)
            .await;
        let stats = heap.stats();
        debug!(
            retained = stats.count,
            average = stats.average_score,
            min = stats.min_score,
            max = stats.max_score,
            "Search phase heap state"
        );

        if !self.is_cancelled() {
            self.evaluate_batch(
                self.config.evaluation.batch_size,
                &mut heap,
                strategy,
                threshold,
                &mut evaluated,
            )
            .await?;
        }

        while !self.is_cancelled() && !self.sufficient(&evaluated, threshold) {
            let action = coordinator.next_action(&heap, &budget, threshold);
            last_recommendation = Some(action);
            match action {
                FallbackRecommendation::HeapBackup { limit } => {
                    info!(limit, "Fallback: pulling heap backups");
                    self.evaluate_batch(limit, &mut heap, strategy, threshold, &mut evaluated)
                        .await?;
                }
                FallbackRecommendation::SearchExpand { from_page } => {
                    info!(from_page, "Fallback: resuming search");
                    self.search_pages(&request, strategy, &mut heap, &mut budget)
                        .await;
                    self.evaluate_batch(
                        self.config.evaluation.batch_size,
                        &mut heap,
                        strategy,
                        threshold,
                        &mut evaluated,
                    )
                    .await?;
                }
                FallbackRecommendation::ThresholdLower { new_threshold } => {
                    info!(
                        old_threshold = threshold,
                        new_threshold, "Fallback: lowering evaluation threshold"
                    );
                    threshold = new_threshold;
                    for candidate in &mut evaluated {
                        candidate.assessment.meets_threshold =
                            candidate.assessment.overall_score >= threshold;
                    }
                }
                FallbackRecommendation::Done | FallbackRecommendation::Exhausted => {
                    info!(
                        attempts_used = coordinator.attempts_used(),
                        "Fallback options spent"
                    );
                    break;
                }
            }
        }

        let quality_sufficient = !self.is_cancelled() && self.sufficient(&evaluated, threshold);
        let result = build_result(
            run_id,
            evaluated,
            threshold,
            quality_sufficient,
            last_recommendation,
        );
        info!(
            %run_id,
            quality_candidates = result.quality_candidates.len(),
            quality_sufficient = result.quality_sufficient,
            evaluated = result.summary_stats.count,
            "Sourcing workflow finished"
        );
        Ok(result)
    }

    /// Fetch and score pages until the budget controller stops, the
    /// source runs dry, a page fails, or the run is cancelled.
    async fn search_pages(
        &self,
        request: &WorkflowRequest,
        strategy: Option<&Strategy>,
        heap: &mut CandidateHeap,
        budget: &mut SearchBudgetController,
    ) {
        loop {
            if self.is_cancelled() {
                info!("Cancelled during search phase");
                return;
            }

            let page_index = budget.pages_searched();
            let raw = match self
                .source
                .search_page(&request.query, &request.location, page_index)
                .await
            {
                Ok(raw) => raw,
                Err(e) => {
                    warn!("Search page {} failed: {}", page_index, e);
                    return;
                }
            };
            if raw.is_empty() {
                info!(page = page_index, "Source has no more results");
                return;
            }

            let mut admitted = Vec::new();
            for candidate in raw {
                let record = CandidateRecord::from_raw(candidate);
                let score = self.scorer.score_headline(&record, strategy);
                if score < self.config.heap.admission_threshold {
                    continue;
                }
                match heap.add(HeapEntry::new(record, score)) {
                    AddOutcome::Inserted | AddOutcome::ReplacedMin => admitted.push(score),
                    AddOutcome::Duplicate | AddOutcome::BelowMin => {}
                }
            }
            debug!(
                page = page_index,
                admitted = admitted.len(),
                utilization = heap.capacity_utilization_pct(),
                "Page processed"
            );

            budget.record_page(&admitted);
            match budget.decide(heap.capacity_utilization_pct()) {
                PageDecision::Continue => {}
                PageDecision::Expand => {
                    debug!(
                        new_limit = budget.page_limit_current(),
                        "Page budget expanded"
                    );
                }
                PageDecision::Stop(reason) => {
                    info!(
                        ?reason,
                        pages = budget.pages_searched(),
                        "Search phase stopped"
                    );
                    return;
                }
            }
        }
    }

    /// Extract and fully score the next batch of unextracted entries.
    /// Extraction failures degrade to scoring the search-time record.
    async fn evaluate_batch(
        &self,
        limit: usize,
        heap: &mut CandidateHeap,
        strategy: Option<&Strategy>,
        threshold: f64,
        evaluated: &mut Vec<EvaluatedCandidate>,
    ) -> Result<(), WorkflowError> {
        let batch = heap.backups(0, limit);
        if batch.is_empty() {
            debug!("No unextracted candidates to evaluate");
            return Ok(());
        }
        info!(batch = batch.len(), threshold, "Evaluating candidate batch");

        for entry in batch {
            if self.is_cancelled() {
                info!("Cancelled during evaluation phase");
                return Ok(());
            }

            let record = match self.source.extract_profile(&entry.identity_key).await {
                Ok(profile) => entry.record.with_profile(profile),
                Err(e) => {
                    warn!(
                        "Profile extraction failed for {}: {}",
                        entry.identity_key, e
                    );
                    entry.record.clone()
                }
            };

            let assessment = self.scorer.score_full(&record, strategy, threshold)?;
            heap.mark_extracted(&entry.identity_key);
            heap.attach_assessment(&entry.identity_key, assessment.clone());
            evaluated.push(EvaluatedCandidate {
                record,
                headline_score: entry.score,
                assessment,
            });
        }
        Ok(())
    }

    fn sufficient(&self, evaluated: &[EvaluatedCandidate], threshold: f64) -> bool {
        let quality = evaluated
            .iter()
            .filter(|c| c.assessment.overall_score >= threshold)
            .count();
        quality >= self.config.evaluation.min_quality_candidates
    }
}

fn build_result(
    run_id: Uuid,
    evaluated: Vec<EvaluatedCandidate>,
    threshold: f64,
    quality_sufficient: bool,
    fallback_recommendation: Option<FallbackRecommendation>,
) -> EvaluationResult {
    let scores: Vec<f64> = evaluated
        .iter()
        .map(|c| c.assessment.overall_score)
        .collect();
    let summary_stats = SummaryStats {
        count: scores.len(),
        average_score: if scores.is_empty() {
            0.0
        } else {
            scores.iter().sum::<f64>() / scores.len() as f64
        },
        score_distribution: ScoreDistribution::from_scores(scores.iter().copied()),
    };

    let mut quality_candidates: Vec<EvaluatedCandidate> = evaluated
        .into_iter()
        .filter(|c| c.assessment.overall_score >= threshold)
        .collect();
    quality_candidates.sort_by(|a, b| {
        b.assessment
            .overall_score
            .total_cmp(&a.assessment.overall_score)
    });

    EvaluationResult {
        run_id,
        completed_at: Utc::now(),
        quality_candidates,
        quality_sufficient,
        fallback_recommendation,
        summary_stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{CompanyTiers, Strategy};
    use crate::source::RawCandidate;
    use crate::testing::MockCandidateSource;

    fn make_raw(key: &str, headline: &str) -> RawCandidate {
        RawCandidate {
            identity_key: key.to_string(),
            display_name: key.to_string(),
            headline: headline.to_string(),
            employer_hint: None,
        }
    }

    fn make_strategy() -> Strategy {
        Strategy {
            target_titles: vec!["backend engineer".to_string()],
            key_technologies: vec!["rust".to_string()],
            company_tiers: CompanyTiers {
                tier_1: vec!["google".to_string()],
                tier_2: vec![],
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_run_with_empty_source() {
        let source = Arc::new(MockCandidateSource::new());
        let runner = WorkflowRunner::new(EngineConfig::default(), source).unwrap();

        let result = runner
            .run(WorkflowRequest {
                query: "backend engineer".to_string(),
                location: "Berlin".to_string(),
                strategy: None,
            })
            .await
            .unwrap();

        assert!(!result.quality_sufficient);
        assert_eq!(result.summary_stats.count, 0);
        assert!(result.quality_candidates.is_empty());
    }

    #[tokio::test]
    async fn test_run_admits_and_evaluates() {
        let source = MockCandidateSource::new();
        source
            .push_page(vec![
                make_raw("in/a", "Senior Backend Engineer at Google, rust"),
                make_raw("in/b", "Backend Engineer writing rust"),
            ])
            .await;
        let source = Arc::new(source);

        let runner =
            WorkflowRunner::new(EngineConfig::default(), Arc::clone(&source) as Arc<dyn CandidateSource>)
                .unwrap();
        let result = runner
            .run(WorkflowRequest {
                query: "backend engineer".to_string(),
                location: "Berlin".to_string(),
                strategy: Some(make_strategy()),
            })
            .await
            .unwrap();

        assert_eq!(result.summary_stats.count, 2);
        let calls = source.recorded_searches().await;
        assert!(!calls.is_empty());
        assert_eq!(calls[0].page_index, 0);
    }

    #[tokio::test]
    async fn test_cancellation_yields_partial_insufficient_result() {
        let source = MockCandidateSource::new();
        source
            .push_page(vec![make_raw("in/a", "Backend Engineer")])
            .await;
        let source = Arc::new(source);

        let runner = WorkflowRunner::new(EngineConfig::default(), source).unwrap();
        runner.cancellation_handle().store(true, Ordering::SeqCst);

        let result = runner
            .run(WorkflowRequest {
                query: "backend engineer".to_string(),
                location: "Berlin".to_string(),
                strategy: None,
            })
            .await
            .unwrap();

        assert!(!result.quality_sufficient);
        assert_eq!(result.summary_stats.count, 0);
    }
}
