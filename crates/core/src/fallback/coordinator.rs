//! The fallback coordinator.
//!
//! When evaluation yields too few quality candidates, the coordinator
//! picks exactly one remediation per cycle, in fixed priority: pull heap
//! backups, then resume searching, then lower the evaluation threshold.
//! Threshold lowering is terminal. Running out of options is a returned
//! state, never an error.

use serde::{Deserialize, Serialize};

use crate::budget::SearchBudgetController;
use crate::heap::CandidateHeap;

fn default_max_attempts() -> u32 {
    3
}

fn default_backup_limit() -> usize {
    6
}

fn default_threshold_step() -> f64 {
    1.0
}

fn default_threshold_floor() -> f64 {
    4.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackConfig {
    /// Upper bound on remediation cycles per run.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// How many backup entries to pull per heap-backup cycle.
    #[serde(default = "default_backup_limit")]
    pub backup_limit: usize,
    /// How much the evaluation threshold drops in the terminal tier.
    #[serde(default = "default_threshold_step")]
    pub threshold_step: f64,
    /// The threshold never drops below this.
    #[serde(default = "default_threshold_floor")]
    pub threshold_floor: f64,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backup_limit: default_backup_limit(),
            threshold_step: default_threshold_step(),
            threshold_floor: default_threshold_floor(),
        }
    }
}

/// Where the run currently is in the evaluate/remediate cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePhase {
    Evaluating,
    NeedFallback,
    Done,
    Exhausted,
}

/// One remediation action, dispatched exhaustively by the runner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum FallbackRecommendation {
    /// Pull the next batch of unextracted heap entries.
    HeapBackup { limit: usize },
    /// Resume searching from the next unsearched page.
    SearchExpand { from_page: u32 },
    /// Re-evaluate the extracted set against a lowered threshold.
    /// Terminal: the cycle ends after this regardless of outcome.
    ThresholdLower { new_threshold: f64 },
    /// No further remediation will help or is allowed.
    Exhausted,
    /// The terminal tier already ran; accept what exists.
    Done,
}

/// Per-run fallback state.
pub struct FallbackCoordinator {
    config: FallbackConfig,
    attempts_used: u32,
    threshold_lowered: bool,
    phase: CyclePhase,
}

impl FallbackCoordinator {
    pub fn new(config: FallbackConfig) -> Self {
        Self {
            config,
            attempts_used: 0,
            threshold_lowered: false,
            phase: CyclePhase::Evaluating,
        }
    }

    pub fn attempts_used(&self) -> u32 {
        self.attempts_used
    }

    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    /// Select the next remediation given the current heap and budget
    /// state. Each selected tier consumes one attempt.
    pub fn next_action(
        &mut self,
        heap: &CandidateHeap,
        budget: &SearchBudgetController,
        current_threshold: f64,
    ) -> FallbackRecommendation {
        if self.threshold_lowered {
            self.phase = CyclePhase::Done;
            return FallbackRecommendation::Done;
        }
        if self.attempts_used >= self.config.max_attempts {
            self.phase = CyclePhase::Exhausted;
            return FallbackRecommendation::Exhausted;
        }

        self.phase = CyclePhase::NeedFallback;

        if heap.unextracted_count() > 0 {
            self.attempts_used += 1;
            self.phase = CyclePhase::Evaluating;
            return FallbackRecommendation::HeapBackup {
                limit: self.config.backup_limit,
            };
        }

        if budget.has_remaining_budget() {
            self.attempts_used += 1;
            self.phase = CyclePhase::Evaluating;
            return FallbackRecommendation::SearchExpand {
                from_page: budget.pages_searched(),
            };
        }

        self.attempts_used += 1;
        self.threshold_lowered = true;
        self.phase = CyclePhase::Evaluating;
        let new_threshold = (current_threshold - self.config.threshold_step)
            .max(self.config.threshold_floor);
        FallbackRecommendation::ThresholdLower { new_threshold }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::BudgetConfig;
    use crate::heap::HeapEntry;
    use crate::source::CandidateRecord;

    fn make_entry(key: &str, score: f64) -> HeapEntry {
        HeapEntry::new(
            CandidateRecord {
                identity_key: key.to_string(),
                display_name: key.to_string(),
                headline: "Engineer".to_string(),
                employer_hint: None,
                profile: None,
            },
            score,
        )
    }

    fn exhausted_budget() -> SearchBudgetController {
        let mut budget = SearchBudgetController::new(BudgetConfig {
            page_limit_initial: 1,
            page_limit_max: 1,
            ..BudgetConfig::default()
        });
        budget.record_page(&[5.0]);
        budget
    }

    fn fresh_budget() -> SearchBudgetController {
        SearchBudgetController::new(BudgetConfig::default())
    }

    #[test]
    fn test_heap_backup_preferred_when_backups_remain() {
        let mut coordinator = FallbackCoordinator::new(FallbackConfig::default());
        let mut heap = CandidateHeap::new(5);
        heap.add(make_entry("a", 8.0));

        let action = coordinator.next_action(&heap, &fresh_budget(), 7.0);
        assert_eq!(action, FallbackRecommendation::HeapBackup { limit: 6 });
        assert_eq!(coordinator.attempts_used(), 1);
    }

    #[test]
    fn test_search_expand_when_heap_drained() {
        let mut coordinator = FallbackCoordinator::new(FallbackConfig::default());
        let mut heap = CandidateHeap::new(5);
        heap.add(make_entry("a", 8.0));
        heap.mark_extracted("a");

        let budget = fresh_budget();
        let action = coordinator.next_action(&heap, &budget, 7.0);
        assert_eq!(action, FallbackRecommendation::SearchExpand { from_page: 0 });
    }

    #[test]
    fn test_threshold_lower_is_last_and_terminal() {
        let mut coordinator = FallbackCoordinator::new(FallbackConfig::default());
        let heap = CandidateHeap::new(5);
        let budget = exhausted_budget();

        let action = coordinator.next_action(&heap, &budget, 7.0);
        assert_eq!(
            action,
            FallbackRecommendation::ThresholdLower { new_threshold: 6.0 }
        );

        // Terminal regardless of what the heap or budget look like now
        let action = coordinator.next_action(&heap, &budget, 6.0);
        assert_eq!(action, FallbackRecommendation::Done);
        assert_eq!(coordinator.phase(), CyclePhase::Done);
    }

    #[test]
    fn test_threshold_respects_floor() {
        let mut coordinator = FallbackCoordinator::new(FallbackConfig {
            threshold_step: 2.0,
            threshold_floor: 4.0,
            ..FallbackConfig::default()
        });
        let heap = CandidateHeap::new(5);
        let budget = exhausted_budget();

        let action = coordinator.next_action(&heap, &budget, 5.0);
        assert_eq!(
            action,
            FallbackRecommendation::ThresholdLower { new_threshold: 4.0 }
        );
    }

    #[test]
    fn test_attempts_never_exceed_max() {
        let mut coordinator = FallbackCoordinator::new(FallbackConfig {
            max_attempts: 2,
            ..FallbackConfig::default()
        });
        let mut heap = CandidateHeap::new(10);
        for i in 0..10 {
            heap.add(make_entry(&format!("k{i}"), 5.0 + i as f64 * 0.1));
        }
        let budget = fresh_budget();

        for _ in 0..5 {
            let action = coordinator.next_action(&heap, &budget, 7.0);
            assert!(coordinator.attempts_used() <= 2);
            if action == FallbackRecommendation::Exhausted {
                break;
            }
        }
        assert_eq!(
            coordinator.next_action(&heap, &budget, 7.0),
            FallbackRecommendation::Exhausted
        );
        assert_eq!(coordinator.phase(), CyclePhase::Exhausted);
    }
}
