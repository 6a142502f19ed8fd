//! The page-boundary decision loop.
//!
//! After each processed page the controller weighs hard budget (page
//! limits) against soft quality signals (running admitted-score average,
//! heap utilization, score plateau) and returns one decision. Plateau
//! detection needs an ordered per-page score history, which is why pages
//! are processed strictly in order.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

fn default_target_quality_candidates() -> usize {
    5
}

fn default_target_quality_threshold() -> f64 {
    7.0
}

fn default_min_heap_capacity_pct() -> f64 {
    50.0
}

fn default_page_limit_initial() -> u32 {
    3
}

fn default_page_limit_max() -> u32 {
    8
}

fn default_plateau_window() -> usize {
    3
}

fn default_plateau_epsilon() -> f64 {
    0.25
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetConfig {
    /// Stop early once this many candidates are retained at quality.
    #[serde(default = "default_target_quality_candidates")]
    pub target_quality_candidates: usize,
    /// Average admitted score required for the targets-met stop.
    #[serde(default = "default_target_quality_threshold")]
    pub target_quality_threshold: f64,
    /// Heap utilization required for the targets-met stop, and below
    /// which budget expansion is considered.
    #[serde(default = "default_min_heap_capacity_pct")]
    pub min_heap_capacity_pct: f64,
    /// Soft page budget before the first expansion decision.
    #[serde(default = "default_page_limit_initial")]
    pub page_limit_initial: u32,
    /// Hard page ceiling; never exceeded.
    #[serde(default = "default_page_limit_max")]
    pub page_limit_max: u32,
    /// Number of per-page averages considered for plateau detection.
    #[serde(default = "default_plateau_window")]
    pub plateau_window: usize,
    /// Absolute improvement in the half-window means below which the
    /// score history counts as plateaued.
    #[serde(default = "default_plateau_epsilon")]
    pub plateau_epsilon: f64,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            target_quality_candidates: default_target_quality_candidates(),
            target_quality_threshold: default_target_quality_threshold(),
            min_heap_capacity_pct: default_min_heap_capacity_pct(),
            page_limit_initial: default_page_limit_initial(),
            page_limit_max: default_page_limit_max(),
            plateau_window: default_plateau_window(),
            plateau_epsilon: default_plateau_epsilon(),
        }
    }
}

/// Why the controller stopped the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Enough quality candidates retained.
    TargetsMet,
    /// Page budget used up with no grounds to expand.
    BudgetExhausted,
    /// Score history plateaued with budget remaining.
    DiminishingReturns,
}

/// Decision at one page boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDecision {
    Continue,
    /// Soft limit raised; keep searching.
    Expand,
    Stop(StopReason),
}

/// Per-run search budget state.
pub struct SearchBudgetController {
    config: BudgetConfig,
    pages_searched: u32,
    page_limit_current: u32,
    accepted_count: usize,
    accepted_score_sum: f64,
    score_history: VecDeque<f64>,
}

impl SearchBudgetController {
    pub fn new(config: BudgetConfig) -> Self {
        let page_limit_current = config.page_limit_initial.min(config.page_limit_max);
        Self {
            config,
            pages_searched: 0,
            page_limit_current,
            accepted_count: 0,
            accepted_score_sum: 0.0,
            score_history: VecDeque::new(),
        }
    }

    pub fn pages_searched(&self) -> u32 {
        self.pages_searched
    }

    pub fn page_limit_current(&self) -> u32 {
        self.page_limit_current
    }

    /// Whether any hard budget remains.
    pub fn has_remaining_budget(&self) -> bool {
        self.pages_searched < self.config.page_limit_max
    }

    /// Running average over all admitted scores.
    pub fn average_score(&self) -> f64 {
        if self.accepted_count == 0 {
            0.0
        } else {
            self.accepted_score_sum / self.accepted_count as f64
        }
    }

    /// Record the outcome of one processed page. Pages with no admitted
    /// candidates contribute a zero page average.
    pub fn record_page(&mut self, admitted_scores: &[f64]) {
        self.pages_searched += 1;
        self.accepted_count += admitted_scores.len();
        self.accepted_score_sum += admitted_scores.iter().sum::<f64>();

        let page_average = if admitted_scores.is_empty() {
            0.0
        } else {
            admitted_scores.iter().sum::<f64>() / admitted_scores.len() as f64
        };
        self.score_history.push_back(page_average);
        while self.score_history.len() > self.config.plateau_window {
            self.score_history.pop_front();
        }
    }

    /// Decide what to do after the page recorded last.
    pub fn decide(&mut self, heap_utilization_pct: f64) -> PageDecision {
        if self.targets_met(heap_utilization_pct) {
            return PageDecision::Stop(StopReason::TargetsMet);
        }

        if self.pages_searched >= self.page_limit_current {
            let can_expand = self.page_limit_current < self.config.page_limit_max
                && (self.trending_upward() || heap_utilization_pct < self.config.min_heap_capacity_pct);
            if can_expand {
                self.page_limit_current =
                    (self.page_limit_current * 2).min(self.config.page_limit_max);
                return PageDecision::Expand;
            }
            return PageDecision::Stop(StopReason::BudgetExhausted);
        }

        if self.plateaued() {
            return PageDecision::Stop(StopReason::DiminishingReturns);
        }

        PageDecision::Continue
    }

    fn targets_met(&self, heap_utilization_pct: f64) -> bool {
        self.accepted_count >= self.config.target_quality_candidates
            && self.average_score() >= self.config.target_quality_threshold
            && heap_utilization_pct >= self.config.min_heap_capacity_pct
    }

    // Improvement is the difference between the means of the later and
    // earlier halves of the history window.
    fn improvement(&self) -> Option<f64> {
        if self.score_history.len() < self.config.plateau_window {
            return None;
        }
        let mid = self.score_history.len() / 2;
        let (earlier, later): (Vec<f64>, Vec<f64>) = (
            self.score_history.iter().take(mid).copied().collect(),
            self.score_history.iter().skip(mid).copied().collect(),
        );
        if earlier.is_empty() || later.is_empty() {
            return None;
        }
        let earlier_mean = earlier.iter().sum::<f64>() / earlier.len() as f64;
        let later_mean = later.iter().sum::<f64>() / later.len() as f64;
        Some(later_mean - earlier_mean)
    }

    fn trending_upward(&self) -> bool {
        self.improvement()
            .is_some_and(|delta| delta > self.config.plateau_epsilon)
    }

    fn plateaued(&self) -> bool {
        self.improvement()
            .is_some_and(|delta| delta <= self.config.plateau_epsilon)
    }
}
