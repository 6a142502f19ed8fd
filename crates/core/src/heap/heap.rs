//! The candidate heap.
//!
//! A fixed-capacity min-heap over lightweight scores: when full, a new
//! candidate displaces the current minimum only if it scores strictly
//! higher. A key set enforces one entry per identity across pages.
//! Arbitrary-key operations (threshold purge, extraction marking) rebuild
//! the heap; N is small and capacity-bounded, so the O(N) rebuild is the
//! simpler trade against an indexed heap.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scoring::QualityAssessment;
use crate::source::CandidateRecord;

#[derive(Debug, Error)]
pub enum HeapError {
    #[error("Invalid removal threshold {0}, must be non-negative")]
    InvalidThreshold(f64),
}

/// Outcome of an admission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddOutcome {
    /// Admitted into free capacity.
    Inserted,
    /// Admitted by displacing the current minimum.
    ReplacedMin,
    /// Identity key already retained; contents unchanged.
    Duplicate,
    /// Heap full and score not above the minimum; contents unchanged.
    BelowMin,
}

/// One retained candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeapEntry {
    pub score: f64,
    pub identity_key: String,
    pub record: CandidateRecord,
    /// Full assessment, present once evaluation has scored this entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessment: Option<QualityAssessment>,
    /// Whether this entry has already been pulled for profile extraction.
    #[serde(default)]
    pub extracted: bool,
}

impl HeapEntry {
    pub fn new(record: CandidateRecord, score: f64) -> Self {
        Self {
            score,
            identity_key: record.identity_key.clone(),
            record,
            assessment: None,
            extracted: false,
        }
    }
}

/// Aggregate over the retained scores.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct HeapStats {
    pub count: usize,
    pub average_score: f64,
    pub min_score: f64,
    pub max_score: f64,
}

// Orders entries by score with a stable key tiebreak, so heap behavior
// is deterministic for equal scores.
#[derive(Debug, Clone)]
struct Ranked(HeapEntry);

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .score
            .total_cmp(&other.0.score)
            .then_with(|| self.0.identity_key.cmp(&other.0.identity_key))
    }
}

/// Fixed-capacity best-candidates store.
pub struct CandidateHeap {
    capacity: usize,
    entries: BinaryHeap<Reverse<Ranked>>,
    keys: HashSet<String>,
}

impl CandidateHeap {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: BinaryHeap::with_capacity(capacity.max(1)),
            keys: HashSet::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn contains(&self, identity_key: &str) -> bool {
        self.keys.contains(identity_key)
    }

    /// Attempt to admit a candidate.
    pub fn add(&mut self, entry: HeapEntry) -> AddOutcome {
        if self.keys.contains(&entry.identity_key) {
            return AddOutcome::Duplicate;
        }

        if self.entries.len() < self.capacity {
            self.keys.insert(entry.identity_key.clone());
            self.entries.push(Reverse(Ranked(entry)));
            return AddOutcome::Inserted;
        }

        // Full: displace the minimum only on a strictly higher score
        let min_score = match self.entries.peek() {
            Some(Reverse(Ranked(min))) => min.score,
            None => return AddOutcome::BelowMin,
        };
        if entry.score <= min_score {
            return AddOutcome::BelowMin;
        }

        if let Some(Reverse(Ranked(evicted))) = self.entries.pop() {
            self.keys.remove(&evicted.identity_key);
        }
        self.keys.insert(entry.identity_key.clone());
        self.entries.push(Reverse(Ranked(entry)));
        AddOutcome::ReplacedMin
    }

    /// Drop every entry scoring strictly below `threshold`.
    ///
    /// Boundary scores are kept. Removed identity keys leave the dedup
    /// set, so the same candidate can be admitted again later.
    pub fn remove_low_quality(&mut self, threshold: f64) -> Result<usize, HeapError> {
        if threshold < 0.0 {
            return Err(HeapError::InvalidThreshold(threshold));
        }

        let before = self.entries.len();
        self.rebuild_retaining(|entry| entry.score >= threshold);
        Ok(before - self.entries.len())
    }

    /// The top `k` entries by score, highest first.
    pub fn peek_top(&self, k: usize) -> Vec<HeapEntry> {
        let mut sorted = self.sorted_descending();
        sorted.truncate(k);
        sorted
    }

    /// A descending-rank window of not-yet-extracted entries.
    pub fn backups(&self, offset: usize, limit: usize) -> Vec<HeapEntry> {
        self.sorted_descending()
            .into_iter()
            .filter(|entry| !entry.extracted)
            .skip(offset)
            .take(limit)
            .collect()
    }

    /// Flag an entry as pulled for extraction. Idempotent; returns
    /// whether the key is present at all.
    pub fn mark_extracted(&mut self, identity_key: &str) -> bool {
        if !self.keys.contains(identity_key) {
            return false;
        }
        let mut drained: Vec<HeapEntry> = self
            .entries
            .drain()
            .map(|Reverse(Ranked(entry))| entry)
            .collect();
        for entry in &mut drained {
            if entry.identity_key == identity_key {
                entry.extracted = true;
            }
        }
        for entry in drained {
            self.entries.push(Reverse(Ranked(entry)));
        }
        true
    }

    /// Attach a full assessment to a retained entry.
    pub fn attach_assessment(&mut self, identity_key: &str, assessment: QualityAssessment) -> bool {
        if !self.keys.contains(identity_key) {
            return false;
        }
        let mut drained: Vec<HeapEntry> = self
            .entries
            .drain()
            .map(|Reverse(Ranked(entry))| entry)
            .collect();
        for entry in &mut drained {
            if entry.identity_key == identity_key {
                entry.assessment = Some(assessment.clone());
            }
        }
        for entry in drained {
            self.entries.push(Reverse(Ranked(entry)));
        }
        true
    }

    /// Number of retained entries not yet pulled for extraction.
    pub fn unextracted_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|Reverse(Ranked(entry))| !entry.extracted)
            .count()
    }

    pub fn capacity_utilization_pct(&self) -> f64 {
        self.entries.len() as f64 / self.capacity as f64 * 100.0
    }

    pub fn stats(&self) -> HeapStats {
        if self.entries.is_empty() {
            return HeapStats::default();
        }
        let scores: Vec<f64> = self
            .entries
            .iter()
            .map(|Reverse(Ranked(entry))| entry.score)
            .collect();
        let sum: f64 = scores.iter().sum();
        HeapStats {
            count: scores.len(),
            average_score: sum / scores.len() as f64,
            min_score: scores.iter().copied().fold(f64::INFINITY, f64::min),
            max_score: scores.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }

    fn sorted_descending(&self) -> Vec<HeapEntry> {
        let mut entries: Vec<HeapEntry> = self
            .entries
            .iter()
            .map(|Reverse(Ranked(entry))| entry.clone())
            .collect();
        entries.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.identity_key.cmp(&b.identity_key)));
        entries
    }

    fn rebuild_retaining<F: Fn(&HeapEntry) -> bool>(&mut self, keep: F) {
        let drained: Vec<HeapEntry> = self
            .entries
            .drain()
            .map(|Reverse(Ranked(entry))| entry)
            .collect();
        self.keys.clear();
        for entry in drained {
            if keep(&entry) {
                self.keys.insert(entry.identity_key.clone());
                self.entries.push(Reverse(Ranked(entry)));
            }
        }
    }
}
