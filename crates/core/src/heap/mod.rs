//! Capacity-bounded retention of the best-scored candidates.

mod heap;

pub use heap::{AddOutcome, CandidateHeap, HeapEntry, HeapError, HeapStats};
