//! Candidate quality scoring.
//!
//! Deterministic, reproducible scoring of candidates under an optional
//! strategy context. Two modes: lightweight (headline-only, used for heap
//! admission at search time) and full (four component scores over the
//! extracted profile, used at evaluation time). Both are pure functions of
//! their inputs - no I/O, no randomness.

mod bonuses;
mod scorer;
mod types;
mod weights;

pub use bonuses::calculate_bonuses;
pub use scorer::QualityScorer;
pub use types::*;
pub use weights::{ScoreWeights, DEFAULT_WEIGHTS};
