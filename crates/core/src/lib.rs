pub mod budget;
pub mod config;
pub mod fallback;
pub mod heap;
pub mod scoring;
pub mod source;
pub mod testing;
pub mod workflow;

pub use budget::{BudgetConfig, PageDecision, SearchBudgetController, StopReason};
pub use config::{
    load_config, load_config_from_str, validate_config, ConfigError, EngineConfig,
};
pub use fallback::{FallbackConfig, FallbackCoordinator, FallbackRecommendation};
pub use heap::{AddOutcome, CandidateHeap, HeapEntry, HeapError};
pub use scoring::{QualityAssessment, QualityScorer, ScoreWeights, ScoringError, Strategy};
pub use source::{CandidateSource, ExtractionError, FullProfile, RawCandidate, SourceError};
pub use workflow::{EvaluationResult, WorkflowError, WorkflowRequest, WorkflowRunner};
