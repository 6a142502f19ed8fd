//! The sourcing workflow: search, evaluate, remediate.

mod runner;
mod types;

pub use runner::WorkflowRunner;
pub use types::{
    EvaluatedCandidate, EvaluationResult, ScoreDistribution, SummaryStats, WorkflowError,
    WorkflowRequest,
};
