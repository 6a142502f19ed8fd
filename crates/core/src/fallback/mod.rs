//! Fallback sequencing for insufficient evaluation quality.

mod coordinator;

pub use coordinator::{
    CyclePhase, FallbackConfig, FallbackCoordinator, FallbackRecommendation,
};
