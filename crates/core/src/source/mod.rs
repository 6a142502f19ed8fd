//! Candidate source abstraction.
//!
//! This module provides a `CandidateSource` trait for the external
//! collaborator that performs page navigation and profile extraction.
//! The core never does network or DOM work itself; it consumes finite,
//! one-page-at-a-time sequences of raw candidates through this seam.

mod types;

pub use types::*;
