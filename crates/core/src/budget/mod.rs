//! Search budget control: when to keep paging, expand, or stop.

mod controller;

pub use controller::{BudgetConfig, PageDecision, SearchBudgetController, StopReason};
