//! Errors produced while building a study plan.

use chrono::NaiveDate;
use thiserror::Error;

/// Planning errors.
///
/// Every variant is returned synchronously by the call that detects it;
/// nothing in the core retries.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlanError {
    /// A priority, difficulty or energy literal outside its enumerated set.
    #[error("invalid {kind}: {value:?} (expected one of {expected})")]
    InvalidEnum {
        kind: &'static str,
        value: String,
        expected: &'static str,
    },

    /// A subject with a blank name.
    #[error("subject name cannot be empty")]
    EmptySubject,

    /// The planning request had no subjects.
    #[error("no subjects provided")]
    NoSubjects,

    /// The deadline is today or in the past.
    #[error("deadline {deadline} must be after {today}")]
    InvalidDeadline { deadline: NaiveDate, today: NaiveDate },

    /// Motivation outside 1..=10.
    #[error("motivation must be between 1 and 10, got {0}")]
    InvalidMotivation(u8),

    /// Daily hours that cannot hold the minimum per-subject allocation.
    #[error("daily hours must be at least 0.5, got {0}")]
    InvalidDailyHours(f64),

    /// The subject weights summed to zero or less.
    #[error("invalid subject weights (total {0})")]
    DegenerateWeights(f64),
}
