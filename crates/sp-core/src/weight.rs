//! Subject weighting.
//!
//! A subject's weight is the product of a priority multiplier and a
//! difficulty multiplier. Both tables are strictly positive, so every weight
//! is strictly positive.

use crate::{Difficulty, Priority};

/// Multiplier contributed by priority.
pub const fn priority_weight(priority: Priority) -> f64 {
    match priority {
        Priority::Low => 1.0,
        Priority::Medium => 2.0,
        Priority::High => 3.0,
    }
}

/// Multiplier contributed by difficulty.
pub const fn difficulty_weight(difficulty: Difficulty) -> f64 {
    match difficulty {
        Difficulty::Easy => 0.8,
        Difficulty::Medium => 1.2,
        Difficulty::Hard => 1.5,
    }
}

/// Weight used to split the daily budget between subjects.
pub fn weight(priority: Priority, difficulty: Difficulty) -> f64 {
    priority_weight(priority) * difficulty_weight(difficulty)
}
