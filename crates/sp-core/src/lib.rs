//! Core domain logic for the study planner.
//!
//! This crate contains the fundamental types and logic for:
//! - Weighting: combining priority and difficulty into a subject weight
//! - Allocation: splitting a daily study budget into a plan
//! - Spaced repetition: review intervals up to a deadline
//! - Resources: recommending learning material per subject
//!
//! Nothing here performs I/O. Randomness is always injected by the caller.

mod allocation;
mod error;
pub mod repetition;
pub mod resources;
pub mod types;
pub mod weight;

pub use allocation::{MIN_SUBJECT_HOURS, generate_plan};
pub use error::PlanError;
pub use repetition::{intervals, intervals_until, refresh_schedules};
pub use resources::{Recommendation, recommend_resources};
pub use types::{Difficulty, Energy, Plan, PlanEntry, PlanRequest, Priority, SubjectInput, WEEKDAYS};
pub use weight::weight;
