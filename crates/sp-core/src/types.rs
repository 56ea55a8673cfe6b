//! Core type definitions with validation.

use std::fmt;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::PlanError;

/// The seven weekdays in calendar order, Monday first.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Generates a three-level enum that round-trips through its lowercase literal.
macro_rules! define_level_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal, $expected:literal { $($variant:ident => $literal:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            /// All variants in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            /// String representation for display and storage.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $literal,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = PlanError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($literal => Ok(Self::$variant),)+
                    _ => Err(PlanError::InvalidEnum {
                        kind: $kind,
                        value: s.to_string(),
                        expected: $expected,
                    }),
                }
            }
        }
    };
}

define_level_enum!(
    /// How important a subject is to the user.
    Priority, "priority", "low, medium, high" {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
);

define_level_enum!(
    /// How hard a subject is for the user.
    Difficulty, "difficulty", "easy, medium, hard" {
        Easy => "easy",
        Medium => "medium",
        Hard => "hard",
    }
);

define_level_enum!(
    /// Self-reported energy level for the day.
    Energy, "energy", "low, medium, high" {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
);

impl Priority {
    /// Sort rank used when ordering a plan: high first.
    #[must_use]
    pub const fn rank(&self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }
}

/// A subject as entered by the user for one planning request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectInput {
    pub name: String,
    pub priority: Priority,
    pub difficulty: Difficulty,
}

impl SubjectInput {
    /// Creates a subject, trimming the name and rejecting blank names.
    pub fn new(
        name: impl Into<String>,
        priority: Priority,
        difficulty: Difficulty,
    ) -> Result<Self, PlanError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(PlanError::EmptySubject);
        }
        Ok(Self {
            name,
            priority,
            difficulty,
        })
    }
}

/// Inputs of a single planning request.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRequest {
    pub subjects: Vec<SubjectInput>,
    /// Self-reported motivation, 1 to 10.
    pub motivation: u8,
    pub energy: Energy,
    /// Nominal study budget per day, in hours.
    pub daily_hours: f64,
    pub deadline: NaiveDate,
}

/// One subject's allocation within a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub subject: String,
    /// Daily hours, rounded to one decimal place.
    pub hours: f64,
    pub priority: Priority,
    pub difficulty: Difficulty,
    /// Distinct weekdays in calendar order.
    pub study_days: Vec<Weekday>,
    /// Review offsets in days from today. Empty for reloaded plans.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub repetition_schedule: Vec<u32>,
}

impl PlanEntry {
    /// Study days joined with commas, as persisted (e.g. `Mon,Wed,Fri`).
    pub fn study_days_joined(&self) -> String {
        self.study_days
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// A user's full set of per-subject allocations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub entries: Vec<PlanEntry>,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Sum of all daily hours, which may exceed the requested budget.
    pub fn total_hours(&self) -> f64 {
        self.entries.iter().map(|entry| entry.hours).sum()
    }
}
