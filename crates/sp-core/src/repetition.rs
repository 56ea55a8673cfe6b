//! Spaced-repetition review intervals.
//!
//! Intervals are day offsets from today. Short horizons (a week or less) use
//! a fixed ladder. Longer horizons scale a base ladder by difficulty, and if
//! the scaled ladder overshoots the deadline the whole ladder is rescaled to
//! quarters of the remaining days.

use chrono::NaiveDate;

use crate::{Difficulty, Plan};

/// Ladder used when the deadline is at most a week away.
const SHORT_HORIZON_INTERVALS: [u32; 4] = [1, 3, 5, 7];

/// Horizons up to this many days use [`SHORT_HORIZON_INTERVALS`].
const SHORT_HORIZON_DAYS: i64 = 7;

/// Base review offsets and the minimum each scaled offset may take.
const BASE_LADDER: [(f64, u32); 4] = [(1.0, 1), (3.0, 2), (7.0, 4), (14.0, 8)];

const fn difficulty_factor(difficulty: Difficulty) -> f64 {
    match difficulty {
        Difficulty::Easy => 0.8,
        Difficulty::Medium => 1.0,
        Difficulty::Hard => 1.2,
    }
}

/// Review offsets for a subject whose deadline is `days_remaining` days away.
///
/// Callers guarantee `days_remaining > 0`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "scaled offsets are small non-negative values floored before the cast"
)]
pub fn intervals(difficulty: Difficulty, days_remaining: i64) -> Vec<u32> {
    if days_remaining <= SHORT_HORIZON_DAYS {
        return SHORT_HORIZON_INTERVALS.to_vec();
    }

    let factor = difficulty_factor(difficulty);
    let candidates: Vec<u32> = BASE_LADDER
        .iter()
        .map(|&(base, floor)| ((base * factor).floor() as u32).max(floor))
        .collect();

    let last = candidates.last().copied().map_or(0, i64::from);
    if last <= days_remaining {
        return candidates;
    }

    tracing::debug!(
        ?difficulty,
        days_remaining,
        ?candidates,
        "review ladder overshoots deadline, rescaling"
    );
    (1..=4)
        .map(|quarter| {
            let offset = days_remaining * quarter / 4;
            u32::try_from(offset).unwrap_or(u32::MAX).max(1)
        })
        .collect()
}

/// Review offsets computed from a deadline and the caller's notion of today.
pub fn intervals_until(difficulty: Difficulty, deadline: NaiveDate, today: NaiveDate) -> Vec<u32> {
    intervals(difficulty, (deadline - today).num_days())
}

/// Recomputes the review schedule of every entry, e.g. after a reload.
pub fn refresh_schedules(plan: &mut Plan, deadline: NaiveDate, today: NaiveDate) {
    for entry in &mut plan.entries {
        entry.repetition_schedule = intervals_until(entry.difficulty, deadline, today);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PlanEntry, Priority};

    #[test]
    fn short_horizon_ignores_difficulty() {
        for difficulty in Difficulty::ALL {
            assert_eq!(intervals(*difficulty, 5), vec![1, 3, 5, 7]);
            assert_eq!(intervals(*difficulty, 7), vec![1, 3, 5, 7]);
        }
    }

    #[test]
    fn medium_over_a_month_uses_base_ladder() {
        assert_eq!(intervals(Difficulty::Medium, 30), vec![1, 3, 7, 14]);
    }

    #[test]
    fn easy_ladder_respects_minimums() {
        // 0.8, 2.4, 5.6, 11.2 floored, then raised to 1, 2, 4, 8 minimums.
        assert_eq!(intervals(Difficulty::Easy, 30), vec![1, 2, 5, 11]);
    }

    #[test]
    fn hard_ladder_fits_long_horizon() {
        assert_eq!(intervals(Difficulty::Hard, 30), vec![1, 3, 8, 16]);
        assert_eq!(intervals(Difficulty::Hard, 16), vec![1, 3, 8, 16]);
    }

    #[test]
    fn overshooting_ladder_is_rescaled_to_quarters() {
        // Raw hard ladder is [1, 3, 8, 16]; 16 > 10.
        assert_eq!(intervals(Difficulty::Hard, 10), vec![2, 5, 7, 10]);
        // Medium ladder ends at 14 > 8.
        assert_eq!(intervals(Difficulty::Medium, 8), vec![2, 4, 6, 8]);
        // Easy ladder ends at 11 > 9.
        assert_eq!(intervals(Difficulty::Easy, 9), vec![2, 4, 6, 9]);
    }

    #[test]
    fn intervals_until_uses_calendar_days() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let deadline = NaiveDate::from_ymd_opt(2025, 3, 11).unwrap();
        assert_eq!(
            intervals_until(Difficulty::Hard, deadline, today),
            vec![2, 5, 7, 10]
        );
    }

    #[test]
    fn refresh_schedules_fills_every_entry() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let deadline = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        let entry = |difficulty| PlanEntry {
            subject: "Biology".to_string(),
            hours: 1.0,
            priority: Priority::Low,
            difficulty,
            study_days: Vec::new(),
            repetition_schedule: Vec::new(),
        };
        let mut plan = Plan {
            entries: vec![entry(Difficulty::Medium), entry(Difficulty::Easy)],
        };

        refresh_schedules(&mut plan, deadline, today);

        assert_eq!(plan.entries[0].repetition_schedule, vec![1, 3, 7, 14]);
        assert_eq!(plan.entries[1].repetition_schedule, vec![1, 2, 5, 11]);
    }
}
