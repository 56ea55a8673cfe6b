//! Daily study-hours allocation.
//!
//! Splits a daily budget across subjects in proportion to their weight,
//! scaled by the user's energy and motivation.
//!
//! # Algorithm Summary
//!
//! 1. Weight every subject (`priority × difficulty`, see [`crate::weight`])
//! 2. `hours = share × daily_hours × energy_factor × motivation / 7`
//! 3. Clamp each entry to `[0.5, daily_hours]` and round to one decimal
//! 4. Pick 2-5 study days per subject and attach review intervals
//! 5. Order entries by priority rank, then by difficulty literal
//!
//! The clamp is per entry. Totals are not renormalized, so a plan can ask for
//! more than `daily_hours` in aggregate when motivation or energy is high.

use chrono::{NaiveDate, Weekday};
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::repetition::intervals;
use crate::weight::weight;
use crate::{Energy, Plan, PlanEntry, PlanError, PlanRequest, WEEKDAYS};

/// Smallest allocation any subject receives, in hours.
pub const MIN_SUBJECT_HOURS: f64 = 0.5;

/// Motivation at which the motivation factor is exactly 1.
const NEUTRAL_MOTIVATION: f64 = 7.0;

const MIN_STUDY_DAYS: usize = 2;
const MAX_STUDY_DAYS: usize = 5;

const fn energy_factor(energy: Energy) -> f64 {
    match energy {
        Energy::Low => 0.7,
        Energy::Medium => 1.0,
        Energy::High => 1.3,
    }
}

/// Rounds to one decimal place, halves away from zero.
fn round_tenths(hours: f64) -> f64 {
    (hours * 10.0).round() / 10.0
}

/// Number of weekly study days for a daily allocation.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "hours are positive and bounded by the daily budget"
)]
fn study_days_count(hours: f64) -> usize {
    ((hours * 3.0).round() as usize).clamp(MIN_STUDY_DAYS, MAX_STUDY_DAYS)
}

/// Samples `count` distinct weekdays and returns them in calendar order.
fn sample_study_days<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<Weekday> {
    let mut days: Vec<Weekday> = WEEKDAYS.choose_multiple(rng, count).copied().collect();
    days.sort_by_key(Weekday::num_days_from_monday);
    days
}

fn validate(request: &PlanRequest, today: NaiveDate) -> Result<(), PlanError> {
    if request.subjects.is_empty() {
        return Err(PlanError::NoSubjects);
    }
    if request.deadline <= today {
        return Err(PlanError::InvalidDeadline {
            deadline: request.deadline,
            today,
        });
    }
    if !(1..=10).contains(&request.motivation) {
        return Err(PlanError::InvalidMotivation(request.motivation));
    }
    if !request.daily_hours.is_finite() || request.daily_hours < MIN_SUBJECT_HOURS {
        return Err(PlanError::InvalidDailyHours(request.daily_hours));
    }
    Ok(())
}

/// Generates a study plan for `request` as of `today`.
///
/// Study days are drawn from `rng`; pass a seeded generator for
/// reproducible plans.
pub fn generate_plan<R: Rng + ?Sized>(
    request: &PlanRequest,
    today: NaiveDate,
    rng: &mut R,
) -> Result<Plan, PlanError> {
    validate(request, today)?;

    let weights: Vec<f64> = request
        .subjects
        .iter()
        .map(|subject| weight(subject.priority, subject.difficulty))
        .collect();
    let total_weight: f64 = weights.iter().sum();
    if total_weight <= 0.0 {
        return Err(PlanError::DegenerateWeights(total_weight));
    }

    let days_remaining = (request.deadline - today).num_days();
    let scale = request.daily_hours
        * energy_factor(request.energy)
        * (f64::from(request.motivation) / NEUTRAL_MOTIVATION);

    let mut entries: Vec<PlanEntry> = request
        .subjects
        .iter()
        .zip(&weights)
        .map(|(subject, subject_weight)| {
            let raw_hours = subject_weight / total_weight * scale;
            // Rounding can overshoot a budget that is not a whole number of tenths.
            let hours = round_tenths(raw_hours.min(request.daily_hours).max(MIN_SUBJECT_HOURS))
                .min(request.daily_hours);
            let study_days = sample_study_days(rng, study_days_count(hours));

            tracing::debug!(
                subject = %subject.name,
                weight = subject_weight,
                raw_hours,
                hours,
                "allocated subject"
            );

            PlanEntry {
                subject: subject.name.clone(),
                hours,
                priority: subject.priority,
                difficulty: subject.difficulty,
                study_days,
                repetition_schedule: intervals(subject.difficulty, days_remaining),
            }
        })
        .collect();

    // Stable: equal keys keep input order.
    entries.sort_by_key(|entry| (entry.priority.rank(), entry.difficulty.as_str()));

    let plan = Plan { entries };
    tracing::info!(
        subjects = plan.len(),
        total_hours = plan.total_hours(),
        days_remaining,
        "generated study plan"
    );
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Difficulty, Priority, SubjectInput};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    fn subject(name: &str, priority: Priority, difficulty: Difficulty) -> SubjectInput {
        SubjectInput::new(name, priority, difficulty).unwrap()
    }

    fn request(subjects: Vec<SubjectInput>) -> PlanRequest {
        PlanRequest {
            subjects,
            motivation: 7,
            energy: Energy::Medium,
            daily_hours: 4.0,
            deadline: today() + chrono::Duration::days(30),
        }
    }

    fn generate(request: &PlanRequest) -> Result<Plan, PlanError> {
        let mut rng = StdRng::seed_from_u64(7);
        generate_plan(request, today(), &mut rng)
    }

    #[test]
    fn single_subject_gets_full_budget_at_neutral_state() {
        for priority in Priority::ALL {
            for difficulty in Difficulty::ALL {
                let plan = generate(&request(vec![subject("Math", *priority, *difficulty)])).unwrap();
                assert_eq!(plan.len(), 1);
                assert!((plan.entries[0].hours - 4.0).abs() < f64::EPSILON);
            }
        }
    }

    #[test]
    fn budget_off_the_tenths_grid_is_never_exceeded() {
        for daily_hours in [2.25, 0.55, 1.75] {
            let mut req = request(vec![subject("Math", Priority::High, Difficulty::Hard)]);
            req.daily_hours = daily_hours;

            let plan = generate(&req).unwrap();
            assert!(
                (plan.entries[0].hours - daily_hours).abs() < f64::EPSILON,
                "budget={daily_hours} hours={}",
                plan.entries[0].hours
            );
        }
    }

    #[test]
    fn hours_split_proportionally_to_weight() {
        let plan = generate(&request(vec![
            subject("History", Priority::Low, Difficulty::Easy),
            subject("Physics", Priority::High, Difficulty::Hard),
        ]))
        .unwrap();

        // Weights 4.5 and 0.8 of 5.3: 3.396.. and 0.603..
        assert_eq!(plan.entries[0].subject, "Physics");
        assert!((plan.entries[0].hours - 3.4).abs() < 1e-9);
        assert_eq!(plan.entries[0].study_days.len(), 5);
        assert_eq!(plan.entries[1].subject, "History");
        assert!((plan.entries[1].hours - 0.6).abs() < 1e-9);
        assert_eq!(plan.entries[1].study_days.len(), 2);
    }

    #[test]
    fn high_motivation_is_clamped_to_daily_budget() {
        let mut req = request(vec![subject("Math", Priority::High, Difficulty::Hard)]);
        req.motivation = 10;
        req.energy = Energy::High;

        let plan = generate(&req).unwrap();
        assert!((plan.entries[0].hours - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn low_state_is_raised_to_minimum() {
        let mut req = request(
            (0..5)
                .map(|i| subject(&format!("Subject {i}"), Priority::Medium, Difficulty::Medium))
                .collect(),
        );
        req.motivation = 1;
        req.energy = Energy::Low;
        req.daily_hours = 1.0;

        let plan = generate(&req).unwrap();
        for entry in &plan.entries {
            assert!((entry.hours - MIN_SUBJECT_HOURS).abs() < f64::EPSILON);
            assert_eq!(entry.study_days.len(), 2);
        }
    }

    #[test]
    fn totals_may_exceed_daily_budget() {
        let mut req = request(vec![
            subject("Math", Priority::High, Difficulty::Hard),
            subject("Physics", Priority::High, Difficulty::Hard),
        ]);
        req.motivation = 10;
        req.energy = Energy::High;

        // Each: 0.5 × 4 × 1.3 × 10/7 = 3.714..
        let plan = generate(&req).unwrap();
        for entry in &plan.entries {
            assert!((entry.hours - 3.7).abs() < 1e-9);
        }
        assert!(plan.total_hours() > req.daily_hours);
    }

    #[test]
    fn entries_sorted_by_priority_then_difficulty_literal() {
        let plan = generate(&request(vec![
            subject("a", Priority::Low, Difficulty::Medium),
            subject("b", Priority::High, Difficulty::Medium),
            subject("c", Priority::Medium, Difficulty::Hard),
            subject("d", Priority::High, Difficulty::Easy),
            subject("e", Priority::High, Difficulty::Hard),
            subject("f", Priority::Low, Difficulty::Medium),
        ]))
        .unwrap();

        let order: Vec<&str> = plan.entries.iter().map(|e| e.subject.as_str()).collect();
        // "easy" < "hard" < "medium"; ties keep input order.
        assert_eq!(order, vec!["d", "e", "b", "c", "a", "f"]);
    }

    #[test]
    fn bounds_hold_across_random_batches() {
        let mut batch_rng = StdRng::seed_from_u64(99);
        let energies = [Energy::Low, Energy::Medium, Energy::High];

        for round in 0..200 {
            let count = batch_rng.random_range(1..=8);
            let subjects = (0..count)
                .map(|i| {
                    subject(
                        &format!("s{i}"),
                        *Priority::ALL.choose(&mut batch_rng).unwrap(),
                        *Difficulty::ALL.choose(&mut batch_rng).unwrap(),
                    )
                })
                .collect();
            let req = PlanRequest {
                subjects,
                motivation: batch_rng.random_range(1..=10),
                energy: *energies.choose(&mut batch_rng).unwrap(),
                daily_hours: f64::from(batch_rng.random_range(2..=48_u32)) / 4.0,
                deadline: today() + chrono::Duration::days(batch_rng.random_range(1..=90)),
            };

            let mut rng = StdRng::seed_from_u64(round);
            let plan = generate_plan(&req, today(), &mut rng).unwrap();
            assert_eq!(plan.len(), count);

            for entry in &plan.entries {
                assert!(entry.hours >= MIN_SUBJECT_HOURS, "{entry:?}");
                assert!(entry.hours <= req.daily_hours, "{entry:?}");
                assert!((MIN_STUDY_DAYS..=MAX_STUDY_DAYS).contains(&entry.study_days.len()));
                let unique: HashSet<_> = entry.study_days.iter().collect();
                assert_eq!(unique.len(), entry.study_days.len());
                assert_eq!(entry.repetition_schedule.len(), 4);
                assert!(entry.repetition_schedule.iter().all(|&d| d > 0));
            }
        }
    }

    #[test]
    fn study_days_are_in_calendar_order() {
        let plan = generate(&request(vec![subject("Math", Priority::High, Difficulty::Hard)])).unwrap();
        let days = &plan.entries[0].study_days;
        assert!(
            days.windows(2)
                .all(|pair| pair[0].num_days_from_monday() < pair[1].num_days_from_monday())
        );
    }

    #[test]
    fn same_seed_gives_same_plan() {
        let req = request(vec![
            subject("Math", Priority::High, Difficulty::Hard),
            subject("Art", Priority::Low, Difficulty::Easy),
            subject("Chemistry", Priority::Medium, Difficulty::Medium),
        ]);

        let first = generate_plan(&req, today(), &mut StdRng::seed_from_u64(42)).unwrap();
        let second = generate_plan(&req, today(), &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn entries_carry_review_intervals() {
        let mut req = request(vec![subject("Math", Priority::High, Difficulty::Hard)]);
        req.deadline = today() + chrono::Duration::days(10);

        let plan = generate(&req).unwrap();
        assert_eq!(plan.entries[0].repetition_schedule, vec![2, 5, 7, 10]);
    }

    #[test]
    fn empty_subjects_rejected() {
        assert_eq!(generate(&request(Vec::new())), Err(PlanError::NoSubjects));
    }

    #[test]
    fn deadline_must_be_in_the_future() {
        let mut req = request(vec![subject("Math", Priority::High, Difficulty::Hard)]);
        req.deadline = today();
        assert_eq!(
            generate(&req),
            Err(PlanError::InvalidDeadline {
                deadline: today(),
                today: today(),
            })
        );

        req.deadline = today() - chrono::Duration::days(3);
        assert!(matches!(
            generate(&req),
            Err(PlanError::InvalidDeadline { .. })
        ));
    }

    #[test]
    fn motivation_and_budget_are_validated() {
        let mut req = request(vec![subject("Math", Priority::High, Difficulty::Hard)]);
        req.motivation = 0;
        assert_eq!(generate(&req), Err(PlanError::InvalidMotivation(0)));

        req.motivation = 11;
        assert_eq!(generate(&req), Err(PlanError::InvalidMotivation(11)));

        req.motivation = 7;
        req.daily_hours = 0.25;
        assert_eq!(generate(&req), Err(PlanError::InvalidDailyHours(0.25)));

        req.daily_hours = f64::NAN;
        assert!(matches!(generate(&req), Err(PlanError::InvalidDailyHours(_))));
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert!((round_tenths(0.25) - 0.3).abs() < 1e-9);
        assert!((round_tenths(1.04) - 1.0).abs() < 1e-9);
        assert!((round_tenths(2.95) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn study_days_count_is_bounded() {
        assert_eq!(study_days_count(0.5), 2);
        assert_eq!(study_days_count(1.0), 3);
        assert_eq!(study_days_count(1.2), 4);
        assert_eq!(study_days_count(8.0), 5);
    }
}
