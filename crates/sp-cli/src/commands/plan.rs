//! Plan generation and display.
//!
//! `sp plan generate` builds a plan from the given subjects and replaces the
//! user's stored plan. `sp plan show` reloads it; stored plans carry no review
//! intervals, so those are recomputed only when a deadline is passed.

use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::Args;
use sp_core::{Energy, Plan, PlanRequest, SubjectInput, generate_plan, refresh_schedules};

use super::util::{format_hours, join_days, parse_subject, rng_from_seed, truncate};
use crate::context::SessionContext;

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Subject as NAME:PRIORITY:DIFFICULTY (repeatable), e.g. Physics:high:hard.
    #[arg(long = "subject", required = true, value_parser = parse_subject)]
    pub subjects: Vec<SubjectInput>,

    /// Motivation from 1 to 10.
    #[arg(long, default_value_t = 7)]
    pub motivation: u8,

    /// Energy level: low, medium or high.
    #[arg(long, default_value = "medium")]
    pub energy: Energy,

    /// Hours available per day.
    #[arg(long)]
    pub hours: f64,

    /// Goal date (YYYY-MM-DD), must be after today.
    #[arg(long)]
    pub deadline: NaiveDate,

    /// Seed for reproducible study days.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Generates a plan, stores it as the user's plan and prints it.
pub fn generate<W: Write>(
    writer: &mut W,
    ctx: &mut SessionContext,
    args: &GenerateArgs,
) -> Result<()> {
    let request = PlanRequest {
        subjects: args.subjects.clone(),
        motivation: args.motivation,
        energy: args.energy,
        daily_hours: args.hours,
        deadline: args.deadline,
    };

    let mut rng = rng_from_seed(args.seed);
    let plan = generate_plan(&request, ctx.today, &mut rng).context("failed to generate plan")?;
    ctx.db
        .save_plan(ctx.user.id, &plan)
        .context("failed to save plan")?;

    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&plan)?)?;
        return Ok(());
    }

    write_plan(writer, &plan)?;
    let total = plan.total_hours();
    writeln!(
        writer,
        "Total: {}h/day (budget {}h/day)",
        format_hours(total),
        format_hours(args.hours)
    )?;
    if total > args.hours + f64::EPSILON * 8.0 {
        writeln!(writer, "Note: the planned total exceeds the daily budget.")?;
    }
    Ok(())
}

/// Prints the stored plan, recomputing review days up to `deadline` if given.
pub fn show<W: Write>(
    writer: &mut W,
    ctx: &SessionContext,
    deadline: Option<NaiveDate>,
    json: bool,
) -> Result<()> {
    let mut plan = ctx
        .db
        .load_plan(ctx.user.id)
        .context("failed to load plan")?;

    if let (Some(plan), Some(deadline)) = (plan.as_mut(), deadline) {
        if deadline <= ctx.today {
            bail!("deadline {deadline} must be after today ({})", ctx.today);
        }
        refresh_schedules(plan, deadline, ctx.today);
    }

    if json {
        let plan = plan.unwrap_or_default();
        writeln!(writer, "{}", serde_json::to_string_pretty(&plan)?)?;
        return Ok(());
    }

    match plan {
        Some(plan) => {
            write_plan(writer, &plan)?;
            writeln!(writer, "Total: {}h/day", format_hours(plan.total_hours()))?;
        }
        None => {
            writeln!(writer, "No plan yet.")?;
            writeln!(writer)?;
            writeln!(writer, "Hint: Run 'sp plan generate' to create one.")?;
        }
    }
    Ok(())
}

/// Writes the plan as a table, one row per subject in plan order.
pub fn write_plan<W: Write>(writer: &mut W, plan: &Plan) -> Result<()> {
    writeln!(
        writer,
        "{:<20}  {:<8}  {:<10}  {:>9}  {:<23}  Review Days",
        "Subject", "Priority", "Difficulty", "Hours/Day", "Study Days"
    )?;
    writeln!(
        writer,
        "────────────────────  ────────  ──────────  ─────────  ───────────────────────  ───────────"
    )?;

    for entry in &plan.entries {
        let reviews = if entry.repetition_schedule.is_empty() {
            "-".to_string()
        } else {
            entry
                .repetition_schedule
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        writeln!(
            writer,
            "{:<20}  {:<8}  {:<10}  {:>9}  {:<23}  {}",
            truncate(&entry.subject, 20),
            entry.priority,
            entry.difficulty,
            format_hours(entry.hours),
            join_days(&entry.study_days),
            reviews
        )?;
    }
    writeln!(writer)?;
    Ok(())
}
