//! Plan exports: a weekly CSV schedule and a plain-text study report.

use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use sp_core::{Plan, WEEKDAYS, refresh_schedules};

use super::focus::{FOCUS_LOG, FocusSession, focus_stats, write_focus_stats};
use super::plan::write_plan;
use super::resources::{recommend_for_plan, write_recommendations};
use super::util::{format_hours, weekday_name};
use crate::context::SessionContext;

/// Quotes a CSV field when it contains a separator, quote or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Writes the weekly schedule: one row per weekday, Monday first.
pub fn write_weekly_csv<W: Write>(writer: &mut W, plan: &Plan) -> Result<()> {
    writeln!(writer, "Day,Subjects")?;
    for day in WEEKDAYS {
        let subjects: Vec<String> = plan
            .entries
            .iter()
            .filter(|entry| entry.study_days.contains(&day))
            .map(|entry| format!("{} ({}h)", entry.subject, format_hours(entry.hours)))
            .collect();
        let cell = if subjects.is_empty() {
            "Rest day".to_string()
        } else {
            subjects.join("; ")
        };
        writeln!(writer, "{},{}", weekday_name(day), csv_field(&cell))?;
    }
    Ok(())
}

pub fn csv<W: Write>(writer: &mut W, ctx: &SessionContext) -> Result<()> {
    let plan = ctx
        .db
        .load_plan(ctx.user.id)
        .context("failed to load plan")?
        .unwrap_or_default();
    write_weekly_csv(writer, &plan)
}

/// Writes the full study report for the stored plan.
pub fn report<W: Write>(
    writer: &mut W,
    ctx: &SessionContext,
    deadline: NaiveDate,
    seed: Option<u64>,
) -> Result<()> {
    if deadline <= ctx.today {
        bail!("deadline {deadline} must be after today ({})", ctx.today);
    }
    let Some(mut plan) = ctx
        .db
        .load_plan(ctx.user.id)
        .context("failed to load plan")?
    else {
        bail!("no plan to report; run 'sp plan generate' first");
    };
    refresh_schedules(&mut plan, deadline, ctx.today);

    writeln!(writer, "STUDY PLAN REPORT")?;
    writeln!(writer)?;
    writeln!(writer, "Student:        {}", ctx.user.username)?;
    writeln!(writer, "Generated on:   {}", ctx.today.format("%B %d, %Y"))?;
    writeln!(writer, "Deadline:       {}", deadline.format("%B %d, %Y"))?;
    writeln!(
        writer,
        "Days remaining: {}",
        (deadline - ctx.today).num_days()
    )?;
    writeln!(writer)?;

    writeln!(writer, "DAILY STUDY PLAN")?;
    writeln!(writer)?;
    write_plan(writer, &plan)?;

    writeln!(writer, "RECOMMENDED RESOURCES")?;
    writeln!(writer)?;
    write_recommendations(writer, &recommend_for_plan(&plan, seed))?;

    let sessions: Vec<FocusSession> = ctx.journal().read_all(FOCUS_LOG)?;
    if let Some(stats) = focus_stats(&sessions) {
        writeln!(writer)?;
        writeln!(writer, "FOCUS ANALYTICS")?;
        writeln!(writer)?;
        write_focus_stats(writer, &stats)?;
    }
    Ok(())
}
