//! Progress recording and history.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use sp_core::Plan;
use sp_db::{Consistency, ProgressRecord, study_consistency};

use super::util::{format_hours, truncate};
use crate::context::SessionContext;

/// Days considered when measuring study consistency.
pub const CONSISTENCY_WINDOW_DAYS: u32 = 30;

#[derive(Debug, Serialize)]
struct JsonHistory<'a> {
    records: &'a [ProgressRecord],
    consistency: Consistency,
    window_days: u32,
}

/// One subject's studied hours on a day, against its planned daily hours.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectProgress {
    pub subject: String,
    /// `None` when the subject is not in the plan.
    pub planned_hours: Option<f64>,
    pub studied_hours: f64,
    /// Share of the planned hours studied, capped at 100.
    pub percent: Option<u8>,
}

#[derive(Debug, Serialize)]
struct JsonDay<'a> {
    date: NaiveDate,
    subjects: &'a [SubjectProgress],
}

/// Percent of `planned` covered by `studied`, truncated and capped at 100.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "the value is clamped to 0..=100 before the cast"
)]
pub fn completion_percent(studied: f64, planned: f64) -> u8 {
    if planned <= 0.0 {
        return 0;
    }
    (studied / planned * 100.0).floor().clamp(0.0, 100.0) as u8
}

/// Compares the hours recorded on `date` with the plan.
///
/// Planned subjects come first, in plan order, even if nothing was studied.
/// Subjects studied without a plan entry follow, sorted by name.
pub fn daily_progress(
    plan: &Plan,
    records: &[ProgressRecord],
    date: NaiveDate,
) -> Vec<SubjectProgress> {
    let studied = |subject: &str| -> f64 {
        records
            .iter()
            .filter(|r| r.date == date && r.subject.to_lowercase() == subject.to_lowercase())
            .map(|r| r.hours_studied)
            .sum()
    };

    let mut rows: Vec<SubjectProgress> = plan
        .entries
        .iter()
        .map(|entry| {
            let studied_hours = studied(&entry.subject);
            SubjectProgress {
                subject: entry.subject.clone(),
                planned_hours: Some(entry.hours),
                studied_hours,
                percent: Some(completion_percent(studied_hours, entry.hours)),
            }
        })
        .collect();

    let mut unplanned: Vec<&str> = records
        .iter()
        .filter(|r| r.date == date)
        .map(|r| r.subject.as_str())
        .filter(|subject| {
            !plan
                .entries
                .iter()
                .any(|e| e.subject.to_lowercase() == subject.to_lowercase())
        })
        .collect();
    unplanned.sort_unstable();
    unplanned.dedup_by(|a, b| a.to_lowercase() == b.to_lowercase());

    rows.extend(unplanned.into_iter().map(|subject| SubjectProgress {
        subject: subject.to_string(),
        planned_hours: None,
        studied_hours: studied(subject),
        percent: None,
    }));
    rows
}

/// Records hours studied for one subject, on `date` or today.
pub fn record<W: Write>(
    writer: &mut W,
    ctx: &mut SessionContext,
    subject: &str,
    hours: f64,
    date: Option<NaiveDate>,
) -> Result<()> {
    let date = date.unwrap_or(ctx.today);
    ctx.db
        .record_progress(ctx.user.id, date, &[(subject.to_string(), hours)])
        .context("failed to record progress")?;
    writeln!(
        writer,
        "Recorded {}h of {} on {date}",
        format_hours(hours),
        subject.trim()
    )?;
    Ok(())
}

/// Consistency over the window ending today.
fn recent_consistency(ctx: &SessionContext) -> Result<Consistency> {
    let window_start = ctx.today - Duration::days(i64::from(CONSISTENCY_WINDOW_DAYS));
    let recent: Vec<ProgressRecord> = ctx
        .db
        .list_progress(ctx.user.id, usize::MAX)
        .context("failed to load progress")?
        .into_iter()
        .filter(|record| record.date > window_start && record.date <= ctx.today)
        .collect();
    Ok(study_consistency(&recent, CONSISTENCY_WINDOW_DAYS))
}

/// Shows the most recent records and how consistently the user studied.
pub fn history<W: Write>(
    writer: &mut W,
    ctx: &SessionContext,
    limit: usize,
    json: bool,
) -> Result<()> {
    let records = ctx
        .db
        .list_progress(ctx.user.id, limit)
        .context("failed to load progress")?;
    let consistency = recent_consistency(ctx)?;

    if json {
        let output = JsonHistory {
            records: &records,
            consistency,
            window_days: CONSISTENCY_WINDOW_DAYS,
        };
        writeln!(writer, "{}", serde_json::to_string_pretty(&output)?)?;
        return Ok(());
    }

    if records.is_empty() {
        writeln!(writer, "No progress recorded yet.")?;
        return Ok(());
    }

    writeln!(writer, "{:<10}  {:<24}  {:>5}", "Date", "Subject", "Hours")?;
    writeln!(writer, "──────────  ────────────────────────  ─────")?;
    for record in &records {
        writeln!(
            writer,
            "{:<10}  {:<24}  {:>5}",
            record.date.to_string(),
            truncate(&record.subject, 24),
            format_hours(record.hours_studied)
        )?;
    }
    writeln!(writer)?;
    writeln!(
        writer,
        "Studied on {} of the last {CONSISTENCY_WINDOW_DAYS} days ({:.0}%)",
        consistency.study_days, consistency.percent
    )?;
    Ok(())
}

/// Shows studied against planned hours per subject for `date` or today.
pub fn today<W: Write>(
    writer: &mut W,
    ctx: &SessionContext,
    date: Option<NaiveDate>,
    json: bool,
) -> Result<()> {
    let date = date.unwrap_or(ctx.today);
    let plan = ctx
        .db
        .load_plan(ctx.user.id)
        .context("failed to load plan")?
        .unwrap_or_default();
    let records = ctx
        .db
        .list_progress(ctx.user.id, usize::MAX)
        .context("failed to load progress")?;
    let rows = daily_progress(&plan, &records, date);

    if json {
        let output = JsonDay {
            date,
            subjects: &rows,
        };
        writeln!(writer, "{}", serde_json::to_string_pretty(&output)?)?;
        return Ok(());
    }

    if rows.is_empty() {
        writeln!(writer, "Nothing planned or recorded for {date}.")?;
        return Ok(());
    }

    writeln!(writer, "Progress for {date}")?;
    writeln!(writer)?;
    writeln!(
        writer,
        "{:<20}  {:>7}  {:>7}  {:>4}",
        "Subject", "Planned", "Studied", "Done"
    )?;
    writeln!(writer, "────────────────────  ───────  ───────  ────")?;
    for row in &rows {
        let planned = row.planned_hours.map_or_else(|| "-".to_string(), format_hours);
        let percent = row.percent.map_or_else(|| "-".to_string(), |p| format!("{p}%"));
        writeln!(
            writer,
            "{:<20}  {:>7}  {:>7}  {:>4}",
            truncate(&row.subject, 20),
            planned,
            format_hours(row.studied_hours),
            percent
        )?;
    }
    Ok(())
}
