//! Deep-focus session log, analytics and the distracting-site block list.

use std::io::Write;

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use clap::Args;
use serde::{Deserialize, Serialize};

use super::util::parse_datetime;
use crate::context::SessionContext;

/// JSONL log of completed focus sessions.
pub const FOCUS_LOG: &str = "focus_sessions.jsonl";

/// JSON array of blocked sites.
pub const BLOCKED_SITES: &str = "blocked_sites.json";

/// Average distractions per session above which focus is flagged as poor.
const HIGH_DISTRACTION_AVERAGE: f64 = 3.0;

/// Average session length, in minutes, below which sessions count as short.
const SHORT_SESSION_MINUTES: f64 = 30.0;

#[derive(Debug, Args)]
pub struct FocusLogArgs {
    /// Session start (ISO 8601 or relative, e.g. "45 minutes ago").
    #[arg(long, value_parser = parse_datetime)]
    pub start: DateTime<Utc>,

    /// Session end; defaults to now.
    #[arg(long, default_value = "now", value_parser = parse_datetime)]
    pub end: DateTime<Utc>,

    /// Times you got distracted.
    #[arg(long, default_value_t = 0)]
    pub distractions: u32,
}

/// One completed focus session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusSession {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_minutes: f64,
    pub distractions: u32,
}

impl FocusSession {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, distractions: u32) -> Result<Self> {
        if end <= start {
            bail!("session end {end} must be after start {start}");
        }
        #[allow(clippy::cast_precision_loss, reason = "session lengths are far below 2^52 ms")]
        let duration_minutes = (end - start).num_milliseconds() as f64 / 60_000.0;
        Ok(Self {
            start,
            end,
            duration_minutes,
            distractions,
        })
    }
}

/// Aggregates over every logged focus session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FocusStats {
    pub sessions: usize,
    pub total_minutes: f64,
    pub average_minutes: f64,
    pub average_distractions: f64,
    pub longest: FocusSession,
}

/// Summarizes `sessions`, or `None` when there are none.
pub fn focus_stats(sessions: &[FocusSession]) -> Option<FocusStats> {
    let longest = sessions
        .iter()
        .max_by(|a, b| a.duration_minutes.total_cmp(&b.duration_minutes))?
        .clone();

    #[allow(clippy::cast_precision_loss, reason = "session counts are small")]
    let count = sessions.len() as f64;
    let total_minutes: f64 = sessions.iter().map(|s| s.duration_minutes).sum();
    let distractions: f64 = sessions.iter().map(|s| f64::from(s.distractions)).sum();

    Some(FocusStats {
        sessions: sessions.len(),
        total_minutes,
        average_minutes: total_minutes / count,
        average_distractions: distractions / count,
        longest,
    })
}

/// Advice triggered by the averages.
pub fn insights(stats: &FocusStats) -> Vec<&'static str> {
    let mut insights = Vec::new();
    if stats.average_distractions > HIGH_DISTRACTION_AVERAGE {
        insights.push(
            "High distraction rate: try blocking distracting sites or changing your study environment.",
        );
    }
    if stats.average_minutes < SHORT_SESSION_MINUTES {
        insights.push("Short sessions: try pomodoro cycles to build up focus stamina.");
    }
    insights
}

/// Writes the analytics block shared by `sp focus stats` and the report.
pub fn write_focus_stats<W: Write>(writer: &mut W, stats: &FocusStats) -> Result<()> {
    writeln!(writer, "Focus sessions:       {}", stats.sessions)?;
    writeln!(writer, "Total focus time:     {:.0} min", stats.total_minutes)?;
    writeln!(writer, "Average session:      {:.1} min", stats.average_minutes)?;
    writeln!(
        writer,
        "Average distractions: {:.1}/session",
        stats.average_distractions
    )?;
    writeln!(
        writer,
        "Longest session:      {:.0} min on {}",
        stats.longest.duration_minutes,
        stats.longest.start.format("%b %d")
    )?;

    let insights = insights(stats);
    if !insights.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "Insights:")?;
        for insight in insights {
            writeln!(writer, "- {insight}")?;
        }
    }
    Ok(())
}

pub fn log<W: Write>(writer: &mut W, ctx: &SessionContext, args: &FocusLogArgs) -> Result<()> {
    let session = FocusSession::new(args.start, args.end, args.distractions)?;
    ctx.journal().append(FOCUS_LOG, &session)?;
    writeln!(
        writer,
        "Logged {:.0} min focus session ({} distractions)",
        session.duration_minutes, session.distractions
    )?;
    Ok(())
}

pub fn stats<W: Write>(writer: &mut W, ctx: &SessionContext) -> Result<()> {
    let sessions: Vec<FocusSession> = ctx.journal().read_all(FOCUS_LOG)?;
    match focus_stats(&sessions) {
        Some(stats) => write_focus_stats(writer, &stats),
        None => {
            writeln!(writer, "No focus sessions recorded yet.")?;
            Ok(())
        }
    }
}

fn normalize_site(site: &str) -> Result<String> {
    let site = site.trim();
    if site.is_empty() {
        bail!("site cannot be empty");
    }
    Ok(site.to_string())
}

/// Adds a site to the block list; adding an existing site changes nothing.
pub fn block_add<W: Write>(writer: &mut W, ctx: &SessionContext, site: &str) -> Result<()> {
    let site = normalize_site(site)?;
    let mut added = false;
    ctx.journal()
        .update_document(BLOCKED_SITES, |sites: &mut Vec<String>| {
            if !sites.contains(&site) {
                sites.push(site.clone());
                added = true;
            }
        })?;

    if added {
        writeln!(writer, "Blocked {site}")?;
    } else {
        writeln!(writer, "{site} is already blocked")?;
    }
    Ok(())
}

/// Removes a site from the block list; removing an unknown site changes nothing.
pub fn block_remove<W: Write>(writer: &mut W, ctx: &SessionContext, site: &str) -> Result<()> {
    let site = normalize_site(site)?;
    let mut removed = false;
    ctx.journal()
        .update_document(BLOCKED_SITES, |sites: &mut Vec<String>| {
            let before = sites.len();
            sites.retain(|s| *s != site);
            removed = sites.len() != before;
        })?;

    if removed {
        writeln!(writer, "Unblocked {site}")?;
    } else {
        writeln!(writer, "{site} was not blocked")?;
    }
    Ok(())
}

/// Prints blocked sites one per line, ready to import into a site blocker.
pub fn block_list<W: Write>(writer: &mut W, ctx: &SessionContext) -> Result<()> {
    let sites: Vec<String> = ctx.journal().read_document(BLOCKED_SITES)?;
    for site in sites {
        writeln!(writer, "{site}")?;
    }
    Ok(())
}
