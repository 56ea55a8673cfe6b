//! Pomodoro work/break session log.

use std::fmt;
use std::io::Write;

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};

use super::util::parse_datetime;
use crate::context::SessionContext;

/// JSONL log of completed pomodoro sessions.
pub const POMODORO_LOG: &str = "pomodoro_sessions.jsonl";

/// Sessions listed under "Recent sessions".
const RECENT_SESSIONS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PomodoroKind {
    Work,
    Break,
}

impl fmt::Display for PomodoroKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Work => "work",
            Self::Break => "break",
        })
    }
}

#[derive(Debug, Args)]
pub struct PomodoroLogArgs {
    /// Session start (ISO 8601 or relative, e.g. "25 minutes ago").
    #[arg(long, value_parser = parse_datetime)]
    pub start: DateTime<Utc>,

    /// Session end; defaults to now.
    #[arg(long, default_value = "now", value_parser = parse_datetime)]
    pub end: DateTime<Utc>,

    /// Session kind.
    #[arg(long, value_enum, default_value_t = PomodoroKind::Work)]
    pub kind: PomodoroKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroSession {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub kind: PomodoroKind,
}

impl PomodoroSession {
    #[allow(clippy::cast_precision_loss, reason = "session lengths are far below 2^52 ms")]
    fn minutes(&self) -> f64 {
        (self.end - self.start).num_milliseconds() as f64 / 60_000.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PomodoroStats {
    pub work_sessions: usize,
    pub break_sessions: usize,
    pub total_work_minutes: f64,
}

pub fn pomodoro_stats(sessions: &[PomodoroSession]) -> PomodoroStats {
    let work = || sessions.iter().filter(|s| s.kind == PomodoroKind::Work);
    PomodoroStats {
        work_sessions: work().count(),
        break_sessions: sessions
            .iter()
            .filter(|s| s.kind == PomodoroKind::Break)
            .count(),
        total_work_minutes: work().map(PomodoroSession::minutes).sum(),
    }
}

pub fn log<W: Write>(writer: &mut W, ctx: &SessionContext, args: &PomodoroLogArgs) -> Result<()> {
    if args.end <= args.start {
        bail!("session end {} must be after start {}", args.end, args.start);
    }
    let session = PomodoroSession {
        start: args.start,
        end: args.end,
        kind: args.kind,
    };
    ctx.journal().append(POMODORO_LOG, &session)?;
    writeln!(
        writer,
        "Logged {:.0} min {} session",
        session.minutes(),
        session.kind
    )?;
    Ok(())
}

pub fn stats<W: Write>(writer: &mut W, ctx: &SessionContext) -> Result<()> {
    let sessions: Vec<PomodoroSession> = ctx.journal().read_all(POMODORO_LOG)?;
    if sessions.is_empty() {
        writeln!(writer, "No pomodoro sessions recorded yet.")?;
        return Ok(());
    }

    let stats = pomodoro_stats(&sessions);
    writeln!(writer, "Work sessions:   {}", stats.work_sessions)?;
    writeln!(writer, "Break sessions:  {}", stats.break_sessions)?;
    writeln!(writer, "Total work time: {:.1} min", stats.total_work_minutes)?;
    writeln!(writer)?;
    writeln!(writer, "Recent sessions:")?;

    let skip = sessions.len().saturating_sub(RECENT_SESSIONS);
    for session in &sessions[skip..] {
        writeln!(
            writer,
            "  {} to {} | {:<5} | {:.0} min",
            session.start.format("%Y-%m-%d %H:%M"),
            session.end.format("%H:%M"),
            session.kind.to_string(),
            session.minutes()
        )?;
    }
    Ok(())
}
